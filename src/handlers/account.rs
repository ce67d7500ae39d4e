// src/handlers/account.rs
//
// Conta do próprio usuário, independente de condomínio.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{ChangePasswordPayload, UpdateAccountPayload},
};

pub async fn get_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let account = app_state.user_service.get_account(user.user_id).await?;
    Ok(Json(json!({ "data": account })))
}

pub async fn update_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateAccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    let account = app_state
        .user_service
        .update_profile(user.user_id, &payload)
        .await?;
    Ok(Json(json!({ "data": account })))
}

pub async fn change_password(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .change_password(user.user_id, &payload)
        .await?;
    Ok(Json(json!({ "data": { "message": "Senha alterada com sucesso." } })))
}
