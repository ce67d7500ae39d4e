// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload},
};

// Handler de registro
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state.auth_service.register(&payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": user }))))
}

// Handler de login. A resposta varia com o número de condomínios do usuário:
// token direto (0 ou 1) ou lista para escolha (vários, sem token).
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(json!({ "data": response })))
}

// Login já escolhendo o condomínio (segundo passo do fluxo multi-condomínio)
pub async fn login_with_tenant(
    State(app_state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login_with_tenant(&payload.email, &payload.password, tenant_id)
        .await?;

    Ok(Json(json!({ "data": response })))
}

// Troca o condomínio ativo da sessão emitindo um novo token
pub async fn switch_tenant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let token = app_state
        .auth_service
        .switch_tenant(user.user_id, tenant_id)
        .await?;

    Ok(Json(json!({ "data": AuthResponse { token } })))
}
