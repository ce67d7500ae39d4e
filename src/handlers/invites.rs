// src/handlers/invites.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
    models::invite::{AcceptInvitePayload, CreateInvitePayload},
};

pub async fn create_invite(
    State(app_state): State<AppState>,
    context: TenantContext,
    user: AuthenticatedUser,
    Json(payload): Json<CreateInvitePayload>,
) -> Result<impl IntoResponse, AppError> {
    let invite = app_state
        .invite_service
        .create_invite(context.tenant_id, user.user_id, context.role, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": invite }))))
}

pub async fn tenant_invites(
    State(app_state): State<AppState>,
    context: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let invites = app_state
        .invite_service
        .tenant_invites(context.tenant_id)
        .await?;
    Ok(Json(json!({ "data": invites })))
}

// Convites pendentes do próprio usuário (pelo e-mail da sessão)
pub async fn my_invites(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let invites = app_state
        .invite_service
        .pending_for_email(&user.email)
        .await?;
    Ok(Json(json!({ "data": invites })))
}

// Consulta pública: o convidado vê o condomínio e o papel antes de aceitar
pub async fn get_invite(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let details = app_state.invite_service.get_by_token(&token).await?;
    Ok(Json(json!({ "data": details })))
}

// Aceitação pública: cria a conta quando o e-mail ainda não tem uma
pub async fn accept_invite(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<AcceptInvitePayload>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .invite_service
        .accept_invite(&token, &payload)
        .await?;
    Ok(Json(json!({ "data": response })))
}

pub async fn cancel_invite(
    State(app_state): State<AppState>,
    context: TenantContext,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .invite_service
        .cancel_invite(context.tenant_id, user.user_id, context.role, id)
        .await?;
    Ok(Json(json!({ "data": { "message": "Convite cancelado com sucesso." } })))
}
