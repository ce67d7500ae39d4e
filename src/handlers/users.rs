// src/handlers/users.rs
//
// Membros do condomínio ativo. O tenant_id vem SEMPRE do TenantContext.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
    models::tenancy::{MemberListQuery, UpdateMembershipPayload},
};

pub async fn list_members(
    State(app_state): State<AppState>,
    context: TenantContext,
    Query(query): Query<MemberListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .user_service
        .list_members(
            context.tenant_id,
            query.page,
            query.per_page,
            query.search.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "data": page })))
}

pub async fn get_member(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let member = app_state
        .user_service
        .get_member(context.tenant_id, user_id)
        .await?;
    Ok(Json(json!({ "data": member })))
}

pub async fn update_membership(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateMembershipPayload>,
) -> Result<impl IntoResponse, AppError> {
    let member = app_state
        .user_service
        .update_membership(context.tenant_id, context.role, user_id, &payload)
        .await?;
    Ok(Json(json!({ "data": member })))
}

pub async fn remove_member(
    State(app_state): State<AppState>,
    context: TenantContext,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .remove_from_tenant(context.tenant_id, user.user_id, context.role, user_id)
        .await?;
    Ok(Json(json!({ "data": { "message": "Usuário removido do condomínio." } })))
}
