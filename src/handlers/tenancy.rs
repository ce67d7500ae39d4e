// src/handlers/tenancy.rs

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
    middleware::{auth::AuthenticatedUser, rbac::GlobalAdmin},
    models::tenancy::{CreateTenantPayload, UpdateTenantPayload},
};

// Auto-criação: o usuário autenticado abre um condomínio e vira síndico dele
pub async fn create_tenant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state
        .tenant_service
        .create_tenant_by_user(user.user_id, &payload)
        .await?;

    // Token já escopado no condomínio recém-criado, para a sessão seguir direto
    let token = app_state
        .auth_service
        .switch_tenant(user.user_id, tenant.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "tenant": tenant, "token": token } })),
    ))
}

pub async fn my_tenants(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state.tenant_service.list_my_tenants(user.user_id).await?;
    Ok(Json(json!({ "data": tenants })))
}

// --- Administração da plataforma (/api/admin/tenants) ---

pub async fn admin_create_tenant(
    State(app_state): State<AppState>,
    _admin: GlobalAdmin,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_service.admin_create(&payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": tenant }))))
}

pub async fn admin_list_tenants(
    State(app_state): State<AppState>,
    _admin: GlobalAdmin,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state.tenant_service.admin_list().await?;
    Ok(Json(json!({ "data": tenants })))
}

pub async fn admin_get_tenant(
    State(app_state): State<AppState>,
    _admin: GlobalAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_service.admin_get(id).await?;
    Ok(Json(json!({ "data": tenant })))
}

pub async fn admin_update_tenant(
    State(app_state): State<AppState>,
    _admin: GlobalAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_service.admin_update(id, &payload).await?;
    Ok(Json(json!({ "data": tenant })))
}

pub async fn admin_delete_tenant(
    State(app_state): State<AppState>,
    _admin: GlobalAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tenant_service.admin_delete(id).await?;
    Ok(Json(json!({ "data": { "message": "Condomínio removido com sucesso." } })))
}
