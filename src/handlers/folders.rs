// src/handlers/folders.rs

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
    middleware::tenancy::TenantContext,
    models::document::{CreateFolderPayload, UpdateFolderPayload},
};

pub async fn create_folder(
    State(app_state): State<AppState>,
    context: TenantContext,
    Json(payload): Json<CreateFolderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let folder = app_state
        .folder_service
        .create(context.tenant_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": folder }))))
}

pub async fn list_folders(
    State(app_state): State<AppState>,
    context: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let folders = app_state.folder_service.list(context.tenant_id).await?;
    Ok(Json(json!({ "data": folders })))
}

pub async fn get_folder(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let folder = app_state.folder_service.get(context.tenant_id, id).await?;
    Ok(Json(json!({ "data": folder })))
}

pub async fn update_folder(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFolderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let folder = app_state
        .folder_service
        .update(context.tenant_id, id, &payload)
        .await?;
    Ok(Json(json!({ "data": folder })))
}

pub async fn delete_folder(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.folder_service.delete(context.tenant_id, id).await?;
    Ok(Json(json!({ "data": { "message": "Pasta removida com sucesso." } })))
}
