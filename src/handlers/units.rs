// src/handlers/units.rs

use axum::{
    extract::{Path, Query, State},
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
    models::unit::{CreateUnitPayload, UnitListQuery, UpdateUnitPayload},
};

pub async fn create_unit(
    State(app_state): State<AppState>,
    context: TenantContext,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state
        .unit_service
        .create(context.tenant_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": unit }))))
}

pub async fn list_units(
    State(app_state): State<AppState>,
    context: TenantContext,
    Query(query): Query<UnitListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let units = app_state
        .unit_service
        .list(context.tenant_id, query.block.as_deref())
        .await?;
    Ok(Json(json!({ "data": units })))
}

pub async fn get_unit(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state.unit_service.get(context.tenant_id, id).await?;
    Ok(Json(json!({ "data": unit })))
}

pub async fn get_unit_by_number(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state
        .unit_service
        .get_by_number(context.tenant_id, &number)
        .await?;
    Ok(Json(json!({ "data": unit })))
}

pub async fn update_unit(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state
        .unit_service
        .update(context.tenant_id, id, &payload)
        .await?;
    Ok(Json(json!({ "data": unit })))
}

pub async fn delete_unit(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.unit_service.delete(context.tenant_id, id).await?;
    Ok(Json(json!({ "data": { "message": "Unidade removida com sucesso." } })))
}
