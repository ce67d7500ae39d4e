// src/handlers/documents.rs

use axum::{
    extract::{Multipart, Path, Query, State},
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
    models::document::{DocumentListQuery, DownloadUrlResponse, MoveDocumentPayload},
    services::document_service::UploadRequest,
};

// Upload multipart: um campo "file" obrigatório e um "folder_id" opcional.
pub async fn upload_document(
    State(app_state): State<AppState>,
    context: TenantContext,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder_id: Option<Uuid> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Validation(format!("Requisição multipart inválida: {}", e))
    })? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        AppError::Validation("O arquivo precisa ter um nome.".to_string())
                    })?;
                let content_type = field
                    .content_type()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Falha ao ler o arquivo: {}", e))
                })?;
                file = Some((original_name, content_type, bytes.to_vec()));
            }
            Some("folder_id") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Campo folder_id inválido: {}", e))
                })?;
                if !text.trim().is_empty() {
                    folder_id = Some(text.trim().parse().map_err(|_| {
                        AppError::Validation("folder_id não é um UUID válido.".to_string())
                    })?);
                }
            }
            _ => {}
        }
    }

    let (original_name, content_type, bytes) = file.ok_or_else(|| {
        AppError::Validation("O campo 'file' é obrigatório.".to_string())
    })?;

    let document = app_state
        .document_service
        .upload(
            context.tenant_id,
            user.user_id,
            UploadRequest {
                original_name,
                content_type,
                bytes,
                folder_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": document }))))
}

pub async fn list_documents(
    State(app_state): State<AppState>,
    context: TenantContext,
    Query(query): Query<DocumentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let documents = app_state
        .document_service
        .list(context.tenant_id, query.folder_id)
        .await?;
    Ok(Json(json!({ "data": documents })))
}

pub async fn get_document(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let document = app_state.document_service.get(context.tenant_id, id).await?;
    Ok(Json(json!({ "data": document })))
}

// URL pré-assinada, válida por 15 minutos; os bytes nunca passam pelo servidor
pub async fn download_document(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let url = app_state
        .document_service
        .download_url(context.tenant_id, id)
        .await?;
    Ok(Json(json!({ "data": DownloadUrlResponse { url } })))
}

pub async fn delete_document(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .document_service
        .delete(context.tenant_id, id)
        .await?;
    Ok(Json(json!({ "data": { "message": "Documento removido com sucesso." } })))
}

pub async fn move_document(
    State(app_state): State<AppState>,
    context: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveDocumentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let document = app_state
        .document_service
        .move_to_folder(context.tenant_id, id, payload.folder_id)
        .await?;
    Ok(Json(json!({ "data": document })))
}
