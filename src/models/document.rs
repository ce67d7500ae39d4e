// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// Pasta de documentos de um condomínio; nome único por condomínio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Arquivo enviado para o armazenamento de objetos. A pasta é opcional:
// apagar a pasta desvincula os documentos (folder_id vira NULL), não os apaga.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub name: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub s3_key: String,
    pub uploaded_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderPayload {
    #[validate(length(min = 1, max = 100, message = "O nome da pasta é obrigatório."))]
    pub name: String,
    #[validate(length(max = 500, message = "A descrição deve ter no máximo 500 caracteres."))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFolderPayload {
    #[validate(length(min = 1, max = 100, message = "O nome da pasta é obrigatório."))]
    pub name: String,
    #[validate(length(max = 500, message = "A descrição deve ter no máximo 500 caracteres."))]
    pub description: Option<String>,
}

// `folder_id: None` move o documento para a raiz.
#[derive(Debug, Deserialize)]
pub struct MoveDocumentPayload {
    pub folder_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentListQuery {
    pub folder_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlResponse {
    pub url: String,
}
