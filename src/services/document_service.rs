// src/services/document_service.rs
//
// Documentos têm duas metades: o blob no storage de objetos e os metadados
// no banco. A chave do objeto é namespaceada pelo condomínio, então nem um
// bug de consulta serve um blob de outro tenant.

use std::time::Duration;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DocumentRecord, DocumentRepository, FolderRepository},
    models::document::Document,
    services::storage_service::StorageService,
};

// Limite de upload por arquivo
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(15 * 60);

pub struct UploadRequest {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub folder_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct DocumentService {
    document_repo: DocumentRepository,
    folder_repo: FolderRepository,
    storage: StorageService,
}

impl DocumentService {
    pub fn new(
        document_repo: DocumentRepository,
        folder_repo: FolderRepository,
        storage: StorageService,
    ) -> Self {
        Self {
            document_repo,
            folder_repo,
            storage,
        }
    }

    /// Sobe o blob e grava os metadados. O blob vai primeiro; se a gravação
    /// dos metadados falhar, tenta-se apagar o blob para não deixar órfão
    /// (melhor-esforço: a falha da limpeza é apenas logada).
    pub async fn upload(
        &self,
        tenant_id: Uuid,
        uploaded_by_id: Uuid,
        request: UploadRequest,
    ) -> Result<Document, AppError> {
        if request.bytes.is_empty() {
            return Err(AppError::Validation("O arquivo está vazio.".to_string()));
        }
        if request.bytes.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(
                "O arquivo excede o limite de 10 MB.".to_string(),
            ));
        }
        if request.original_name.trim().is_empty() {
            return Err(AppError::Validation(
                "O nome do arquivo é obrigatório.".to_string(),
            ));
        }

        if let Some(folder_id) = request.folder_id {
            self.folder_repo
                .find_by_id(tenant_id, folder_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Pasta não encontrada.".to_string()))?;
        }

        let sanitized = sanitize_filename(&request.original_name);
        let s3_key = format!(
            "tenants/{}/documents/{}/{}",
            tenant_id,
            Uuid::new_v4(),
            sanitized
        );
        let size = request.bytes.len() as i64;

        self.storage
            .upload(&s3_key, request.bytes, &request.content_type)
            .await?;

        let created = self
            .document_repo
            .create(
                tenant_id,
                DocumentRecord {
                    folder_id: request.folder_id,
                    name: &sanitized,
                    original_name: &request.original_name,
                    content_type: &request.content_type,
                    size,
                    s3_key: &s3_key,
                    uploaded_by_id,
                },
            )
            .await;

        match created {
            Ok(document) => Ok(document),
            Err(e) => {
                if let Err(cleanup_err) = self.storage.delete(&s3_key).await {
                    tracing::error!(
                        "Blob órfão em '{}' após falha de metadados: {}",
                        s3_key,
                        cleanup_err
                    );
                }
                Err(e)
            }
        }
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<Vec<Document>, AppError> {
        self.document_repo.list(tenant_id, folder_id).await
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Document, AppError> {
        self.document_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Documento não encontrado.".to_string()))
    }

    /// URL pré-assinada de download, válida por 15 minutos. O servidor nunca
    /// faz proxy dos bytes.
    pub async fn download_url(&self, tenant_id: Uuid, id: Uuid) -> Result<String, AppError> {
        let document = self.get(tenant_id, id).await?;
        self.storage
            .presigned_get_url(&document.s3_key, DOWNLOAD_URL_TTL)
            .await
    }

    /// Remove blob e depois metadados, nesta ordem: metadados sem blob são
    /// um link quebrado visível; blob sem metadados é lixo invisível.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let document = self.get(tenant_id, id).await?;

        self.storage.delete(&document.s3_key).await?;

        let affected = self.document_repo.soft_delete(tenant_id, id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Documento não encontrado.".to_string()));
        }
        Ok(())
    }

    /// Move para outra pasta (ou para a raiz, com `None`). A pasta destino
    /// precisa existir neste condomínio.
    pub async fn move_to_folder(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<Document, AppError> {
        if let Some(folder_id) = folder_id {
            self.folder_repo
                .find_by_id(tenant_id, folder_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Pasta não encontrada.".to_string()))?;
        }

        let affected = self
            .document_repo
            .move_to_folder(tenant_id, id, folder_id)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound("Documento não encontrado.".to_string()));
        }

        self.get(tenant_id, id).await
    }
}

// Mantém apenas caracteres seguros para compor a chave do objeto.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "arquivo".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_de_arquivo_sanitizado() {
        assert_eq!(sanitize_filename("ata 2024.pdf"), "ata_2024.pdf");
        assert_eq!(sanitize_filename("relatório.pdf"), "relat_rio.pdf");
        assert_eq!(sanitize_filename("ok-nome_1.txt"), "ok-nome_1.txt");
    }

    #[test]
    fn nome_so_de_simbolos_vira_padrao() {
        assert_eq!(sanitize_filename("///"), "arquivo");
    }

    #[test]
    fn limite_de_upload_e_10mb() {
        assert_eq!(MAX_FILE_SIZE, 10 * 1024 * 1024);
    }
}
