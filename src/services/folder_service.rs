// src/services/folder_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::FolderRepository,
    models::document::{CreateFolderPayload, Folder, UpdateFolderPayload},
};

#[derive(Clone)]
pub struct FolderService {
    pool: PgPool,
    folder_repo: FolderRepository,
}

impl FolderService {
    pub fn new(pool: PgPool, folder_repo: FolderRepository) -> Self {
        Self { pool, folder_repo }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        payload: &CreateFolderPayload,
    ) -> Result<Folder, AppError> {
        payload.validate()?;
        self.folder_repo
            .create(tenant_id, &payload.name, payload.description.as_deref())
            .await
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Folder>, AppError> {
        self.folder_repo.list(tenant_id).await
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Folder, AppError> {
        self.folder_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pasta não encontrada.".to_string()))
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        payload: &UpdateFolderPayload,
    ) -> Result<Folder, AppError> {
        payload.validate()?;
        self.folder_repo
            .update(tenant_id, id, &payload.name, payload.description.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Pasta não encontrada.".to_string()))
    }

    /// Apaga a pasta (soft delete) desvinculando os documentos dela na mesma
    /// transação: os documentos sobrevivem na raiz, nunca somem junto.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.folder_repo
            .detach_documents(&mut *tx, tenant_id, id)
            .await?;

        let affected = self.folder_repo.soft_delete(&mut *tx, tenant_id, id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Pasta não encontrada.".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}
