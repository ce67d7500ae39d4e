// src/db/document_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::document::Document};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

pub struct DocumentRecord<'a> {
    pub folder_id: Option<Uuid>,
    pub name: &'a str,
    pub original_name: &'a str,
    pub content_type: &'a str,
    pub size: i64,
    pub s3_key: &'a str,
    pub uploaded_by_id: Uuid,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        record: DocumentRecord<'_>,
    ) -> Result<Document, AppError> {
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (tenant_id, folder_id, name, original_name,
                                   content_type, size, s3_key, uploaded_by_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(record.folder_id)
        .bind(record.name)
        .bind(record.original_name)
        .bind(record.content_type)
        .bind(record.size)
        .bind(record.s3_key)
        .bind(record.uploaded_by_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Document>, AppError> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Lista documentos do condomínio; com `folder_id` filtra pela pasta.
    pub async fn list(
        &self,
        tenant_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<Vec<Document>, AppError> {
        match folder_id {
            Some(folder_id) => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents \
                 WHERE tenant_id = $1 AND folder_id = $2 AND deleted_at IS NULL \
                 ORDER BY created_at DESC",
            )
            .bind(tenant_id)
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from),
            None => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE tenant_id = $1 AND deleted_at IS NULL \
                 ORDER BY created_at DESC",
            )
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from),
        }
    }

    pub async fn move_to_folder(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE documents SET folder_id = $3, updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .bind(folder_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, tenant_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE documents SET deleted_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
