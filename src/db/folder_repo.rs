// src/db/folder_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::document::Folder};

#[derive(Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Folder, AppError> {
        sqlx::query_as::<_, Folder>(
            r#"
            INSERT INTO folders (tenant_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma pasta com este nome neste condomínio.".to_string(),
                    );
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Folder>, AppError> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Folder>, AppError> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE tenant_id = $1 AND deleted_at IS NULL ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Folder>, AppError> {
        sqlx::query_as::<_, Folder>(
            r#"
            UPDATE folders
            SET name = $3, description = $4, updated_at = now()
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma pasta com este nome neste condomínio.".to_string(),
                    );
                }
            }
            AppError::DatabaseError(e)
        })
    }

    /// Desvincula os documentos da pasta (folder_id = NULL). Roda dentro da
    /// mesma transação que o soft delete da pasta.
    pub async fn detach_documents<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        folder_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE documents SET folder_id = NULL, updated_at = now() \
             WHERE tenant_id = $1 AND folder_id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(folder_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn soft_delete<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE folders SET deleted_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
