// src/db/invite_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{invite::Invite, tenancy::UserRole},
};

#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        email: &str,
        role: UserRole,
        token: &str,
        invited_by_user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Invite, AppError> {
        sqlx::query_as::<_, Invite>(
            r#"
            INSERT INTO invites (tenant_id, email, role, token, invited_by_user_id, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(email)
        .bind(role)
        .bind(token)
        .bind(invited_by_user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Convites pendentes de um e-mail. A expiração é avaliada pelo serviço
    /// na leitura (estado "expirado" é virtual, não gravado).
    pub async fn pending_by_email(&self, email: &str) -> Result<Vec<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE email = $1 AND status = 'pending' \
             ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Transição pending -> accepted, registrando quem aceitou e quando.
    /// O predicado `status = 'pending'` garante que a transição é de mão
    /// única mesmo sob concorrência.
    pub async fn mark_accepted<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        accepted_by_user_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE invites
            SET status = 'accepted', accepted_by_user_id = $2,
                accepted_at = now(), updated_at = now()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(accepted_by_user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Transição pending -> cancelled; zero linhas afetadas significa que o
    /// convite já havia saído do estado pendente.
    pub async fn mark_cancelled(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE invites SET status = 'cancelled', updated_at = now() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
