// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenancy::{Tenant, TenantSelection},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria um novo condomínio. Aceita um executor (pool ou transação) para
    /// participar da transação de auto-criação (condomínio + vínculo síndico).
    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        name: &str,
        cnpj: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, cnpj, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(cnpj)
        .bind(email)
        .bind(phone)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("CNPJ já cadastrado.".to_string());
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // Listagem global, usada apenas pela rota de administração da plataforma
    pub async fn list_all(&self) -> Result<Vec<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        active: bool,
    ) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = $2, email = $3, phone = $4, active = $5, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Soft delete: marca o tombstone em vez de apagar a linha.
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE tenants SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Condomínios em que o usuário possui vínculo ativo, com o papel dele
    /// em cada um. Alimenta o login multi-condomínio e "meus condomínios".
    pub async fn tenants_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TenantSelection>, AppError> {
        sqlx::query_as::<_, TenantSelection>(
            r#"
            SELECT t.id AS tenant_id, t.name AS tenant_name, ut.role
            FROM user_tenants ut
            JOIN tenants t ON t.id = ut.tenant_id AND t.deleted_at IS NULL
            WHERE ut.user_id = $1 AND ut.is_active = TRUE
            ORDER BY t.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
