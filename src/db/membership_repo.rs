// src/db/membership_repo.rs
//
// Tabela-ponte user_tenants: é AQUI que a autorização por condomínio mora.
// Um usuário tem no máximo um papel por condomínio (chave única user+tenant).

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenancy::{TenantMember, UserRole, UserTenant},
};

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria um vínculo usuário-condomínio. A chave única (user_id, tenant_id)
    /// é a última linha de defesa contra aceitações concorrentes do mesmo
    /// convite: o perdedor da corrida falha aqui, não em um pré-check.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        tenant_id: Uuid,
        role: UserRole,
    ) -> Result<UserTenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, UserTenant>(
            r#"
            INSERT INTO user_tenants (user_id, tenant_id, role, is_active, joined_at)
            VALUES ($1, $2, $3, TRUE, now())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Usuário já pertence a este condomínio.".to_string(),
                    );
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<UserTenant>, AppError> {
        sqlx::query_as::<_, UserTenant>(
            "SELECT * FROM user_tenants WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Verificação rápida de vínculo ativo, sem carregar a linha inteira.
    pub async fn is_active_member(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_tenants
                WHERE user_id = $1 AND tenant_id = $2 AND is_active = TRUE
            )
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    /// Membros de um condomínio, paginados, com busca opcional por
    /// nome/e-mail/telefone. Retorna também o total para o cliente paginar.
    pub async fn list_by_tenant_paginated(
        &self,
        tenant_id: Uuid,
        page: i64,
        per_page: i64,
        search: Option<&str>,
    ) -> Result<(Vec<TenantMember>, i64), AppError> {
        let like = search.map(|s| format!("%{}%", s));
        let offset = page_offset(page, per_page);

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM user_tenants ut
            JOIN users u ON u.id = ut.user_id AND u.deleted_at IS NULL
            WHERE ut.tenant_id = $1
              AND ($2::text IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2 OR u.phone ILIKE $2)
            "#,
        )
        .bind(tenant_id)
        .bind(like.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let members = sqlx::query_as::<_, TenantMember>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.phone,
                   ut.role, ut.is_active, ut.joined_at, u.unit_id
            FROM user_tenants ut
            JOIN users u ON u.id = ut.user_id AND u.deleted_at IS NULL
            WHERE ut.tenant_id = $1
              AND ($2::text IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2 OR u.phone ILIKE $2)
            ORDER BY u.name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(like.as_deref())
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((members, total.0))
    }

    /// Ativa/desativa o vínculo. Desativar revoga o acesso preservando o
    /// histórico; a linha permanece. Aceita um executor para participar da
    /// transação de atualização de vínculo.
    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        tenant_id: Uuid,
        is_active: bool,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE user_tenants SET is_active = $3, updated_at = now() \
             WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(is_active)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remoção explícita do condomínio: apaga SÓ o vínculo, nunca o usuário.
    pub async fn delete(&self, user_id: Uuid, tenant_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM user_tenants WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(user_id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

// Converte a página 1-based em OFFSET. Aritmética saturante: uma página
// absurda vinda da query string satura em i64::MAX (zero linhas) em vez de
// estourar.
fn page_offset(page: i64, per_page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_das_primeiras_paginas() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(2, 20), 20);
        assert_eq!(page_offset(5, 10), 40);
    }

    #[test]
    fn pagina_gigante_nao_estoura() {
        let offset = page_offset(i64::MAX, 100);
        assert_eq!(offset, i64::MAX);
        assert!(offset >= 0);

        assert_eq!(page_offset(i64::MAX, 1), i64::MAX - 1);
    }
}
