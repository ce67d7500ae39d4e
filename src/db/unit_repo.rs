// src/db/unit_repo.rs
//
// Todas as consultas filtram por tenant_id vindo do contexto autenticado.
// O filtro entra em AND no próprio predicado de UPDATE/DELETE: um tenant_id
// errado afeta zero linhas em vez de vazar dados de outro condomínio.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::unit::Unit};

#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

pub struct UnitRecord<'a> {
    pub number: &'a str,
    pub block: Option<&'a str>,
    pub floor: Option<i32>,
    pub area: Option<Decimal>,
    pub owner_name: Option<&'a str>,
    pub owner_email: Option<&'a str>,
    pub owner_phone: Option<&'a str>,
    pub occupied: bool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        record: UnitRecord<'_>,
    ) -> Result<Unit, AppError> {
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (tenant_id, number, block, floor, area,
                               owner_name, owner_email, owner_phone, occupied)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(record.number)
        .bind(record.block)
        .bind(record.floor)
        .bind(record.area)
        .bind(record.owner_name)
        .bind(record.owner_email)
        .bind(record.owner_phone)
        .bind(record.occupied)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Número de unidade já cadastrado neste condomínio.".to_string(),
                    );
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Unit>, AppError> {
        sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_by_number(
        &self,
        tenant_id: Uuid,
        number: &str,
    ) -> Result<Option<Unit>, AppError> {
        sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE tenant_id = $1 AND number = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Unit>, AppError> {
        sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE tenant_id = $1 AND deleted_at IS NULL ORDER BY number",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn list_by_block(
        &self,
        tenant_id: Uuid,
        block: &str,
    ) -> Result<Vec<Unit>, AppError> {
        sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE tenant_id = $1 AND block = $2 AND deleted_at IS NULL \
             ORDER BY number",
        )
        .bind(tenant_id)
        .bind(block)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        record: UnitRecord<'_>,
        active: bool,
    ) -> Result<Option<Unit>, AppError> {
        sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET number = $3, block = $4, floor = $5, area = $6,
                owner_name = $7, owner_email = $8, owner_phone = $9,
                occupied = $10, active = $11, updated_at = now()
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(record.number)
        .bind(record.block)
        .bind(record.floor)
        .bind(record.area)
        .bind(record.owner_name)
        .bind(record.owner_email)
        .bind(record.owner_phone)
        .bind(record.occupied)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Número de unidade já cadastrado neste condomínio.".to_string(),
                    );
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn soft_delete(&self, tenant_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE units SET deleted_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
