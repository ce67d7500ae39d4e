// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{MembershipRepository, TenantRepository},
    models::tenancy::{
        CreateTenantPayload, Tenant, TenantSelection, UpdateTenantPayload, UserRole,
    },
};

#[derive(Clone)]
pub struct TenantService {
    pool: PgPool,
    tenant_repo: TenantRepository,
    membership_repo: MembershipRepository,
}

impl TenantService {
    pub fn new(
        pool: PgPool,
        tenant_repo: TenantRepository,
        membership_repo: MembershipRepository,
    ) -> Self {
        Self {
            pool,
            tenant_repo,
            membership_repo,
        }
    }

    /// Auto-criação: qualquer usuário autenticado pode abrir um condomínio e
    /// vira síndico dele. Condomínio e vínculo nascem na mesma transação; se
    /// o vínculo falhar, o condomínio não persiste.
    pub async fn create_tenant_by_user(
        &self,
        user_id: Uuid,
        payload: &CreateTenantPayload,
    ) -> Result<Tenant, AppError> {
        payload.validate()?;

        let mut tx = self.pool.begin().await?;

        let tenant = self
            .tenant_repo
            .create_tenant(
                &mut *tx,
                &payload.name,
                &payload.cnpj,
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )
            .await?;

        self.membership_repo
            .create(&mut *tx, user_id, tenant.id, UserRole::Sindico)
            .await?;

        tx.commit().await?;

        tracing::info!("✅ Condomínio '{}' criado pelo usuário {}", tenant.name, user_id);

        Ok(tenant)
    }

    pub async fn list_my_tenants(&self, user_id: Uuid) -> Result<Vec<TenantSelection>, AppError> {
        self.tenant_repo.tenants_for_user(user_id).await
    }

    // --- Administração da plataforma (rotas /api/admin/tenants) ---

    pub async fn admin_create(&self, payload: &CreateTenantPayload) -> Result<Tenant, AppError> {
        payload.validate()?;
        self.tenant_repo
            .create_tenant(
                self.pool(),
                &payload.name,
                &payload.cnpj,
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )
            .await
    }

    pub async fn admin_list(&self) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list_all().await
    }

    pub async fn admin_get(&self, id: Uuid) -> Result<Tenant, AppError> {
        self.tenant_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Condomínio não encontrado.".to_string()))
    }

    pub async fn admin_update(
        &self,
        id: Uuid,
        payload: &UpdateTenantPayload,
    ) -> Result<Tenant, AppError> {
        payload.validate()?;

        let current = self.admin_get(id).await?;
        let active = payload.active.unwrap_or(current.active);

        self.tenant_repo
            .update(
                id,
                &payload.name,
                payload.email.as_deref(),
                payload.phone.as_deref(),
                active,
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Condomínio não encontrado.".to_string()))
    }

    pub async fn admin_delete(&self, id: Uuid) -> Result<(), AppError> {
        let affected = self.tenant_repo.soft_delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Condomínio não encontrado.".to_string()));
        }
        Ok(())
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}
