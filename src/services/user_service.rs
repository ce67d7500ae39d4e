// src/services/user_service.rs
//
// Conta do próprio usuário (perfil, senha) e administração de membros
// dentro de um condomínio.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, security},
    db::{MembershipRepository, UnitRepository, UserRepository},
    models::auth::{ChangePasswordPayload, UpdateAccountPayload, User, UserInTenant},
    models::tenancy::{MemberPage, UpdateMembershipPayload, UserRole},
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    user_repo: UserRepository,
    membership_repo: MembershipRepository,
    unit_repo: UnitRepository,
}

impl UserService {
    pub fn new(
        pool: PgPool,
        user_repo: UserRepository,
        membership_repo: MembershipRepository,
        unit_repo: UnitRepository,
    ) -> Self {
        Self {
            pool,
            user_repo,
            membership_repo,
            unit_repo,
        }
    }

    // --- Conta própria (/api/account) ---

    pub async fn get_account(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: &UpdateAccountPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;
        self.user_repo
            .update_profile(user_id, &payload.name, payload.phone.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".to_string()))
    }

    /// Troca de senha exige a senha atual correta e a nova dentro da regra
    /// de força. Hashing e verificação rodam em `spawn_blocking`.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        payload: &ChangePasswordPayload,
    ) -> Result<(), AppError> {
        payload.validate()?;
        security::validate_password_strength(&payload.new_password)?;

        let user = self.get_account(user_id).await?;

        let old_password = payload.old_password.clone();
        let current_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || {
            security::verify_password(&old_password, &current_hash)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !matches {
            return Err(AppError::Validation("Senha atual incorreta.".to_string()));
        }

        let new_password = payload.new_password.clone();
        let new_hash = tokio::task::spawn_blocking(move || security::hash_password(&new_password))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo.update_password(user_id, &new_hash).await
    }

    // --- Membros do condomínio (/api/users) ---

    pub async fn list_members(
        &self,
        tenant_id: Uuid,
        page: Option<i64>,
        per_page: Option<i64>,
        search: Option<&str>,
    ) -> Result<MemberPage, AppError> {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let (members, total) = self
            .membership_repo
            .list_by_tenant_paginated(tenant_id, page, per_page, search)
            .await?;

        Ok(MemberPage {
            members,
            total,
            page,
            per_page,
        })
    }

    /// Usuário com o papel dele NESTE condomínio; quem não tem vínculo aqui
    /// simplesmente não existe para o chamador.
    pub async fn get_member(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<UserInTenant, AppError> {
        let membership = self
            .membership_repo
            .find(user_id, tenant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Usuário não encontrado neste condomínio.".to_string())
            })?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".to_string()))?;

        Ok(UserInTenant {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: membership.role,
            is_active: membership.is_active,
            unit_id: user.unit_id,
        })
    }

    /// Ativa/desativa o vínculo e/ou (des)vincula a unidade. Só admin/síndico;
    /// a unidade, quando informada, precisa existir neste condomínio.
    pub async fn update_membership(
        &self,
        tenant_id: Uuid,
        actor_role: UserRole,
        user_id: Uuid,
        payload: &UpdateMembershipPayload,
    ) -> Result<UserInTenant, AppError> {
        if !actor_role.can_manage_tenant() {
            return Err(AppError::Forbidden(
                "Apenas administradores e síndicos podem alterar vínculos.".to_string(),
            ));
        }

        // Garante que o alvo pertence a este condomínio antes de mexer
        self.membership_repo
            .find(user_id, tenant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Usuário não encontrado neste condomínio.".to_string())
            })?;

        // A unidade, quando informada, precisa existir neste condomínio
        if let Some(unit_id) = payload.unit_id {
            self.unit_repo
                .find_by_id(tenant_id, unit_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Unidade não encontrada.".to_string()))?;
        }

        // Vínculo e unidade mudam juntos ou não mudam
        let mut tx = self.pool.begin().await?;

        if let Some(is_active) = payload.is_active {
            self.membership_repo
                .set_active(&mut *tx, user_id, tenant_id, is_active)
                .await?;
        }

        if payload.clear_unit {
            self.user_repo.set_unit(&mut *tx, user_id, None).await?;
        } else if let Some(unit_id) = payload.unit_id {
            self.user_repo
                .set_unit(&mut *tx, user_id, Some(unit_id))
                .await?;
        }

        tx.commit().await?;

        self.get_member(tenant_id, user_id).await
    }

    /// Remove o usuário DESTE condomínio: apaga só a linha do vínculo. A
    /// conta e os vínculos em outros condomínios ficam intactos.
    pub async fn remove_from_tenant(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        if !actor_role.can_manage_tenant() {
            return Err(AppError::Forbidden(
                "Apenas administradores e síndicos podem remover membros.".to_string(),
            ));
        }
        if actor_id == user_id {
            return Err(AppError::Validation(
                "Você não pode remover a si mesmo do condomínio.".to_string(),
            ));
        }

        let deleted = self.membership_repo.delete(user_id, tenant_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(
                "Usuário não encontrado neste condomínio.".to_string(),
            ));
        }
        Ok(())
    }
}
