// src/services/unit_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{UnitRecord, UnitRepository},
    models::unit::{CreateUnitPayload, Unit, UpdateUnitPayload},
};

#[derive(Clone)]
pub struct UnitService {
    unit_repo: UnitRepository,
}

impl UnitService {
    pub fn new(unit_repo: UnitRepository) -> Self {
        Self { unit_repo }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        payload: &CreateUnitPayload,
    ) -> Result<Unit, AppError> {
        payload.validate()?;

        self.unit_repo
            .create(
                tenant_id,
                UnitRecord {
                    number: &payload.number,
                    block: payload.block.as_deref(),
                    floor: payload.floor,
                    area: payload.area,
                    owner_name: payload.owner_name.as_deref(),
                    owner_email: payload.owner_email.as_deref(),
                    owner_phone: payload.owner_phone.as_deref(),
                    occupied: payload.occupied.unwrap_or(false),
                },
            )
            .await
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Unit, AppError> {
        self.unit_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidade não encontrada.".to_string()))
    }

    pub async fn get_by_number(&self, tenant_id: Uuid, number: &str) -> Result<Unit, AppError> {
        self.unit_repo
            .find_by_number(tenant_id, number)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidade não encontrada.".to_string()))
    }

    /// Lista as unidades do condomínio; `block` restringe a um bloco.
    pub async fn list(
        &self,
        tenant_id: Uuid,
        block: Option<&str>,
    ) -> Result<Vec<Unit>, AppError> {
        match block {
            Some(block) => self.unit_repo.list_by_block(tenant_id, block).await,
            None => self.unit_repo.list(tenant_id).await,
        }
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        payload: &UpdateUnitPayload,
    ) -> Result<Unit, AppError> {
        payload.validate()?;

        let current = self.get(tenant_id, id).await?;

        self.unit_repo
            .update(
                tenant_id,
                id,
                UnitRecord {
                    number: &payload.number,
                    block: payload.block.as_deref(),
                    floor: payload.floor,
                    area: payload.area,
                    owner_name: payload.owner_name.as_deref(),
                    owner_email: payload.owner_email.as_deref(),
                    owner_phone: payload.owner_phone.as_deref(),
                    occupied: payload.occupied.unwrap_or(current.occupied),
                },
                payload.active.unwrap_or(current.active),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Unidade não encontrada.".to_string()))
    }

    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let affected = self.unit_repo.soft_delete(tenant_id, id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Unidade não encontrada.".to_string()));
        }
        Ok(())
    }
}
