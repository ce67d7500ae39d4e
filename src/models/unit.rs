// src/models/unit.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// Unidade (apartamento/casa) de um condomínio.
// O número é único por condomínio; condomínios diferentes podem repetir "101".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub number: String,
    pub block: Option<String>,
    pub floor: Option<i32>,
    pub area: Option<Decimal>,

    // Contato do proprietário (opcional)
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,

    pub occupied: bool,
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUnitPayload {
    #[validate(length(min = 1, max = 50, message = "O número da unidade é obrigatório."))]
    pub number: String,
    pub block: Option<String>,
    pub floor: Option<i32>,
    pub area: Option<Decimal>,
    pub owner_name: Option<String>,
    #[validate(email(message = "O e-mail do proprietário é inválido."))]
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,
    pub occupied: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UnitListQuery {
    pub block: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUnitPayload {
    #[validate(length(min = 1, max = 50, message = "O número da unidade é obrigatório."))]
    pub number: String,
    pub block: Option<String>,
    pub floor: Option<i32>,
    pub area: Option<Decimal>,
    pub owner_name: Option<String>,
    #[validate(email(message = "O e-mail do proprietário é inválido."))]
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,
    pub occupied: Option<bool>,
    pub active: Option<bool>,
}
