// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Papel do usuário dentro de um condomínio
// ---
// O papel vive SEMPRE na tabela-ponte (user_tenants), nunca no usuário:
// a mesma pessoa pode ser síndico em um condomínio e morador em outro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Sindico,
    Morador,
}

impl UserRole {
    /// Papéis que podem administrar membros e convites de um condomínio.
    pub fn can_manage_tenant(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Sindico)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => "admin",
            UserRole::Sindico => "sindico",
            UserRole::Morador => "morador",
        };
        write!(f, "{}", s)
    }
}

// ---
// 2. Tenant (O Condomínio)
// ---
// A conta principal do SaaS; unidade de isolamento de dados.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub cnpj: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// ---
// 3. UserTenant (A "Ponte" Usuário-Condomínio)
// ---
// Um usuário tem no máximo UM papel por condomínio (chave única user+tenant).
// Desativar (is_active = false) revoga o acesso preservando o histórico;
// a remoção explícita do condomínio apaga a linha de verdade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserTenant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: UserRole,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 4. Projeções
// ---

// Opção de condomínio devolvida no login quando o usuário pertence a vários
// (e também em "meus condomínios").
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TenantSelection {
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub role: UserRole,
}

// Membro de um condomínio: user_tenants + dados do usuário em uma linha só.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TenantMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub unit_id: Option<Uuid>,
}

// ---
// 5. Payloads
// ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "O nome do condomínio é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O CNPJ é obrigatório."))]
    pub cnpj: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantPayload {
    #[validate(length(min = 1, message = "O nome do condomínio é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

// Campos ausentes não são tocados. `unit_id` vincula o morador a uma
// unidade; `clear_unit` desvincula. Campos em snake_case, como nos demais
// payloads de entrada.
#[derive(Debug, Deserialize)]
pub struct UpdateMembershipPayload {
    pub is_active: Option<bool>,
    pub unit_id: Option<Uuid>,
    #[serde(default)]
    pub clear_unit: bool,
}

#[derive(Debug, Deserialize)]
pub struct MemberListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
}

// Página de membros com o total para o cliente calcular a navegação.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPage {
    pub members: Vec<TenantMember>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apenas_admin_e_sindico_administram() {
        assert!(UserRole::Admin.can_manage_tenant());
        assert!(UserRole::Sindico.can_manage_tenant());
        assert!(!UserRole::Morador.can_manage_tenant());
    }

    #[test]
    fn papel_serializa_em_minusculas() {
        assert_eq!(
            serde_json::to_string(&UserRole::Sindico).unwrap(),
            "\"sindico\""
        );
        let role: UserRole = serde_json::from_str("\"morador\"").unwrap();
        assert_eq!(role, UserRole::Morador);
    }

    #[test]
    fn payload_de_vinculo_aceita_snake_case() {
        let payload: UpdateMembershipPayload =
            serde_json::from_str(r#"{"is_active": false, "unit_id": null}"#).unwrap();
        assert_eq!(payload.is_active, Some(false));
        assert!(payload.unit_id.is_none());
        assert!(!payload.clear_unit);

        // camelCase não é reconhecido: o campo desconhecido fica ignorado
        // e o flag mantém o default.
        let payload: UpdateMembershipPayload =
            serde_json::from_str(r#"{"clearUnit": true}"#).unwrap();
        assert!(!payload.clear_unit);
    }
}
