// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::tenancy::{TenantSelection, UserRole};

// Representa um usuário vindo do banco de dados.
// O usuário é independente de condomínio: o vínculo (e o papel) nasce apenas
// em user_tenants.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub name: String,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub unit_id: Option<Uuid>,
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Projeção de usuário combinada com os dados do vínculo em um condomínio.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInTenant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub unit_id: Option<Uuid>,
}

// Estrutura de dados ("claims") dentro do JWT.
// O tenant ativo é opcional: usuários órfãos recebem token sem ele.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tenant_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_role: Option<UserRole>,
    pub iat: usize,
    pub exp: usize,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, max = 72, message = "A senha deve ter entre 6 e 72 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub phone: Option<String>,
    pub cpf: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(max = 20, message = "O telefone deve ter no máximo 20 caracteres."))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "A senha atual é obrigatória."))]
    pub old_password: String,
    #[validate(length(min = 1, message = "A nova senha é obrigatória."))]
    pub new_password: String,
}

// ---
// Respostas
// ---

// Resultado do login. Quando o usuário pertence a vários condomínios ativos,
// NENHUM token é emitido: o cliente escolhe um e chama login/tenant/{id}.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenants: Option<Vec<TenantSelection>>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn registro_rejeita_senha_curta() {
        let payload = RegisterUserPayload {
            email: "a@b.com".into(),
            password: "12345".into(),
            name: "Fulano".into(),
            phone: None,
            cpf: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn registro_rejeita_email_invalido() {
        let payload = RegisterUserPayload {
            email: "nao-e-email".into(),
            password: "123456".into(),
            name: "Fulano".into(),
            phone: None,
            cpf: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn senha_nunca_aparece_no_json() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "hash-secreto".into(),
            name: "Fulano".into(),
            phone: None,
            cpf: None,
            unit_id: None,
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            deleted_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hash-secreto"));
        assert!(!json.contains("passwordHash"));
    }
}
