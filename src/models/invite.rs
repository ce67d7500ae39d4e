// src/models/invite.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::tenancy::UserRole;

// Ciclo de vida do convite. As transições gravadas são apenas
// pending -> accepted e pending -> cancelled; "expired" é um estado virtual,
// derivado de `expires_at` na leitura, nunca escrito por um varredor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Expired,
    Cancelled,
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InviteStatus::Pending => "pendente",
            InviteStatus::Accepted => "aceito",
            InviteStatus::Expired => "expirado",
            InviteStatus::Cancelled => "cancelado",
        };
        write!(f, "{}", s)
    }
}

// Convite para um e-mail entrar em um condomínio com um papel proposto.
// O token é aleatório, único e nunca reutilizado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub token: String,
    pub status: InviteStatus,
    pub invited_by_user_id: Uuid,
    pub accepted_by_user_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invite {
    /// Convite ainda aceitável: pendente e dentro do prazo.
    pub fn is_valid(&self) -> bool {
        self.status == InviteStatus::Pending && !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Estado observável do convite: um pendente já vencido lê como
    /// "expired" sem que nada seja gravado no banco.
    pub fn effective_status(&self) -> InviteStatus {
        if self.status == InviteStatus::Pending && self.is_expired() {
            InviteStatus::Expired
        } else {
            self.status
        }
    }

    /// Normaliza o status gravado para o observável antes de serializar.
    pub fn with_effective_status(mut self) -> Self {
        self.status = self.effective_status();
        self
    }
}

// Visão pública do convite (consulta por token): o convidado vê o condomínio
// e o papel propostos antes de aceitar.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteDetails {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitePayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub role: UserRole,
}

// Nome e senha são exigidos apenas quando o e-mail convidado ainda não
// possui conta.
#[derive(Debug, Deserialize, Validate)]
pub struct AcceptInvitePayload {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invite_with(status: InviteStatus, expires_at: DateTime<Utc>) -> Invite {
        Invite {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "convidado@exemplo.com".into(),
            role: UserRole::Morador,
            token: Uuid::new_v4().to_string(),
            status,
            invited_by_user_id: Uuid::new_v4(),
            accepted_by_user_id: None,
            expires_at,
            accepted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pendente_dentro_do_prazo_e_valido() {
        let invite = invite_with(InviteStatus::Pending, Utc::now() + Duration::days(7));
        assert!(invite.is_valid());
        assert!(!invite.is_expired());
    }

    #[test]
    fn pendente_vencido_nao_e_valido() {
        let invite = invite_with(InviteStatus::Pending, Utc::now() - Duration::hours(1));
        assert!(!invite.is_valid());
        assert!(invite.is_expired());
    }

    #[test]
    fn cancelado_nunca_e_valido_mesmo_no_prazo() {
        let invite = invite_with(InviteStatus::Cancelled, Utc::now() + Duration::days(7));
        assert!(!invite.is_valid());
        assert!(!invite.is_expired());
    }

    #[test]
    fn status_observavel_de_pendente_vencido_e_expirado() {
        let invite = invite_with(InviteStatus::Pending, Utc::now() - Duration::hours(1));
        assert_eq!(invite.effective_status(), InviteStatus::Expired);

        let cancelled = invite_with(InviteStatus::Cancelled, Utc::now() - Duration::hours(1));
        assert_eq!(cancelled.effective_status(), InviteStatus::Cancelled);
    }

    #[test]
    fn aceito_nunca_e_valido() {
        let invite = invite_with(InviteStatus::Accepted, Utc::now() + Duration::days(7));
        assert!(!invite.is_valid());
    }
}
