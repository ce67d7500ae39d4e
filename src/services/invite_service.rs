// src/services/invite_service.rs
//
// Ciclo de vida do convite: pending -> accepted | cancelled, com expiração
// virtual (avaliada na leitura, nunca gravada por um varredor).

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, security},
    db::{InviteRepository, MembershipRepository, TenantRepository, UserRepository},
    models::auth::AuthResponse,
    models::invite::{AcceptInvitePayload, CreateInvitePayload, Invite, InviteDetails, InviteStatus},
    models::tenancy::UserRole,
};

use super::email_service::EmailService;

const INVITE_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct InviteService {
    pool: PgPool,
    invite_repo: InviteRepository,
    user_repo: UserRepository,
    membership_repo: MembershipRepository,
    tenant_repo: TenantRepository,
    email_service: EmailService,
    app_base_url: String,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl InviteService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        invite_repo: InviteRepository,
        user_repo: UserRepository,
        membership_repo: MembershipRepository,
        tenant_repo: TenantRepository,
        email_service: EmailService,
        app_base_url: String,
        jwt_secret: String,
        jwt_expiration_hours: i64,
    ) -> Self {
        Self {
            pool,
            invite_repo,
            user_repo,
            membership_repo,
            tenant_repo,
            email_service,
            app_base_url,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    /// Cria um convite para um e-mail entrar no condomínio do contexto.
    /// Só admin/síndico convidam; o e-mail alvo não pode já ser membro ativo
    /// nem ter outro convite válido pendente para o mesmo condomínio.
    pub async fn create_invite(
        &self,
        tenant_id: Uuid,
        inviter_id: Uuid,
        inviter_role: UserRole,
        payload: &CreateInvitePayload,
    ) -> Result<Invite, AppError> {
        payload.validate()?;

        if !inviter_role.can_manage_tenant() {
            return Err(AppError::Forbidden(
                "Apenas administradores e síndicos podem convidar.".to_string(),
            ));
        }

        if let Some(existing_user) = self.user_repo.find_by_email(&payload.email).await? {
            if self
                .membership_repo
                .is_active_member(existing_user.id, tenant_id)
                .await?
            {
                return Err(AppError::Conflict(
                    "Este e-mail já pertence ao condomínio.".to_string(),
                ));
            }
        }

        let pending = self.invite_repo.pending_by_email(&payload.email).await?;
        if pending
            .iter()
            .any(|i| i.tenant_id == tenant_id && i.is_valid())
        {
            return Err(AppError::Conflict(
                "Já existe um convite pendente para este e-mail.".to_string(),
            ));
        }

        let token = new_invite_token();
        let expires_at = Utc::now() + Duration::days(INVITE_TTL_DAYS);

        let invite = self
            .invite_repo
            .create(
                tenant_id,
                &payload.email,
                payload.role,
                &token,
                inviter_id,
                expires_at,
            )
            .await?;

        self.notify_invitee(&invite).await;

        Ok(invite)
    }

    /// Consulta pública por token, com o nome do condomínio para exibição.
    pub async fn get_by_token(&self, token: &str) -> Result<InviteDetails, AppError> {
        let invite = self
            .invite_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Convite não encontrado.".to_string()))?;

        let tenant = self
            .tenant_repo
            .find_by_id(invite.tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Condomínio não encontrado.".to_string()))?;

        Ok(InviteDetails {
            id: invite.id,
            tenant_id: invite.tenant_id,
            tenant_name: tenant.name,
            email: invite.email.clone(),
            role: invite.role,
            status: invite.effective_status(),
            expires_at: invite.expires_at,
        })
    }

    /// Aceita um convite. Se o e-mail já tem conta, reutiliza-a (nome/senha
    /// do payload são ignorados); senão, exige nome e senha e cria a conta.
    /// Conta nova, vínculo e transição do convite acontecem na MESMA
    /// transação; a corrida de dupla aceitação é decidida pela chave única
    /// do vínculo e pelo predicado `status = 'pending'`.
    pub async fn accept_invite(
        &self,
        token: &str,
        payload: &AcceptInvitePayload,
    ) -> Result<AuthResponse, AppError> {
        let invite = self
            .invite_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Convite não encontrado.".to_string()))?;

        // Mensagens distintas: status errado reporta o estado concreto,
        // expiração tem mensagem própria
        if invite.status != InviteStatus::Pending {
            return Err(AppError::Validation(format!(
                "Este convite já foi {}.",
                invite.status
            )));
        }
        if invite.is_expired() {
            return Err(AppError::Validation("Este convite expirou.".to_string()));
        }

        enum Acceptor {
            Existing(crate::models::auth::User),
            New { name: String, password_hash: String },
        }

        // Conta nova: valida e faz o hash FORA da transação, para não segurar
        // a conexão durante o bcrypt.
        let acceptor = match self.user_repo.find_by_email(&invite.email).await? {
            Some(user) => {
                if self
                    .membership_repo
                    .is_active_member(user.id, invite.tenant_id)
                    .await?
                {
                    return Err(AppError::Conflict(
                        "Usuário já pertence a este condomínio.".to_string(),
                    ));
                }
                Acceptor::Existing(user)
            }
            None => {
                let name = payload
                    .name
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("O nome é obrigatório para criar a conta.".to_string())
                    })?
                    .to_owned();
                let password = payload.password.as_deref().ok_or_else(|| {
                    AppError::Validation("A senha é obrigatória para criar a conta.".to_string())
                })?;
                security::validate_password_strength(password)?;

                let password = password.to_owned();
                let password_hash =
                    tokio::task::spawn_blocking(move || security::hash_password(&password))
                        .await
                        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                Acceptor::New {
                    name,
                    password_hash,
                }
            }
        };

        let mut tx = self.pool.begin().await?;

        let user = match acceptor {
            Acceptor::Existing(user) => user,
            Acceptor::New {
                name,
                password_hash,
            } => {
                self.user_repo
                    .create_user(
                        &mut *tx,
                        &invite.email,
                        &password_hash,
                        &name,
                        payload.phone.as_deref(),
                        payload.cpf.as_deref(),
                    )
                    .await?
            }
        };

        self.membership_repo
            .create(&mut *tx, user.id, invite.tenant_id, invite.role)
            .await?;

        let updated = self
            .invite_repo
            .mark_accepted(&mut *tx, invite.id, user.id)
            .await?;
        if updated == 0 {
            // Outra aceitação venceu a corrida entre a leitura e o update
            return Err(AppError::Conflict("Convite já utilizado.".to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            "✅ Convite aceito: usuário {} entrou no condomínio {} como {}",
            user.id,
            invite.tenant_id,
            invite.role
        );

        let token = security::generate_token(
            &user,
            Some((invite.tenant_id, invite.role)),
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )?;

        Ok(AuthResponse { token })
    }

    /// Cancela um convite pendente. Permitido para quem convidou ou para
    /// admin/síndico do condomínio.
    pub async fn cancel_invite(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        invite_id: Uuid,
    ) -> Result<(), AppError> {
        let invite = self
            .invite_repo
            .find_by_id(invite_id)
            .await?
            .filter(|i| i.tenant_id == tenant_id)
            .ok_or_else(|| AppError::NotFound("Convite não encontrado.".to_string()))?;

        if invite.invited_by_user_id != actor_id && !actor_role.can_manage_tenant() {
            return Err(AppError::Forbidden(
                "Sem permissão para cancelar este convite.".to_string(),
            ));
        }

        let updated = self.invite_repo.mark_cancelled(invite.id).await?;
        if updated == 0 {
            return Err(AppError::Conflict(
                "Apenas convites pendentes podem ser cancelados.".to_string(),
            ));
        }

        Ok(())
    }

    /// Convites pendentes e ainda válidos de um e-mail (rota /api/invites/me).
    pub async fn pending_for_email(&self, email: &str) -> Result<Vec<Invite>, AppError> {
        let pending = self.invite_repo.pending_by_email(email).await?;
        Ok(pending.into_iter().filter(Invite::is_valid).collect())
    }

    /// Todos os convites do condomínio, com expiração virtualizada no status.
    pub async fn tenant_invites(&self, tenant_id: Uuid) -> Result<Vec<Invite>, AppError> {
        let invites = self.invite_repo.list_by_tenant(tenant_id).await?;
        Ok(invites
            .into_iter()
            .map(Invite::with_effective_status)
            .collect())
    }

    // Notificação melhor-esforço: roda em background e apenas loga falhas.
    async fn notify_invitee(&self, invite: &Invite) {
        let email_service = self.email_service.clone();
        let to = invite.email.clone();
        let link = format!("{}/convites/{}", self.app_base_url, invite.token);
        let role = invite.role;

        tokio::spawn(async move {
            let subject = "Você foi convidado para um condomínio";
            let html = format!(
                "<p>Você recebeu um convite para participar de um condomínio como <strong>{}</strong>.</p>\
                 <p><a href=\"{}\">Clique aqui para aceitar o convite</a>. O link vale por {} dias.</p>",
                role, link, INVITE_TTL_DAYS
            );
            if let Err(e) = email_service.send(&to, subject, &html).await {
                tracing::error!("Falha ao enviar e-mail de convite para {}: {}", to, e);
            }
        });
    }
}

// Token opaco de 64 caracteres hexadecimais, único por índice no banco.
fn new_invite_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_de_convite_tem_64_hex() {
        let token = new_invite_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_de_convite_nao_se_repetem() {
        assert_ne!(new_invite_token(), new_invite_token());
    }
}
