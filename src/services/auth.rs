// src/services/auth.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, security},
    db::{MembershipRepository, TenantRepository, UserRepository},
    models::auth::{LoginResponse, RegisterUserPayload, User},
    models::tenancy::{TenantSelection, UserRole},
};

// Decisão de sessão após as credenciais conferirem, em função dos vínculos
// ativos do usuário. Separada em função pura para ser testável sem banco.
#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    // Usuário órfão: token sem claim de tenant
    Orphan,
    // Um único condomínio ativo: token já escopado nele
    SingleTenant(TenantSelection),
    // Vários condomínios: NENHUM token; o cliente escolhe um
    ChooseTenant(Vec<TenantSelection>),
}

pub fn resolve_login(mut selections: Vec<TenantSelection>) -> LoginOutcome {
    match selections.len() {
        0 => LoginOutcome::Orphan,
        1 => LoginOutcome::SingleTenant(selections.remove(0)),
        _ => LoginOutcome::ChooseTenant(selections),
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    membership_repo: MembershipRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        membership_repo: MembershipRepository,
        jwt_secret: String,
        jwt_expiration_hours: i64,
    ) -> Self {
        Self {
            user_repo,
            tenant_repo,
            membership_repo,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    /// Cria um usuário órfão (sem condomínio). O vínculo nasce depois, por
    /// convite ou auto-criação de condomínio.
    pub async fn register(&self, payload: &RegisterUserPayload) -> Result<User, AppError> {
        security::validate_password_strength(&payload.password)?;

        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::Conflict("E-mail já cadastrado.".to_string()));
        }

        // Hashing em thread separada para não bloquear o runtime
        let password = payload.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || security::hash_password(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create_user(
                self.user_repo.pool(),
                &payload.email,
                &password_hash,
                &payload.name,
                payload.phone.as_deref(),
                payload.cpf.as_deref(),
            )
            .await
    }

    /// Autentica e decide a sessão pelo número de vínculos ativos:
    /// 0 => token órfão; 1 => token escopado; N => lista para escolha, sem token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self.check_credentials(email, password).await?;

        let selections = self.tenant_repo.tenants_for_user(user.id).await?;

        match resolve_login(selections) {
            LoginOutcome::Orphan => {
                let token =
                    security::generate_token(&user, None, &self.jwt_secret, self.jwt_expiration_hours)?;
                Ok(LoginResponse {
                    token: Some(token),
                    user,
                    tenants: None,
                })
            }
            LoginOutcome::SingleTenant(selection) => {
                let token = security::generate_token(
                    &user,
                    Some((selection.tenant_id, selection.role)),
                    &self.jwt_secret,
                    self.jwt_expiration_hours,
                )?;
                Ok(LoginResponse {
                    token: Some(token),
                    user,
                    tenants: None,
                })
            }
            LoginOutcome::ChooseTenant(selections) => Ok(LoginResponse {
                token: None,
                user,
                tenants: Some(selections),
            }),
        }
    }

    /// Mesma checagem de credenciais do login, mas já escopando o token no
    /// condomínio pedido (exige vínculo ativo nele).
    pub async fn login_with_tenant(
        &self,
        email: &str,
        password: &str,
        tenant_id: Uuid,
    ) -> Result<LoginResponse, AppError> {
        let user = self.check_credentials(email, password).await?;
        let role = self.require_active_membership(user.id, tenant_id).await?;

        let token = security::generate_token(
            &user,
            Some((tenant_id, role)),
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )?;

        Ok(LoginResponse {
            token: Some(token),
            user,
            tenants: None,
        })
    }

    /// Emite um novo token com outro tenant ativo. O token anterior continua
    /// válido até expirar (tokens são stateless, sem revogação).
    pub async fn switch_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".to_string()))?;

        let role = self.require_active_membership(user_id, tenant_id).await?;

        security::generate_token(
            &user,
            Some((tenant_id, role)),
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )
    }

    // Busca o usuário e confere a senha. Mensagem constante para usuário
    // inexistente e senha errada, evitando enumeração de e-mails.
    async fn check_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_valid = tokio::task::spawn_blocking(move || {
            security::verify_password(&password, &password_hash)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.active {
            return Err(AppError::Auth("Conta de usuário inativa.".to_string()));
        }

        Ok(user)
    }

    async fn require_active_membership(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<UserRole, AppError> {
        let membership = self
            .membership_repo
            .find(user_id, tenant_id)
            .await?
            .ok_or_else(|| {
                AppError::Auth("Usuário não pertence a este condomínio.".to_string())
            })?;

        if !membership.is_active {
            return Err(AppError::Auth(
                "Acesso do usuário a este condomínio está inativo.".to_string(),
            ));
        }

        Ok(membership.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(name: &str, role: UserRole) -> TenantSelection {
        TenantSelection {
            tenant_id: Uuid::new_v4(),
            tenant_name: name.to_string(),
            role,
        }
    }

    #[test]
    fn sem_vinculos_vira_sessao_orfa() {
        assert_eq!(resolve_login(vec![]), LoginOutcome::Orphan);
    }

    #[test]
    fn um_vinculo_escopa_o_token() {
        let outcome = resolve_login(vec![selection("Residencial A", UserRole::Morador)]);
        match outcome {
            LoginOutcome::SingleTenant(sel) => {
                assert_eq!(sel.tenant_name, "Residencial A");
                assert_eq!(sel.role, UserRole::Morador);
            }
            other => panic!("esperava SingleTenant, veio {:?}", other),
        }
    }

    #[test]
    fn varios_vinculos_devolvem_lista_sem_token() {
        let outcome = resolve_login(vec![
            selection("Residencial A", UserRole::Sindico),
            selection("Residencial B", UserRole::Morador),
        ]);
        match outcome {
            LoginOutcome::ChooseTenant(list) => assert_eq!(list.len(), 2),
            other => panic!("esperava ChooseTenant, veio {:?}", other),
        }
    }
}
