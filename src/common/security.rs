// src/common/security.rs
//
// Utilitários de senha (bcrypt) e de token (JWT). As funções de bcrypt são
// síncronas; os serviços as executam dentro de `spawn_blocking`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Claims, User},
    models::tenancy::UserRole,
};

const PASSWORD_MIN_LEN: usize = 6;
// Limite do próprio bcrypt
const PASSWORD_MAX_LEN: usize = 72;

pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(plain, hash)
}

/// Regra mínima de força de senha: entre 6 e 72 caracteres.
pub fn validate_password_strength(plain: &str) -> Result<(), AppError> {
    if plain.len() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(
            "A senha deve ter no mínimo 6 caracteres.".to_string(),
        ));
    }
    if plain.len() > PASSWORD_MAX_LEN {
        return Err(AppError::Validation(
            "A senha deve ter no máximo 72 caracteres.".to_string(),
        ));
    }
    Ok(())
}

/// Gera um token HS256 para o usuário. `active` carrega o tenant ativo e o
/// papel do usuário nele; `None` para sessões órfãs (usuário sem condomínio).
pub fn generate_token(
    user: &User,
    active: Option<(Uuid, UserRole)>,
    secret: &str,
    expiration_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(expiration_hours);

    let (active_tenant_id, active_role) = match active {
        Some((tenant_id, role)) => (Some(tenant_id), Some(role)),
        None => (None, None),
    };

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        active_tenant_id,
        active_role,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Valida assinatura e expiração. Qualquer falha vira o mesmo `InvalidToken`,
/// sem distinguir adulteração de expiração.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}

/// Extrai o token do valor do cabeçalho `Authorization: Bearer <token>`.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    const SECRET: &str = "segredo-de-teste";

    fn fake_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "morador@exemplo.com".to_string(),
            password_hash: String::new(),
            name: "Morador Teste".to_string(),
            phone: None,
            cpf: None,
            unit_id: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn hash_e_verificacao_de_senha() {
        let hash = hash_password("senha123").unwrap();
        assert!(verify_password("senha123", &hash).unwrap());
        assert!(!verify_password("senha124", &hash).unwrap());
    }

    #[test]
    fn forca_de_senha() {
        assert!(validate_password_strength("12345").is_err());
        assert!(validate_password_strength("123456").is_ok());
        assert!(validate_password_strength(&"a".repeat(72)).is_ok());
        assert!(validate_password_strength(&"a".repeat(73)).is_err());
    }

    #[test]
    fn token_com_tenant_ativo_roundtrip() {
        let user = fake_user();
        let tenant_id = Uuid::new_v4();
        let token =
            generate_token(&user, Some((tenant_id, UserRole::Sindico)), SECRET, 24).unwrap();

        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.active_tenant_id, Some(tenant_id));
        assert_eq!(claims.active_role, Some(UserRole::Sindico));
    }

    #[test]
    fn token_orfao_nao_carrega_tenant() {
        let user = fake_user();
        let token = generate_token(&user, None, SECRET, 24).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert!(claims.active_tenant_id.is_none());
        assert!(claims.active_role.is_none());
    }

    #[test]
    fn token_com_segredo_errado_rejeitado() {
        let user = fake_user();
        let token = generate_token(&user, None, SECRET, 24).unwrap();
        assert!(matches!(
            decode_token(&token, "outro-segredo"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn token_expirado_rejeitado() {
        let user = fake_user();
        // Expiração negativa coloca `exp` no passado
        let token = generate_token(&user, None, SECRET, -1).unwrap();
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn extracao_do_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer("bearer abc"), None);
        assert_eq!(extract_bearer("abc"), None);
    }

    #[test]
    fn expiracao_respeita_horas_configuradas() {
        let user = fake_user();
        let token = generate_token(&user, None, SECRET, 24).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        let exp = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0).unwrap();
        let delta = exp - Utc::now();
        assert!(delta > chrono::Duration::hours(23));
        assert!(delta <= chrono::Duration::hours(24));
    }
}
