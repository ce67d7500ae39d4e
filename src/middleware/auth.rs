// src/middleware/auth.rs
//
// Guardas de autenticação. São stateless: confiam nos claims do token e
// nunca tocam o banco; revogação acontece só pela expiração do token.

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, security},
    config::AppState,
    models::tenancy::UserRole,
};

// Identidade autenticada, extraída dos claims e inserida nas extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub active_tenant_id: Option<Uuid>,
    pub active_role: Option<UserRole>,
}

pub(crate) fn authenticate(
    headers: &HeaderMap,
    jwt_secret: &str,
) -> Result<AuthenticatedUser, AppError> {
    let header_value = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    let token = security::extract_bearer(header_value).ok_or(AppError::InvalidToken)?;
    let claims = security::decode_token(token, jwt_secret)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        active_tenant_id: claims.active_tenant_id,
        active_role: claims.active_role,
    })
}

/// Exige um token válido; o tenant ativo é opcional (sessões órfãs passam).
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &app_state.config.jwt_secret)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Exige token válido E tenant ativo no claim; insere também o TenantContext.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &app_state.config.jwt_secret)?;

    let context = match (user.active_tenant_id, user.active_role) {
        (Some(tenant_id), Some(role)) => super::tenancy::TenantContext { tenant_id, role },
        _ => {
            return Err(AppError::Forbidden(
                "Nenhum condomínio ativo na sessão. Selecione um condomínio.".to_string(),
            ))
        }
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

// Extrator para os handlers. Reaproveita o que um guard já inseriu nas
// extensions; em rotas sem guard, valida o cabeçalho Authorization aqui.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }
        let app_state = AppState::from_ref(state);
        authenticate(&parts.headers, &app_state.config.jwt_secret)
    }
}
