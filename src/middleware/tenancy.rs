// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::UserRole,
};

// O condomínio ativo da sessão e o papel do usuário nele. Todos os handlers
// tenant-scoped tiram o tenant_id DAQUI, nunca do corpo ou da URL.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for TenantContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<TenantContext>() {
            return Ok(*context);
        }

        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        match (user.active_tenant_id, user.active_role) {
            (Some(tenant_id), Some(role)) => Ok(TenantContext { tenant_id, role }),
            _ => Err(AppError::Forbidden(
                "Nenhum condomínio ativo na sessão. Selecione um condomínio.".to_string(),
            )),
        }
    }
}
