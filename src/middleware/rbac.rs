// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::UserRole,
};

// Porteiro das rotas de administração da plataforma (/api/admin): exige que
// o papel carregado no claim seja admin. Handlers que declaram este extrator
// só executam para administradores.
pub struct GlobalAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for GlobalAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.active_role != Some(UserRole::Admin) {
            return Err(AppError::Forbidden(
                "Acesso restrito a administradores da plataforma.".to_string(),
            ));
        }

        Ok(GlobalAdmin(user))
    }
}
