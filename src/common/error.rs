use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Os handlers são a única camada que transforma isso em resposta HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regra de negócio violada (campo obrigatório, senha fraca, etc.)
    #[error("{0}")]
    Validation(String),

    #[error("E-mail ou senha inválidos")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente")]
    InvalidToken,

    // Falha de autenticação com mensagem própria (conta inativa, etc.)
    #[error("{0}")]
    Auth(String),

    // Falta de permissão ou tenant errado
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    // Violação de unicidade. Nesta API responde 400, não 409.
    #[error("{0}")]
    Conflict(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Categoria textual usada no envelope de erro `{"error", "message"}`.
    fn category(&self) -> &'static str {
        match self {
            AppError::ValidationError(_)
            | AppError::Validation(_)
            | AppError::Conflict(_) => "Bad Request",
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::Auth(_) => {
                "Unauthorized"
            }
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "Not Found",
            _ => "Internal Server Error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::Validation(_)
            | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::Auth(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Validações do `validator` retornam todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Bad Request",
                "message": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let status = self.status();
        let message = match &self {
            // Erros internos não vazam detalhe para o cliente; o `tracing`
            // registra a mensagem completa que o `thiserror` nos deu.
            AppError::DatabaseError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_)
            | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {:?}", self);
                "Ocorreu um erro inesperado.".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.category(),
            "message": message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflito_responde_400_nesta_api() {
        let err = AppError::Conflict("e-mail já cadastrado".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.category(), "Bad Request");
    }

    #[test]
    fn taxonomia_de_status() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn erro_interno_nao_vaza_detalhe() {
        let response = AppError::InternalServerError(anyhow::anyhow!("segredo")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
