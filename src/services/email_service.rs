// src/services/email_service.rs
//
// Canal lateral de notificação, melhor-esforço: falha de envio é logada e
// nunca derruba a requisição que a originou.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::{common::error::AppError, config::Config};

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError>;
}

pub type EmailService = Arc<dyn EmailSender>;

// Em desenvolvimento, apenas loga o e-mail no console.
pub struct ConsoleMailer;

#[async_trait]
impl EmailSender for ConsoleMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        tracing::info!("📧 [EMAIL] Para: {} | Assunto: {}\n{}", to, subject, html);
        Ok(())
    }
}

// Em produção, envia via API HTTP da Resend.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from_address: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        let payload = json!({
            "from": self.from_address,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::InternalServerError(anyhow::anyhow!("Falha ao enviar e-mail: {}", e))
            })?;

        if response.status().is_client_error() || response.status().is_server_error() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "Erro da API Resend (status {}): {}",
                status,
                body
            )));
        }

        Ok(())
    }
}

/// Escolhe a implementação conforme o ambiente.
pub fn from_config(config: &Config) -> EmailService {
    match &config.resend_api_key {
        Some(api_key) if config.env != "development" => {
            tracing::info!("Usando serviço de e-mail Resend");
            Arc::new(ResendMailer::new(
                api_key.clone(),
                config.email_from.clone(),
            ))
        }
        _ => {
            tracing::info!("Usando serviço de e-mail de console (modo desenvolvimento)");
            Arc::new(ConsoleMailer)
        }
    }
}
