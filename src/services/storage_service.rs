// src/services/storage_service.rs
//
// Colaborador de armazenamento de objetos (S3/MinIO). O resto do sistema só
// conhece esta interface estreita: upload / delete / URL pré-assinada.

use std::time::Duration;

use anyhow::Context;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client as S3Client,
};

use crate::{common::error::AppError, config::StorageConfig};

#[derive(Clone)]
pub struct StorageService {
    client: S3Client,
    bucket: String,
}

impl StorageService {
    pub async fn from_config(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let region = Region::new(cfg.region.clone());
        let region_provider = RegionProviderChain::first_try(Some(region))
            .or_default_provider()
            .or_else("us-east-1");

        #[allow(deprecated)]
        let mut loader = aws_config::from_env().region(region_provider);

        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let credentials =
            Credentials::new(cfg.access_key.clone(), cfg.secret_key.clone(), None, None, "static");
        loader = loader.credentials_provider(credentials);

        let base_config = loader.load().await;
        let s3_config = S3ConfigBuilder::from(&base_config)
            .force_path_style(cfg.use_path_style)
            .build();

        let service = Self {
            client: S3Client::from_conf(s3_config),
            bucket: cfg.bucket.clone(),
        };

        // Cria o bucket se não existir (útil para o MinIO local)
        service.ensure_bucket().await?;

        Ok(service)
    }

    async fn ensure_bucket(&self) -> anyhow::Result<()> {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();

        if !exists {
            self.client
                .create_bucket()
                .bucket(&self.bucket)
                .send()
                .await
                .with_context(|| format!("Falha ao criar o bucket {}", self.bucket))?;
            tracing::info!("🪣 Bucket '{}' criado.", self.bucket);
        }

        Ok(())
    }

    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "Falha ao enviar objeto para o storage: {}",
                    e
                ))
            })?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "Falha ao apagar objeto do storage: {}",
                    e
                ))
            })?;
        Ok(())
    }

    pub async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, AppError> {
        let presign_config = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "Falha ao montar configuração de pré-assinatura: {}",
                    e
                ))
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "Falha ao gerar URL de download: {}",
                    e
                ))
            })?;

        Ok(presigned.uri().to_string())
    }
}
