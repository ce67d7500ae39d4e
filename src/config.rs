// src/config.rs

use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        DocumentRepository, FolderRepository, InviteRepository, MembershipRepository,
        TenantRepository, UnitRepository, UserRepository,
    },
    services::{
        auth::AuthService, document_service::DocumentService, email_service,
        email_service::EmailService, folder_service::FolderService,
        invite_service::InviteService, storage_service::StorageService,
        tenancy_service::TenantService, unit_service::UnitService, user_service::UserService,
    },
};

// Configuração imutável, lida uma única vez do ambiente.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub port: u16,
    pub env: String,
    pub app_base_url: String,
    pub email_from: String,
    pub resend_api_key: Option<String>,
    pub storage: StorageConfig,
}

#[derive(Clone)]
pub struct StorageConfig {
    // Endpoint customizado (MinIO local); None usa o padrão da AWS
    pub endpoint: Option<String>,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub use_path_style: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = require_env("DATABASE_URL")?;
        let jwt_secret = require_env("JWT_SECRET")?;

        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("JWT_EXPIRATION_HOURS inválida: {}", e))?
            .unwrap_or(24);

        let port = env::var("PORT")
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("PORT inválida: {}", e))?
            .unwrap_or(3000);

        let storage = StorageConfig {
            endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "condominio-docs".to_string()),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key: require_env("S3_ACCESS_KEY")?,
            secret_key: require_env("S3_SECRET_KEY")?,
            use_path_style: env::var("S3_USE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            port,
            env: env::var("ENV").unwrap_or_else(|_| "development".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "nao-responda@condominio.app".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|v| !v.is_empty()),
            storage,
        })
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{} deve ser definida", name))
}

// Estado compartilhado da aplicação: a pool e os serviços já montados.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub user_service: UserService,
    pub unit_service: UnitService,
    pub folder_service: FolderService,
    pub document_service: DocumentService,
    pub invite_service: InviteService,
    pub email_service: EmailService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let storage = StorageService::from_config(&config.storage).await?;
        let email_service = email_service::from_config(&config);

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let membership_repo = MembershipRepository::new(db_pool.clone());
        let unit_repo = UnitRepository::new(db_pool.clone());
        let folder_repo = FolderRepository::new(db_pool.clone());
        let document_repo = DocumentRepository::new(db_pool.clone());
        let invite_repo = InviteRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            tenant_repo.clone(),
            membership_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        );
        let tenant_service = TenantService::new(
            db_pool.clone(),
            tenant_repo.clone(),
            membership_repo.clone(),
        );
        let user_service = UserService::new(
            db_pool.clone(),
            user_repo.clone(),
            membership_repo.clone(),
            unit_repo.clone(),
        );
        let unit_service = UnitService::new(unit_repo);
        let folder_service = FolderService::new(db_pool.clone(), folder_repo.clone());
        let document_service = DocumentService::new(document_repo, folder_repo, storage);
        let invite_service = InviteService::new(
            db_pool.clone(),
            invite_repo,
            user_repo,
            membership_repo,
            tenant_repo,
            email_service.clone(),
            config.app_base_url.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        );

        Ok(Self {
            db_pool,
            config,
            auth_service,
            tenant_service,
            user_service,
            unit_service,
            folder_service,
            document_service,
            invite_service,
            email_service,
        })
    }
}
