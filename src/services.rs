// src/services.rs
//
// Camada de serviços: regras de negócio entre os handlers HTTP e os
// repositórios.

pub mod auth;
pub mod document_service;
pub mod email_service;
pub mod folder_service;
pub mod invite_service;
pub mod storage_service;
pub mod tenancy_service;
pub mod unit_service;
pub mod user_service;

pub use auth::AuthService;
pub use document_service::DocumentService;
pub use email_service::EmailService;
pub use folder_service::FolderService;
pub use invite_service::InviteService;
pub use storage_service::StorageService;
pub use tenancy_service::TenantService;
pub use unit_service::UnitService;
pub use user_service::UserService;
