pub mod document_repo;
pub mod folder_repo;
pub mod invite_repo;
pub mod membership_repo;
pub mod tenancy_repo;
pub mod unit_repo;
pub mod user_repo;

pub use document_repo::{DocumentRecord, DocumentRepository};
pub use folder_repo::FolderRepository;
pub use invite_repo::InviteRepository;
pub use membership_repo::MembershipRepository;
pub use tenancy_repo::TenantRepository;
pub use unit_repo::{UnitRecord, UnitRepository};
pub use user_repo::UserRepository;
