pub mod admin_session_repository;
pub mod legacy_user_repository;
pub mod tenant_repository;
pub mod village_repository;

pub use admin_session_repository::AdminSessionRepositoryImpl;
pub use legacy_user_repository::LegacyUserRepositoryImpl;
pub use tenant_repository::TenantRepositoryImpl;
pub use village_repository::VillageRepositoryImpl;
