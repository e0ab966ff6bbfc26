pub mod admin_session_repository;
pub mod atensi_period_repository;
pub mod create_batch;
pub mod delete_batch;
pub mod error;
pub mod find_by_id;
pub mod flag_detail_repository;
pub mod flag_type_repository;
pub mod identification_log_repository;
pub mod legacy_user_repository;
pub mod load_batch;
pub mod pagination;
pub mod procedures;
pub mod status_history_repository;
pub mod tenant_repository;
pub mod update_batch;
pub mod village_finding_repository;
pub mod village_repository;

// Re-exports
pub use admin_session_repository::*;
pub use atensi_period_repository::*;
pub use create_batch::*;
pub use delete_batch::*;
pub use error::*;
pub use find_by_id::*;
pub use flag_detail_repository::*;
pub use flag_type_repository::*;
pub use identification_log_repository::*;
pub use legacy_user_repository::*;
pub use load_batch::*;
pub use pagination::*;
pub use procedures::*;
pub use status_history_repository::*;
pub use tenant_repository::*;
pub use update_batch::*;
pub use village_finding_repository::*;
pub use village_repository::*;
