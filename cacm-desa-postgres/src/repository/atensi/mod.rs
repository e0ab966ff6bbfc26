pub mod atensi_period_repository;
pub mod flag_detail_repository;
pub mod flag_type_repository;
pub mod identification_log_repository;
pub mod status_history_repository;
pub mod village_finding_repository;

pub use atensi_period_repository::AtensiPeriodRepositoryImpl;
pub use flag_detail_repository::FlagDetailRepositoryImpl;
pub use flag_type_repository::FlagTypeRepositoryImpl;
pub use identification_log_repository::IdentificationLogRepositoryImpl;
pub use status_history_repository::StatusHistoryRepositoryImpl;
pub use village_finding_repository::VillageFindingRepositoryImpl;
