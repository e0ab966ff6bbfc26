//! Red-flag (atensi) workflow engine.
//!
//! Every service works through a [`UnitOfWork`](cacm_desa_db::UnitOfWork), so
//! the same code runs against Postgres in production and against the
//! in-memory store of [`test_helper`] in tests.

pub mod aggregator;
pub mod auth;
pub mod catalog;
pub mod dispatch;
pub mod documentation;
pub mod history;
pub mod identification;
pub mod period;
pub mod procedure;
pub mod scope;
pub mod village;

pub use aggregator::{CounterDrift, FindingAggregator};
pub use auth::{AdminCredentialValidator, MobileCredentialValidator};
pub use catalog::FlagTypeCatalog;
pub use dispatch::{DispatchEngine, DispatchSummary};
pub use documentation::DocumentationService;
pub use identification::IdentificationTrigger;
pub use period::PeriodManager;
pub use scope::ScopeResolver;
pub use village::VillagePortal;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helper;
