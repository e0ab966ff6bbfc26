//! HTTP surface of the red-flag follow-up workflow.
//!
//! Two session namespaces share one router: the admin console under `/api`
//! and the village portal under `/mobile/api`.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod session;
pub mod state;

pub use error::{AppError, HandlerResult};
pub use routes::router;
pub use state::{AppState, Settings};
