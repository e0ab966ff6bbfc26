pub mod domain;
pub mod error;
pub mod requests;
pub mod service;

pub use domain::*;
pub use error::*;
pub use requests::*;
pub use service::*;
