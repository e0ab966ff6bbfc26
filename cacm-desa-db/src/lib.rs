pub mod models;
pub mod repository;
pub mod unit_of_work;
pub mod utils;

pub use models::*;
pub use repository::*;
pub use unit_of_work::*;
