pub mod codes;
pub mod identity;
pub mod scope;

pub use codes::*;
pub use identity::*;
pub use scope::*;
