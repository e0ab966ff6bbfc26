pub mod admin_session;
pub mod legacy_user;
pub mod tenant;
pub mod village;

pub use admin_session::*;
pub use legacy_user::*;
pub use tenant::*;
pub use village::*;
