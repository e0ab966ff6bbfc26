//! The two credential validators.
//!
//! Admin sign-in checks an argon2 hash stored in the user table; village
//! sign-in is delegated to the legacy login procedure. Both implement
//! [`CredentialValidator`](cacm_desa_api::CredentialValidator).

pub mod admin;
pub mod mobile;
pub mod password;

pub use admin::AdminCredentialValidator;
pub use mobile::{interpret_login_result, LoginOutcome, MobileCredentialValidator, ObfuscationKeys};

use cacm_desa_api::error::{ApiError, AuthError};
use validator::ValidationErrors;

pub(crate) fn invalid_input(errors: ValidationErrors) -> AuthError {
    match ApiError::from(errors) {
        ApiError::ValidationError { field, message } => AuthError::InvalidInput { field, message },
        other => AuthError::InvalidInput {
            field: "body".to_string(),
            message: other.to_string(),
        },
    }
}
