use thiserror::Error;

/// Error taxonomy shared by every workflow operation.
///
/// `UpstreamFailure`, `DatabaseError` and `InternalError` carry server-side detail
/// only; the HTTP layer logs that detail and answers with a generic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        ApiError::Conflict(reason.into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_else(|| "invalid".to_string());
                (field.to_string(), message)
            })
            .collect();
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => ApiError::ValidationError { field, message },
            None => ApiError::validation("body", "invalid request"),
        }
    }
}

/// Failure of a credential validator.
///
/// The variants keep the internal reason for logging. Conversion into
/// [`ApiError`] collapses the admin reasons into one generic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials input: {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("user not found or inactive")]
    UnknownOrInactive,

    #[error("wrong password")]
    WrongPassword,

    /// Human-readable reason returned by the legacy login procedure.
    #[error("{0}")]
    Rejected(String),

    #[error("credential store failure: {0}")]
    Upstream(String),
}

pub const GENERIC_LOGIN_FAILURE: &str = "login failed";

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput { field, message } => ApiError::ValidationError { field, message },
            AuthError::UnknownOrInactive | AuthError::WrongPassword => {
                ApiError::LoginFailed(GENERIC_LOGIN_FAILURE.to_string())
            }
            AuthError::Rejected(message) => ApiError::LoginFailed(message),
            AuthError::Upstream(detail) => ApiError::UpstreamFailure(detail),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_failures_are_indistinguishable() {
        let unknown: ApiError = AuthError::UnknownOrInactive.into();
        let wrong: ApiError = AuthError::WrongPassword.into();
        assert_eq!(unknown, wrong);
        assert_eq!(unknown, ApiError::LoginFailed("login failed".to_string()));
    }

    #[test]
    fn procedure_rejection_is_kept_verbatim() {
        let err: ApiError = AuthError::Rejected("Username tidak terdaftar!".to_string()).into();
        assert_eq!(err, ApiError::LoginFailed("Username tidak terdaftar!".to_string()));
    }
}
