use cacm_desa_api::error::ApiError;
use thiserror::Error;

/// Failure of a repository operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A natural-key or other unique constraint was violated.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("transaction has been consumed")]
    TransactionConsumed,

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("database failure: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn decode(detail: impl std::fmt::Display) -> Self {
        RepositoryError::Decode(detail.to_string())
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Duplicate(db_err.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
                RepositoryError::Decode(err.to_string())
            }
            other => RepositoryError::Backend(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(constraint) => {
                ApiError::Conflict(format!("duplicate key ({constraint})"))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
