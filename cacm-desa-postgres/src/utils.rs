use cacm_desa_db::models::{FollowUpStatus, VerificationStatus};
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use heapless::String as HeaplessString;
use sqlx::{postgres::PgRow, Row};
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> RepositoryResult<Self>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> RepositoryResult<HeaplessString<N>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(s.trim_end()).map_err(|_| {
        RepositoryError::Decode(format!(
            "Value for column '{col_name}' is too long (max {N} chars)"
        ))
    })
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> RepositoryResult<Option<HeaplessString<N>>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(val.trim_end()))
        .transpose()
        .map_err(|_| {
            RepositoryError::Decode(format!(
                "Value for column '{col_name}' is too long (max {N} chars)"
            ))
        })
}

pub fn get_follow_up_status(row: &PgRow, col_name: &str) -> RepositoryResult<FollowUpStatus> {
    let code: i16 = row.try_get(col_name)?;
    FollowUpStatus::try_from(code).map_err(RepositoryError::decode)
}

pub fn get_verification_status(row: &PgRow, col_name: &str) -> RepositoryResult<VerificationStatus> {
    let code: i16 = row.try_get(col_name)?;
    VerificationStatus::try_from(code).map_err(RepositoryError::decode)
}

/// Escape `%`, `_` and `\` so user input is matched literally inside ILIKE.
pub fn like_pattern(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
