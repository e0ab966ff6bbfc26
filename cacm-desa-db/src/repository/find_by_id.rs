use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Generic repository trait for finding one row by its surrogate id
///
/// # Example
/// ```ignore
/// impl FindById<AtensiPeriodModel> for AtensiPeriodRepositoryImpl {
///     async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait FindById<T: Identifiable>: Send + Sync {
    /// Find a row by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The found row
    /// * `Ok(None)` - If the row does not exist
    /// * `Err` - An error if the query could not be executed
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<T>>;
}
