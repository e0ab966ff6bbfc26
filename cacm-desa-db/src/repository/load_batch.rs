use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Generic repository trait for loading multiple rows by their IDs
///
/// Returns items in the same order as the provided IDs.
/// Missing items are represented as None in the result.
#[async_trait]
pub trait LoadBatch<T: Identifiable>: Send + Sync {
    /// Load multiple rows by their unique identifiers
    ///
    /// # Returns
    /// * `Ok(Vec<Option<T>>)` - A vector of optional rows in the same order as the provided IDs
    ///   - `Some(T)` for rows that exist
    ///   - `None` for rows that do not exist
    /// * `Err` - An error if the query could not be executed
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<T>>>;
}
