use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Generic repository trait for creating multiple rows in a batch
///
/// All inserts run on the session's transaction; nothing is visible to other
/// sessions until it commits. A natural-key collision fails the whole batch
/// with [`RepositoryError::Duplicate`](super::error::RepositoryError::Duplicate).
#[async_trait]
pub trait CreateBatch<T: Identifiable>: Send + Sync {
    /// Save multiple items
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - The created rows
    /// * `Err` - An error if the statement could not be executed
    async fn create_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>>;
}
