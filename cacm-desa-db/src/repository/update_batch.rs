use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating multiple rows in a batch
///
/// Rows are matched by their surrogate id; the natural key columns are
/// written too, so a rename goes through this trait as well.
#[async_trait]
pub trait UpdateBatch<T: Identifiable>: Send + Sync {
    /// Update multiple items
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - The updated rows
    /// * `Err` - An error if the statement could not be executed
    async fn update_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>>;
}
