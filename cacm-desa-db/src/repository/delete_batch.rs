use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;

/// Generic repository trait for deleting multiple rows in a batch
///
/// Returns the number of rows deleted; ids that do not exist are skipped.
#[async_trait]
pub trait DeleteBatch: Send + Sync {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize>;
}
