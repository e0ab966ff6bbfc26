use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::FlagTypeModel;

#[async_trait]
pub trait FlagTypeRepository: Send + Sync {
    /// Catalog entries for the given codes; unknown codes are skipped.
    async fn load_by_codes(&self, codes: &[i32]) -> RepositoryResult<Vec<FlagTypeModel>>;
}
