use async_trait::async_trait;
use std::collections::HashMap;

use super::error::RepositoryResult;

#[async_trait]
pub trait VillageRepository: Send + Sync {
    /// Village names keyed by village code; unknown codes are absent.
    async fn load_names(&self, village_codes: &[String]) -> RepositoryResult<HashMap<String, String>>;
}
