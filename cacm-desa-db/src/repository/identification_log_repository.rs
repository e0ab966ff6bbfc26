use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::IdentificationLogModel;

#[async_trait]
pub trait IdentificationLogRepository: Send + Sync {
    async fn latest(
        &self,
        fiscal_year: i32,
        region_code: &str,
    ) -> RepositoryResult<Option<IdentificationLogModel>>;
}
