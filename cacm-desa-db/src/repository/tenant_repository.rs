use async_trait::async_trait;

use super::FindById;
use crate::models::TenantModel;

#[async_trait]
pub trait TenantRepository: FindById<TenantModel> + Send + Sync {}
