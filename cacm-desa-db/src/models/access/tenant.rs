use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - Reference row for a regional government entity (Pemda).
/// - `code` is the full entity code; its first four characters are the region code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantModel {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

impl Identifiable for TenantModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
