use cacm_desa_api::domain::VillageCode;
use serde::{Deserialize, Serialize};

/// Village reference row (Ref_Desa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageModel {
    pub village_code: VillageCode,
    pub name: String,
}
