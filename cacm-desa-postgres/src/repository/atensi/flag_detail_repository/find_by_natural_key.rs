use cacm_desa_db::models::FlagDetailModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::FlagDetailRepositoryImpl;
use crate::utils::TryFromRow;

impl FlagDetailRepositoryImpl {
    pub(super) async fn find_by_natural_key_impl(
        &self,
        finding_id: Uuid,
        flag_type_code: i32,
        evidence_number: &str,
    ) -> RepositoryResult<Option<FlagDetailModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT * FROM cacm_atensi_desa_rinc
                WHERE atensi_desa_id = $1 AND jns_atensi = $2 AND no_bukti = $3
                "#,
            )
            .bind(finding_id)
            .bind(flag_type_code)
            .bind(evidence_number)
            .fetch_optional(&mut **transaction)
            .await?
        };
        row.as_ref().map(FlagDetailModel::try_from_row).transpose()
    }
}
