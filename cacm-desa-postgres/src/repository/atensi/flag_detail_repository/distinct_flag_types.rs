use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use sqlx::Row;
use uuid::Uuid;

use super::repo_impl::FlagDetailRepositoryImpl;

impl FlagDetailRepositoryImpl {
    pub(super) async fn distinct_flag_types_impl(&self, period_id: Uuid) -> RepositoryResult<Vec<i32>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                "SELECT DISTINCT jns_atensi FROM cacm_atensi_desa_rinc WHERE atensi_id = $1 ORDER BY jns_atensi",
            )
            .bind(period_id)
            .fetch_all(&mut **transaction)
            .await?
        };

        let mut codes = Vec::with_capacity(rows.len());
        for row in rows {
            codes.push(row.try_get("jns_atensi")?);
        }
        Ok(codes)
    }
}
