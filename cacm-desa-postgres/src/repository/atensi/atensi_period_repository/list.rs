use cacm_desa_db::models::{AtensiPeriodModel, PeriodFilter};
use cacm_desa_db::repository::{Page, PageRequest, RepositoryError, RepositoryResult};
use sqlx::Row;

use super::repo_impl::AtensiPeriodRepositoryImpl;
use crate::utils::{like_pattern, TryFromRow};

impl AtensiPeriodRepositoryImpl {
    pub(super) async fn list_impl(
        &self,
        fiscal_year: i32,
        region_code: &str,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<AtensiPeriodModel>> {
        let pattern = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

            let total: i64 = sqlx::query(
                r#"
                SELECT COUNT(*) AS total FROM cacm_atensi
                WHERE tahun = $1 AND kd_pemda = $2
                  AND ($3::text IS NULL OR no_atensi ILIKE $3 OR keterangan ILIKE $3)
                  AND ($4::boolean IS NULL OR is_sent = $4)
                "#,
            )
            .bind(fiscal_year)
            .bind(region_code)
            .bind(pattern.as_deref())
            .bind(filter.is_sent)
            .fetch_one(&mut **transaction)
            .await?
            .try_get("total")?;

            let rows = sqlx::query(
                r#"
                SELECT * FROM cacm_atensi
                WHERE tahun = $1 AND kd_pemda = $2
                  AND ($3::text IS NULL OR no_atensi ILIKE $3 OR keterangan ILIKE $3)
                  AND ($4::boolean IS NULL OR is_sent = $4)
                ORDER BY tgl_atensi DESC, no_atensi DESC
                LIMIT $5 OFFSET $6
                "#,
            )
            .bind(fiscal_year)
            .bind(region_code)
            .bind(pattern.as_deref())
            .bind(filter.is_sent)
            .bind(page.limit as i64)
            .bind(page.offset as i64)
            .fetch_all(&mut **transaction)
            .await?;

            (total, rows)
        };

        let items = rows
            .iter()
            .map(AtensiPeriodModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}
