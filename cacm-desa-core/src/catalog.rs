use cacm_desa_api::error::ApiResult;
use cacm_desa_db::models::FlagTypeModel;
use cacm_desa_db::unit_of_work::UnitOfWorkSession;
use moka::future::Cache;
use std::collections::BTreeMap;
use std::time::Duration;

const CATALOG_CAPACITY: u64 = 1_000;

/// Read-through cache over the flag type (Jenis Atensi) catalog.
///
/// The catalog is maintained outside this service, so entries expire after
/// a fixed time to live instead of being invalidated.
#[derive(Clone)]
pub struct FlagTypeCatalog {
    cache: Cache<i32, FlagTypeModel>,
}

impl FlagTypeCatalog {
    pub fn new(time_to_live: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(CATALOG_CAPACITY)
                .time_to_live(time_to_live)
                .build(),
        }
    }

    /// Catalog entries for `codes`; codes without an entry are left out.
    pub async fn resolve(
        &self,
        session: &dyn UnitOfWorkSession,
        codes: &[i32],
    ) -> ApiResult<BTreeMap<i32, FlagTypeModel>> {
        let mut found = BTreeMap::new();
        let mut missing = Vec::new();
        for code in codes {
            match self.cache.get(code).await {
                Some(entry) => {
                    found.insert(*code, entry);
                }
                None => missing.push(*code),
            }
        }

        if !missing.is_empty() {
            tracing::debug!(?missing, "loading flag types");
            for entry in session.flag_types().load_by_codes(&missing).await? {
                self.cache.insert(entry.code, entry.clone()).await;
                found.insert(entry.code, entry);
            }
        }
        Ok(found)
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for FlagTypeCatalog {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{sample_flag_type, InMemoryUnitOfWork};

    #[tokio::test]
    async fn entries_are_served_from_cache_after_first_load() {
        let uow = InMemoryUnitOfWork::new();
        uow.seed(|s| {
            s.flag_types.insert(10, sample_flag_type(10, "Saldo kas negatif"));
        });
        let catalog = FlagTypeCatalog::default();

        let first = catalog.resolve(&uow.create_session(), &[10, 99]).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[&10].name, "Saldo kas negatif");

        uow.seed(|s| s.flag_types.clear());
        let second = catalog.resolve(&uow.create_session(), &[10]).await.unwrap();
        assert_eq!(second[&10].name, "Saldo kas negatif");

        catalog.invalidate_all();
        let third = catalog.resolve(&uow.create_session(), &[10]).await.unwrap();
        assert!(third.is_empty());
    }
}
