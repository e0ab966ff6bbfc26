use cacm_desa_api::domain::{AdminIdentity, MobileIdentity, TenantScope};
use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::FindById;
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use std::sync::Arc;
use uuid::Uuid;

/// Derives the tenant partition of an admin session.
///
/// Recomputed on every request: the fiscal year comes from the session and
/// the region code from the tenant row, truncated to its first four
/// characters.
#[derive(Clone)]
pub struct ScopeResolver {
    uow: Arc<dyn UnitOfWork>,
}

impl ScopeResolver {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    #[tracing::instrument(skip_all, fields(user = %identity.username, tenant_id = ?identity.tenant_id))]
    pub async fn resolve(&self, identity: &AdminIdentity) -> ApiResult<TenantScope> {
        let tenant_id = identity.tenant_id.ok_or_else(|| ApiError::not_found("tenant"))?;
        let session = self.uow.begin().await?;
        let tenant = session.tenants().find_by_id(tenant_id).await?;
        session.rollback().await?;

        let tenant = tenant.ok_or_else(|| ApiError::not_found("tenant"))?;
        TenantScope::from_tenant_code(identity.fiscal_year, &tenant.code)
            .ok_or_else(|| ApiError::not_found("tenant"))
    }
}

/// A village session carries its scope directly.
pub fn mobile_scope(identity: &MobileIdentity) -> TenantScope {
    TenantScope::new(identity.fiscal_year, identity.region_code.clone())
}

/// Load a period of the scope.
///
/// An absent period is `NotFound`; a period of another tenant is `Forbidden`.
/// With `for_update` the row stays locked until the session ends.
pub(crate) async fn scoped_period(
    session: &dyn UnitOfWorkSession,
    scope: &TenantScope,
    id: Uuid,
    for_update: bool,
) -> ApiResult<AtensiPeriodModel> {
    let period = if for_update {
        session.periods().find_for_update(id).await?
    } else {
        session.periods().find_by_id(id).await?
    };
    let period = period.ok_or_else(|| ApiError::not_found("atensi"))?;
    if !scope.owns(period.fiscal_year, &period.region_code) {
        tracing::warn!(
            period_id = %id,
            fiscal_year = scope.fiscal_year,
            region_code = %scope.region_code,
            "period outside the caller's scope"
        );
        return Err(ApiError::Forbidden);
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{sample_period, sample_tenant, InMemoryUnitOfWork};
    use cacm_desa_api::domain::{current_fiscal_year, PermissionSet};

    fn identity(tenant_id: Option<Uuid>, fiscal_year: Option<i32>) -> AdminIdentity {
        AdminIdentity {
            user_id: Uuid::new_v4(),
            username: "operator".into(),
            name: "Operator".into(),
            role: "Admin".into(),
            role_code: "ADM".into(),
            permissions: PermissionSet::default(),
            tenant_id,
            tenant_name: String::new(),
            fiscal_year,
            session_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn resolves_region_from_tenant_code() {
        let uow = InMemoryUnitOfWork::new();
        let tenant = sample_tenant("1234.05");
        uow.seed(|s| {
            s.tenants.insert(tenant.id, tenant.clone());
        });
        let resolver = ScopeResolver::new(Arc::new(uow));

        let scope = resolver.resolve(&identity(Some(tenant.id), Some(2025))).await.unwrap();
        assert_eq!(scope.fiscal_year, 2025);
        assert_eq!(scope.region_code.as_str(), "1234");

        let scope = resolver.resolve(&identity(Some(tenant.id), None)).await.unwrap();
        assert_eq!(scope.fiscal_year, current_fiscal_year());
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let resolver = ScopeResolver::new(Arc::new(InMemoryUnitOfWork::new()));
        let err = resolver.resolve(&identity(Some(Uuid::new_v4()), None)).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("tenant".into()));

        let err = resolver.resolve(&identity(None, None)).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("tenant".into()));
    }

    #[tokio::test]
    async fn foreign_period_is_forbidden() {
        let uow = InMemoryUnitOfWork::new();
        let foreign = sample_period(2025, "5678", "001");
        uow.seed(|s| {
            s.periods.insert(foreign.id, foreign.clone());
        });
        let session = uow.create_session();
        let scope = TenantScope::from_tenant_code(Some(2025), "1234").unwrap();

        let err = scoped_period(&session, &scope, foreign.id, false).await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden);

        let err = scoped_period(&session, &scope, Uuid::new_v4(), false).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
