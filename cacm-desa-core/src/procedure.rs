//! Caller-side timeout around the legacy stored procedures.

use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_db::repository::RepositoryResult;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_PROCEDURE_TIMEOUT: Duration = Duration::from_secs(120);

/// Run one procedure call, mapping a timeout or a store failure to
/// [`ApiError::UpstreamFailure`]. The detail is for server logs only.
pub async fn call_with_timeout<T, F>(name: &str, timeout: Duration, call: F) -> ApiResult<T>
where
    F: Future<Output = RepositoryResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            tracing::error!(procedure = name, error = %err, "procedure call failed");
            Err(ApiError::UpstreamFailure(format!("{name}: {err}")))
        }
        Err(_) => {
            tracing::error!(procedure = name, timeout_ms = timeout.as_millis() as u64, "procedure call timed out");
            Err(ApiError::UpstreamFailure(format!(
                "{name} timed out after {}ms",
                timeout.as_millis()
            )))
        }
    }
}
