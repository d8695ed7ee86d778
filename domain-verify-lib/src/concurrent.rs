//! Deadline handling shared by every source client.
//!
//! A source call is raced against a timer. Whatever happens (success, error,
//! or the timer firing first) the caller gets a [`SourceResult`] back no later
//! than the bound, and the losing future is dropped.

use crate::error::DomainVerifyError;
use crate::types::SourceResult;
use std::future::Future;
use std::time::Duration;

/// Run `operation` with an upper bound on how long the caller waits.
///
/// Errors are converted into `Failed`; an expired timer becomes
/// `Failed(Timeout)` naming `label`.
pub(crate) async fn with_deadline<T, F>(label: &str, bound: Duration, operation: F) -> SourceResult<T>
where
    F: Future<Output = Result<T, DomainVerifyError>>,
{
    match tokio::time::timeout(bound, operation).await {
        Ok(Ok(value)) => SourceResult::Success(value),
        Ok(Err(err)) => {
            tracing::debug!(source = label, error = %err, "source failed");
            SourceResult::failed(err)
        }
        Err(_) => {
            tracing::debug!(source = label, bound_ms = bound.as_millis() as u64, "source timed out");
            SourceResult::failed(DomainVerifyError::timeout(label, bound))
        }
    }
}
