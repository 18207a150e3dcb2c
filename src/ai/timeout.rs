//! Timeout helper for async operations.
//!
//! ```ignore
//! let response = with_timeout(
//!     Duration::from_secs(120),
//!     provider.generate(&request),
//!     "LLM request",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use super::provider::{CompletionRequest, LlmProvider, LlmResponse};
use crate::types::{RepolyzeError, Result};

/// Execute an async operation with a timeout
///
/// Returns `RepolyzeError::Timeout` if the operation doesn't complete within
/// `timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(RepolyzeError::timeout(operation_name, timeout)),
    }
}

/// Run one provider call under `timeout`
///
/// An elapsed deadline surfaces as `Upstream` under the provider's name.
pub async fn generate_with_timeout(
    provider: &dyn LlmProvider,
    request: &CompletionRequest,
    timeout: Duration,
    operation_name: &str,
) -> Result<LlmResponse> {
    with_timeout(timeout, provider.generate(request), operation_name)
        .await
        .map_err(|e| match e {
            RepolyzeError::Timeout { .. } => RepolyzeError::upstream(
                provider.name(),
                format!("{} got no response within {:?}", operation_name, timeout),
            ),
            other => other,
        })
}
