//! Timeout helper for provider calls
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let result = with_timeout(
//!     Duration::from_secs(300),
//!     async { /* LLM call */ },
//!     "chat completion"
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{Result, SiteError};

/// Execute an async operation with a timeout
///
/// Returns `SiteError::Timeout` if the operation doesn't complete within the
/// specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(SiteError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, SiteError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, SiteError>(42)
            },
            "slow operation",
        )
        .await;
        let err = result.unwrap_err();
        assert!(matches!(err, SiteError::Timeout { .. }));
        assert!(err.is_recoverable());
    }
}
