// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Retry loop for transient backend failures.
//!
//! Fixed-delay, bounded retries: a query gateway sits on the request path,
//! so giving up quickly beats backing off politely. Only failures classed
//! transient by [`ClientError::is_transient`] are retried, and the
//! identical request is re-sent each time.
//!
//! The loop holds no state across calls; cancelling the caller (dropping
//! the future) stops it mid-sleep with nothing to clean up.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use super::ClientError;

/// Bounded fixed-delay retry policy.
///
/// `max_retries` counts re-sends, not total tries: a policy of 3 makes at
/// most 4 requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl RetryPolicy {
    /// Standard gateway policy: 3 retries, one second apart.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }

    /// Single-shot policy for callers doing their own failure handling.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn new(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Fast retry for tests (minimal delays)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1),
        }
    }
}

/// Run `request` until it succeeds, fails permanently, or spends the
/// policy's retry budget.
///
/// Non-transient errors return unchanged on the first occurrence. An
/// exhausted budget returns [`ClientError::RetriesExhausted`] wrapping the
/// last transient failure.
pub async fn retry_request<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    mut request: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempts = 0u32;

    loop {
        match request().await {
            Ok(value) => {
                if attempts > 0 {
                    info!(
                        "Request '{}' succeeded after {} retries",
                        operation_name, attempts
                    );
                }
                return Ok(value);
            }
            Err(err) => {
                attempts += 1;

                if !err.is_transient() {
                    return Err(err);
                }
                if attempts > policy.max_retries {
                    return Err(ClientError::RetriesExhausted {
                        attempts,
                        source: Box::new(err),
                    });
                }

                warn!(
                    "Request '{}' failed (attempt {}/{}): {}. Retrying in {:?}...",
                    operation_name,
                    attempts,
                    policy.max_retries + 1,
                    err,
                    policy.delay
                );
                crate::metrics::record_retry(operation_name);

                sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn unavailable() -> ClientError {
        ClientError::Http {
            status: 503,
            message: "service unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_try_success() {
        let result = retry_request("test_op", &RetryPolicy::test(), || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_request("test_op", &RetryPolicy::test(), || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(unavailable())
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), ClientError> = retry_request("test_op", &RetryPolicy::test(), || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Backend("syntax error".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(ClientError::Backend(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_budget_exhaustion() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), ClientError> = retry_request("test_op", &RetryPolicy::test(), || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            }
        })
        .await;

        // 1 initial try + 3 retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result.unwrap_err() {
            ClientError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*source, ClientError::Http { status: 503, .. }));
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_budget_fails_without_sleeping() {
        let result: Result<(), ClientError> =
            retry_request("test_op", &RetryPolicy::none(), || async {
                Err(unavailable())
            })
            .await;

        match result.unwrap_err() {
            ClientError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 1),
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_presets() {
        assert_eq!(RetryPolicy::standard().max_retries, 3);
        assert_eq!(RetryPolicy::none().max_retries, 0);
        assert_eq!(RetryPolicy::new(5, 250).delay, Duration::from_millis(250));
    }
}
