//! Backend execution layer.
//!
//! [`SearchBackend`] is the seam between compiled statements and the wire:
//! the tool layer only ever talks to the trait, so tests swap in a mock and
//! assert on the exact statements the compilers produced. The one real
//! implementation, [`HttpSearchClient`], speaks Manticore's HTTP API.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod http;
pub mod retry;

pub use http::HttpSearchClient;
pub use retry::{retry_request, RetryPolicy};

/// One result row, as returned by either endpoint.
///
/// The raw SQL endpoint returns rows as objects already; JSON search hits
/// are flattened into the same shape (`_id`, `_score`, then the source
/// fields).
pub type Row = serde_json::Map<String, Value>;

/// Failures from talking to the backend.
///
/// [`ClientError::is_transient`] drives the retry loop: connection-level
/// trouble and 5xx responses are worth re-sending, everything else is not.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("http status {status}: {message}")]
    Http { status: u16, message: String },

    /// A well-formed response carrying an in-body backend error, e.g. a
    /// SphinxQL syntax error reported inside a 200 result set.
    #[error("backend error: {0}")]
    Backend(String),

    /// The response parsed as JSON but not in the shape this client knows.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// A transient failure survived every configured retry.
    #[error("request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Whether re-sending the identical request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Executor for compiled statements.
///
/// Implementations re-send identical statements on transient failures;
/// callers never see an error until retries are spent.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one SphinxQL statement and return its rows.
    async fn execute_sql(&self, statement: &str) -> Result<Vec<Row>, ClientError>;

    /// Run one JSON search document and return its flattened hits.
    async fn execute_search(&self, document: &Value) -> Result<Vec<Row>, ClientError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_5xx_is_transient() {
        let err = ClientError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_http_4xx_is_not_transient() {
        let err = ClientError::Http {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_backend_and_decode_are_not_transient() {
        assert!(!ClientError::Backend("syntax error".to_string()).is_transient());
        assert!(!ClientError::Decode("not an array".to_string()).is_transient());
    }

    #[test]
    fn test_exhausted_error_names_attempts() {
        let err = ClientError::RetriesExhausted {
            attempts: 4,
            source: Box::new(ClientError::Http {
                status: 502,
                message: "bad gateway".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "request failed after 4 attempts: http status 502: bad gateway"
        );
        assert!(!err.is_transient());
    }
}
