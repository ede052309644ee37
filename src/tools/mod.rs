// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Tool layer.
//!
//! Each tool is one capability a hosting layer can expose to callers:
//! typed argument struct in, rows out. Tools compile arguments with the
//! [`crate::query`] compilers and execute through the [`SearchBackend`]
//! seam, so every statement is observable in tests without a server.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::client::{ClientError, Row, SearchBackend};
use crate::metrics;
use crate::query::QueryError;

pub mod clusters;
pub mod documents;
pub mod search;
pub mod tables;

pub use clusters::ClustersTool;
pub use documents::DocumentsTool;
pub use search::{SearchOutcome, SearchTool, WireForm};
pub use tables::TablesTool;

/// Failures a tool call can produce.
///
/// Argument problems and backend problems stay distinct: the first kind
/// never touched the network, the second is tagged with the stage that
/// was executing when it failed.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments were structurally valid but failed validation or
    /// compilation.
    #[error(transparent)]
    Arguments(#[from] QueryError),

    /// The argument object itself did not deserialize into the tool's
    /// parameter struct.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The registry was asked for a tool it does not carry.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// The backend call failed after the client's retry budget was spent.
    #[error("{stage} failed: {source}")]
    Backend {
        stage: &'static str,
        #[source]
        source: ClientError,
    },
}

/// Run one statement against the backend, tagging failures with the
/// calling stage and recording execution metrics.
pub(crate) async fn run_sql(
    backend: &Arc<dyn SearchBackend>,
    stage: &'static str,
    statement: &str,
) -> Result<Vec<Row>, ToolError> {
    debug!(stage, statement, "executing statement");
    let _timer = metrics::LatencyTimer::new(stage);
    let result = backend.execute_sql(statement).await;
    metrics::record_execution(stage, if result.is_ok() { "success" } else { "error" });
    result.map_err(|source| ToolError::Backend { stage, source })
}

/// JSON-endpoint counterpart of [`run_sql`].
pub(crate) async fn run_search(
    backend: &Arc<dyn SearchBackend>,
    stage: &'static str,
    document: &serde_json::Value,
) -> Result<Vec<Row>, ToolError> {
    debug!(stage, document = %document, "executing search document");
    let _timer = metrics::LatencyTimer::new(stage);
    let result = backend.execute_search(document).await;
    metrics::record_execution(stage, if result.is_ok() { "success" } else { "error" });
    result.map_err(|source| ToolError::Backend { stage, source })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Backend double: records every statement and document, serves
    /// canned rows or a canned failure.
    pub struct MockBackend {
        pub statements: Mutex<Vec<String>>,
        pub documents: Mutex<Vec<Value>>,
        pub rows: Vec<Row>,
        pub fail_with: Option<fn() -> ClientError>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self {
                statements: Mutex::new(Vec::new()),
                documents: Mutex::new(Vec::new()),
                rows: Vec::new(),
                fail_with: None,
            }
        }

        pub fn with_rows(rows: Vec<Row>) -> Self {
            Self {
                rows,
                ..Self::new()
            }
        }

        pub fn failing(make: fn() -> ClientError) -> Self {
            Self {
                fail_with: Some(make),
                ..Self::new()
            }
        }

        pub fn last_statement(&self) -> String {
            self.statements.lock().unwrap().last().cloned().unwrap_or_default()
        }

        pub fn last_document(&self) -> Option<Value> {
            self.documents.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl SearchBackend for MockBackend {
        async fn execute_sql(&self, statement: &str) -> Result<Vec<Row>, ClientError> {
            self.statements.lock().unwrap().push(statement.to_string());
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(self.rows.clone()),
            }
        }

        async fn execute_search(&self, document: &Value) -> Result<Vec<Row>, ClientError> {
            self.documents.lock().unwrap().push(document.clone());
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(self.rows.clone()),
            }
        }

        async fn ping(&self) -> Result<(), ClientError> {
            Ok(())
        }
    }

    /// Build a row from a JSON object literal.
    pub fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_errors_pass_through_unchanged() {
        let err: ToolError = QueryError::MissingParameter("table").into();
        assert_eq!(err.to_string(), "table parameter is required");
    }

    #[test]
    fn test_backend_errors_carry_the_stage() {
        let err = ToolError::Backend {
            stage: "sql search",
            source: ClientError::Http {
                status: 500,
                message: "internal error".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "sql search failed: http status 500: internal error"
        );
    }
}
