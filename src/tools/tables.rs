//! Table introspection tools.
//!
//! Thin statement builders over `SHOW TABLES` and `DESCRIBE`; the rows
//! come back exactly as the server reports them.

use serde::Deserialize;
use std::sync::Arc;

use crate::client::{Row, SearchBackend};
use crate::query::{self, quote_str, QueryError};

use super::ToolError;

/// Arguments for listing tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowTablesArgs {
    /// Optional LIKE pattern, e.g. `"prod%"`
    pub pattern: Option<String>,
}

/// Arguments for describing one table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DescribeTableArgs {
    pub table: String,
    pub cluster: Option<String>,
}

/// Table listing and schema introspection.
pub struct TablesTool {
    backend: Arc<dyn SearchBackend>,
}

impl TablesTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// `SHOW TABLES`, optionally filtered by a LIKE pattern.
    pub async fn show_tables(&self, args: ShowTablesArgs) -> Result<Vec<Row>, ToolError> {
        let statement = match args.pattern.as_deref().filter(|p| !p.is_empty()) {
            Some(pattern) => format!("SHOW TABLES LIKE {}", quote_str(pattern)),
            None => "SHOW TABLES".to_string(),
        };
        super::run_sql(&self.backend, "show tables", &statement).await
    }

    /// `DESCRIBE` one table's columns and types.
    pub async fn describe_table(&self, args: DescribeTableArgs) -> Result<Vec<Row>, ToolError> {
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table").into());
        }
        let statement = format!(
            "DESCRIBE {}",
            query::qualified_table(args.cluster.as_deref(), &args.table)
        );
        super::run_sql(&self.backend, "describe table", &statement).await
    }
}
