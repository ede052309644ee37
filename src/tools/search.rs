//! Search tool.
//!
//! The dispatcher between the two wire forms. A request carrying a
//! boolean query tree (or the explicit `use_json` flag) compiles through
//! the JSON translator and runs against `/search`; every other request
//! compiles to one SphinxQL statement. Either way the identical compiled
//! form is what the client retries.

use std::sync::Arc;
use tracing::debug;

use crate::client::{Row, SearchBackend};
use crate::config::GatewayConfig;
use crate::metrics;
use crate::query::{JsonTranslator, QueryError, SearchArgs, SqlTranslator};

use super::ToolError;

/// Which wire form served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireForm {
    Sql,
    Json,
}

impl WireForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Json => "json",
        }
    }
}

/// A completed search: rows plus the request shape that produced them.
#[derive(Debug)]
pub struct SearchOutcome {
    pub rows: Vec<Row>,
    pub form: WireForm,
    pub table: String,
    pub limit: u64,
    pub offset: u64,
}

/// Full-text search over one table, in either wire form.
pub struct SearchTool {
    backend: Arc<dyn SearchBackend>,
    default_limit: u64,
}

impl SearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, config: &GatewayConfig) -> Self {
        Self {
            backend,
            default_limit: config.max_results_per_query,
        }
    }

    /// Compile and execute one search request.
    ///
    /// A zero limit takes the configured default before compilation, so
    /// no query reaches the backend unbounded.
    pub async fn search(&self, mut args: SearchArgs) -> Result<SearchOutcome, ToolError> {
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table").into());
        }
        if args.limit == 0 {
            args.limit = self.default_limit;
        }

        let (rows, form) = if args.wants_json() {
            let document = JsonTranslator::translate(&args)?;
            metrics::record_query_compiled(WireForm::Json.as_str());
            debug!(table = %args.table, "compiled json search");
            let rows = super::run_search(&self.backend, "json search", &document).await?;
            (rows, WireForm::Json)
        } else {
            let statement = SqlTranslator::translate(&args)?;
            metrics::record_query_compiled(WireForm::Sql.as_str());
            debug!(table = %args.table, "compiled sql search");
            let rows = super::run_sql(&self.backend, "sql search", &statement).await?;
            (rows, WireForm::Sql)
        };

        metrics::record_rows_returned(rows.len());
        Ok(SearchOutcome {
            rows,
            form,
            table: args.table,
            limit: args.limit,
            offset: args.offset,
        })
    }
}
