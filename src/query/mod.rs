// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query model and compilers.
//!
//! Everything between raw tool arguments and a wire-ready statement lives
//! here. The model is plain data; the two compilers are pure functions
//! over it, so every statement the gateway sends can be unit-tested as a
//! string or JSON value without a server.
//!
//! ```text
//!  tool arguments (JSON)
//!          │ serde
//!          ▼
//!     SearchArgs ───► SqlTranslator  ───► SELECT … OPTION …     (/sql)
//!          │
//!          └────────► JsonTranslator ───► {"table": …, "query"…} (/search)
//!                           ▲
//!     BoolQuery ────────────┘ (clause tree, JSON form only)
//! ```

use thiserror::Error;

pub mod args;
pub mod clause;
pub mod escape;
pub mod json;
pub mod options;
pub mod sql;

pub use args::{FuzzyOptions, HighlightOptions, SearchArgs};
pub use clause::{
    BoolQuery, EqualsClause, GeoAnchor, GeoDistanceClause, InClause, MatchClause, MatchOperator,
    QueryClause, RangeBounds, RangeClause,
};
pub use escape::{quote_str, sql_literal};
pub use json::JsonTranslator;
pub use options::{json_options, runtime_options, sql_option_clause, OptionValue, RuntimeOption};
pub use sql::SqlTranslator;

/// Failures producible while parsing or compiling a request.
///
/// These are argument errors: the backend was never contacted. Transport
/// and server failures live in [`crate::client::ClientError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A required argument was absent or empty.
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// SQL compilation found neither query text nor raw filters.
    #[error("query parameter is required when no where conditions are provided")]
    NoPredicate,

    /// A clause carried a `type` tag outside the supported set.
    #[error("unsupported query clause type '{0}'")]
    UnsupportedClauseType(String),

    /// A clause tag was recognized but its `data` payload did not fit.
    #[error("invalid {tag} clause data: {reason}")]
    MalformedClausePayload { tag: String, reason: String },
}

/// Table name with an optional replication-cluster qualifier.
///
/// Statements against a clustered table address it as `cluster:table`;
/// an empty cluster behaves like none at all.
pub fn qualified_table(cluster: Option<&str>, table: &str) -> String {
    match cluster.filter(|c| !c.is_empty()) {
        Some(cluster) => format!("{}:{}", cluster, table),
        None => table.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_table() {
        assert_eq!(qualified_table(None, "products"), "products");
        assert_eq!(qualified_table(Some(""), "products"), "products");
        assert_eq!(qualified_table(Some("main"), "products"), "main:products");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QueryError::MissingParameter("table").to_string(),
            "table parameter is required"
        );
        assert_eq!(
            QueryError::UnsupportedClauseType("wildcard".to_string()).to_string(),
            "unsupported query clause type 'wildcard'"
        );
        assert_eq!(
            QueryError::MalformedClausePayload {
                tag: "match".to_string(),
                reason: "missing field `field`".to_string(),
            }
            .to_string(),
            "invalid match clause data: missing field `field`"
        );
    }
}
