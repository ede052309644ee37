//! Search request model.
//!
//! [`SearchArgs`] is the complete, loosely-typed request a tool call
//! carries: one struct, deserialized straight from the argument JSON. The
//! compilers consume it by reference; nothing here does I/O.

use serde::Deserialize;

use super::clause::BoolQuery;
use std::collections::BTreeMap;

/// A full search request against one table.
///
/// `table` is the only universally required field; everything else is
/// optional and ignored by the wire form that has no use for it. `limit`
/// and `offset` use `0` for "unset" — the search tool normalizes a zero
/// limit to the configured default before compiling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchArgs {
    /// Free-text query, matched against all fields
    pub query: Option<String>,
    /// Target table
    pub table: String,
    /// Replication cluster; qualifies the table as `cluster:table`
    pub cluster: Option<String>,
    /// Nested boolean query; forces the JSON wire form
    pub bool_query: Option<BoolQuery>,

    /// Maximum rows to return (0 = unset)
    pub limit: u64,
    /// Rows to skip (0 = unset)
    pub offset: u64,
    /// Projected fields; empty means all
    pub fields: Vec<String>,

    /// Ranking function, e.g. `bm25` or `proximity_bm25`
    pub ranker: Option<String>,
    /// Maximum matches the server keeps per query
    pub max_matches: Option<u64>,
    /// Stop after this many matches per index
    pub cutoff: Option<u64>,
    /// Per-query time budget in milliseconds
    pub max_query_time: Option<u64>,
    /// Per-field weight multipliers; sorted order keeps statements stable
    pub field_weights: BTreeMap<String, u64>,
    /// Free-form comment attached to the query log
    pub comment: Option<String>,
    /// Allow queries with only negated terms (0/1)
    pub not_terms_only_allowed: Option<u64>,
    /// Query simplification toggle; the backend default (1) is never sent
    pub boolean_simplify: Option<u64>,
    /// Exact aggregate counts at the cost of speed (0/1)
    pub accurate_aggregation: Option<u64>,
    /// Seed for ORDER BY RAND()
    pub rand_seed: Option<u64>,
    /// Morphology override, e.g. `none`
    pub morphology: Option<String>,
    /// Token filter plugin spec: `library:plugin:settings`
    pub token_filter: Option<String>,
    /// Predicted-time cap in milliseconds
    pub max_predicted_time: Option<u64>,
    /// Distributed agent query timeout in milliseconds
    pub agent_query_timeout: Option<u64>,
    /// Distributed agent retry count
    pub retry_count: Option<u64>,
    /// Distributed agent retry delay in milliseconds
    pub retry_delay: Option<u64>,

    /// ORDER BY expressions, e.g. `"price DESC"`
    pub order_by: Vec<String>,
    /// GROUP BY fields
    pub group_by: Vec<String>,
    /// Ordering applied together with GROUP BY
    pub group_sort: Option<String>,
    /// Raw WHERE fragments, ANDed in verbatim (caller-trusted)
    pub r#where: Vec<String>,

    /// Snippet highlighting
    pub highlight: Option<HighlightOptions>,
    /// Fuzzy term matching
    pub fuzzy: Option<FuzzyOptions>,

    /// Force the JSON wire form even without a boolean query
    pub use_json: bool,
}

impl SearchArgs {
    /// Query text, treating an empty string the same as absent.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    /// Table name with the cluster qualifier applied.
    pub fn target(&self) -> String {
        super::qualified_table(self.cluster.as_deref(), &self.table)
    }

    /// Whether this request compiles to the JSON wire form.
    pub fn wants_json(&self) -> bool {
        self.bool_query.is_some() || self.use_json
    }
}

/// Snippet highlighting options.
///
/// `enabled` gates the whole block; unset knobs are omitted from the
/// generated call rather than sent as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    /// Emit a highlight projection at all
    pub enabled: bool,
    /// Fields to highlight; empty means all text fields
    pub fields: Vec<String>,
    /// Max snippets per document
    pub limit: Option<u64>,
    /// Max snippets per field
    pub limit_per_field: Option<u64>,
    /// Max words across all snippets
    pub limit_words: Option<u64>,
    /// Fragment count (JSON wire form only)
    pub number_of_fragments: Option<u64>,
    /// Words of context around each match
    pub around: Option<u64>,
    /// Opening markup inserted before each match
    pub before_match: Option<String>,
    /// Closing markup inserted after each match
    pub after_match: Option<String>,
}

/// Fuzzy term-matching options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FuzzyOptions {
    /// Enable fuzzy matching
    pub enabled: bool,
    /// Levenshtein distance bound
    pub distance: Option<u64>,
    /// Also keep the original (unfuzzed) form
    pub preserve: Option<u64>,
    /// Keyboard layouts for transliteration, e.g. `["us", "ru"]`
    pub layouts: Vec<String>,
}
