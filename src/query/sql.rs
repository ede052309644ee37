//! SQL Translator
//!
//! Compiles a [`SearchArgs`] request into one SphinxQL `SELECT` statement
//! for the raw `/sql` endpoint. Clause order is fixed; every section is
//! omitted entirely when the request leaves it unset.
//!
//! # SQL Syntax Generated
//!
//! ```sql
//! SELECT title, price, HIGHLIGHT({limit=3}, 'title') AS highlight
//! FROM main:products
//! WHERE MATCH('laptop') AND (price > 100)
//! GROUP BY category ORDER BY count(*) DESC
//! LIMIT 20 OFFSET 40
//! OPTION ranker=bm25, field_weights=(title=10)
//! ```

use super::args::{HighlightOptions, SearchArgs};
use super::escape::quote_str;
use super::options::{runtime_options, sql_option_clause};
use super::QueryError;

/// SphinxQL statement compiler
pub struct SqlTranslator;

impl SqlTranslator {
    /// Compile a request into a complete `SELECT` statement.
    ///
    /// Fails when the table name is missing, or when neither query text
    /// nor raw filters are present to form a predicate.
    pub fn translate(args: &SearchArgs) -> Result<String, QueryError> {
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table"));
        }

        let mut projection = if args.fields.is_empty() {
            "*".to_string()
        } else {
            args.fields.join(", ")
        };
        if let Some(highlight) = args.highlight.as_ref().filter(|h| h.enabled) {
            projection.push_str(", ");
            projection.push_str(&Self::highlight_projection(highlight));
        }

        let mut sql = format!("SELECT {} FROM {}", projection, args.target());

        let mut predicates: Vec<String> = Vec::new();
        if let Some(text) = args.query_text() {
            predicates.push(format!("MATCH({})", quote_str(text)));
        }
        for condition in &args.r#where {
            predicates.push(format!("({})", condition));
        }
        if predicates.is_empty() {
            return Err(QueryError::NoPredicate);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));

        // GROUP BY owns the statement's ordering via group_sort; a plain
        // ORDER BY list applies only to ungrouped statements.
        if !args.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&args.group_by.join(", "));
            if let Some(group_sort) = args.group_sort.as_deref().filter(|s| !s.is_empty()) {
                sql.push_str(" ORDER BY ");
                sql.push_str(group_sort);
            }
        } else if !args.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&args.order_by.join(", "));
        }

        if args.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", args.limit));
        }
        if args.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", args.offset));
        }

        if let Some(clause) = sql_option_clause(&runtime_options(args)) {
            sql.push_str(" OPTION ");
            sql.push_str(&clause);
        }

        Ok(sql)
    }

    /// Render the `HIGHLIGHT(…) AS highlight` projection.
    ///
    /// The call takes up to two positional arguments: an option map and a
    /// quoted field list. Trailing arguments are dropped when absent, but
    /// a field list with no options still needs the empty map in front.
    fn highlight_projection(highlight: &HighlightOptions) -> String {
        let mut opts: Vec<String> = Vec::new();
        if let Some(n) = highlight.limit.filter(|n| *n > 0) {
            opts.push(format!("limit={}", n));
        }
        if let Some(n) = highlight.limit_per_field.filter(|n| *n > 0) {
            opts.push(format!("limit_per_field={}", n));
        }
        if let Some(n) = highlight.limit_words.filter(|n| *n > 0) {
            opts.push(format!("limit_words={}", n));
        }
        if let Some(n) = highlight.around.filter(|n| *n > 0) {
            opts.push(format!("around={}", n));
        }
        if let Some(tag) = highlight.before_match.as_deref().filter(|t| !t.is_empty()) {
            opts.push(format!("before_match={}", quote_str(tag)));
        }
        if let Some(tag) = highlight.after_match.as_deref().filter(|t| !t.is_empty()) {
            opts.push(format!("after_match={}", quote_str(tag)));
        }

        let fields = if highlight.fields.is_empty() {
            None
        } else {
            Some(quote_str(&highlight.fields.join(",")))
        };

        match (opts.is_empty(), fields) {
            (true, None) => "HIGHLIGHT() AS highlight".to_string(),
            (false, None) => format!("HIGHLIGHT({{{}}}) AS highlight", opts.join(", ")),
            (true, Some(fields)) => format!("HIGHLIGHT({{}}, {}) AS highlight", fields),
            (false, Some(fields)) => {
                format!("HIGHLIGHT({{{}}}, {}) AS highlight", opts.join(", "), fields)
            }
        }
    }
}
