//! JSON Translator
//!
//! Compiles a [`SearchArgs`] request into the JSON document the `/search`
//! endpoint accepts. Boolean query trees only exist in this wire form;
//! plain text queries become a `match` on all fields.
//!
//! # Document Generated
//!
//! ```json
//! {
//!   "table": "main:products",
//!   "query": {"bool": {"must": [{"match": {"*": "laptop"}}]}},
//!   "limit": 20,
//!   "_source": ["title", "price"],
//!   "sort": [{"price": "desc"}],
//!   "highlight": {"fields": ["title"], "number_of_fragments": 3},
//!   "options": {"ranker": "bm25"}
//! }
//! ```

use serde_json::{json, Map, Value};

use super::args::{HighlightOptions, SearchArgs};
use super::options::{json_options, runtime_options};
use super::QueryError;

/// JSON search-document compiler
pub struct JsonTranslator;

impl JsonTranslator {
    /// Compile a request into a complete `/search` document.
    ///
    /// Unlike the SQL form, a request without any predicate is valid here:
    /// it compiles to an explicit `match_all`. Only a missing table name
    /// fails.
    pub fn translate(args: &SearchArgs) -> Result<Value, QueryError> {
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table"));
        }

        let mut doc = Map::new();
        doc.insert("table".to_string(), json!(args.target()));

        // The query key is always present; the server treats an absent
        // query differently from an explicit match_all.
        let query = if let Some(tree) = &args.bool_query {
            tree.to_json()
        } else if let Some(text) = args.query_text() {
            json!({"match": {"*": text}})
        } else {
            json!({"match_all": {}})
        };
        doc.insert("query".to_string(), query);

        if args.limit > 0 {
            doc.insert("limit".to_string(), json!(args.limit));
        }
        if args.offset > 0 {
            doc.insert("offset".to_string(), json!(args.offset));
        }
        if !args.fields.is_empty() {
            doc.insert("_source".to_string(), json!(args.fields));
        }

        let sort: Vec<Value> = args
            .order_by
            .iter()
            .filter_map(|expr| Self::sort_entry(expr))
            .collect();
        if !sort.is_empty() {
            doc.insert("sort".to_string(), json!(sort));
        }

        if let Some(highlight) = args.highlight.as_ref().filter(|h| h.enabled) {
            doc.insert("highlight".to_string(), Self::highlight_object(highlight));
        }

        if let Some(options) = json_options(&runtime_options(args)) {
            doc.insert("options".to_string(), Value::Object(options));
        }

        Ok(Value::Object(doc))
    }

    /// Tokenize one ORDER BY expression into a `{field: direction}` pair.
    ///
    /// `"price DESC"` → `{"price": "desc"}`; a bare field defaults to
    /// ascending; tokens past the second are ignored.
    fn sort_entry(expr: &str) -> Option<Value> {
        let parts: Vec<&str> = expr.split_whitespace().collect();
        match parts.as_slice() {
            [] => None,
            [field] => Some(json!({ (*field): "asc" })),
            [field, direction, ..] => Some(json!({ (*field): direction.to_lowercase() })),
        }
    }

    /// Render the `highlight` object. Shares the SQL knob set and adds
    /// the fragment count, which only this wire form supports.
    fn highlight_object(highlight: &HighlightOptions) -> Value {
        let mut map = Map::new();
        if !highlight.fields.is_empty() {
            map.insert("fields".to_string(), json!(highlight.fields));
        }
        if let Some(n) = highlight.limit.filter(|n| *n > 0) {
            map.insert("limit".to_string(), json!(n));
        }
        if let Some(n) = highlight.limit_per_field.filter(|n| *n > 0) {
            map.insert("limit_per_field".to_string(), json!(n));
        }
        if let Some(n) = highlight.limit_words.filter(|n| *n > 0) {
            map.insert("limit_words".to_string(), json!(n));
        }
        if let Some(n) = highlight.number_of_fragments.filter(|n| *n > 0) {
            map.insert("number_of_fragments".to_string(), json!(n));
        }
        if let Some(n) = highlight.around.filter(|n| *n > 0) {
            map.insert("around".to_string(), json!(n));
        }
        if let Some(tag) = highlight.before_match.as_deref().filter(|t| !t.is_empty()) {
            map.insert("before_match".to_string(), json!(tag));
        }
        if let Some(tag) = highlight.after_match.as_deref().filter(|t| !t.is_empty()) {
            map.insert("after_match".to_string(), json!(tag));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> SearchArgs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_query_matches_all_fields() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "rust engine"
        })))
        .unwrap();
        assert_eq!(
            doc,
            json!({
                "table": "products",
                "query": {"match": {"*": "rust engine"}}
            })
        );
    }

    #[test]
    fn test_no_predicate_becomes_match_all() {
        let doc = JsonTranslator::translate(&args(json!({"table": "products"}))).unwrap();
        assert_eq!(doc["query"], json!({"match_all": {}}));
    }

    #[test]
    fn test_bool_query_takes_precedence_over_text() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "ignored-by-tree",
            "bool_query": {
                "must": [
                    {"type": "match", "data": {"field": "title", "query": "laptop"}}
                ]
            }
        })))
        .unwrap();
        assert_eq!(
            doc["query"],
            json!({"bool": {"must": [{"match": {"title": "laptop"}}]}})
        );
    }

    #[test]
    fn test_missing_table() {
        let err = JsonTranslator::translate(&args(json!({"query": "x"}))).unwrap_err();
        assert_eq!(err, QueryError::MissingParameter("table"));
    }

    #[test]
    fn test_cluster_qualifies_table() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "cluster": "main"
        })))
        .unwrap();
        assert_eq!(doc["table"], json!("main:products"));
    }

    #[test]
    fn test_pagination_and_projection() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "x",
            "limit": 20,
            "offset": 40,
            "fields": ["title", "price"]
        })))
        .unwrap();
        assert_eq!(doc["limit"], json!(20));
        assert_eq!(doc["offset"], json!(40));
        assert_eq!(doc["_source"], json!(["title", "price"]));
    }

    #[test]
    fn test_zero_pagination_is_omitted() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "x"
        })))
        .unwrap();
        assert!(doc.get("limit").is_none());
        assert!(doc.get("offset").is_none());
        assert!(doc.get("_source").is_none());
    }

    #[test]
    fn test_sort_tokenization() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "x",
            "order_by": ["price DESC", "title", "  weight()  ASC  extra"]
        })))
        .unwrap();
        assert_eq!(
            doc["sort"],
            json!([
                {"price": "desc"},
                {"title": "asc"},
                {"weight()": "asc"}
            ])
        );
    }

    #[test]
    fn test_blank_sort_expressions_are_skipped() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "x",
            "order_by": ["", "   "]
        })))
        .unwrap();
        assert!(doc.get("sort").is_none());
    }

    #[test]
    fn test_highlight_with_fragment_count() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "articles",
            "query": "x",
            "highlight": {
                "enabled": true,
                "fields": ["title"],
                "number_of_fragments": 3,
                "before_match": "<b>"
            }
        })))
        .unwrap();
        assert_eq!(
            doc["highlight"],
            json!({
                "fields": ["title"],
                "number_of_fragments": 3,
                "before_match": "<b>"
            })
        );
    }

    #[test]
    fn test_highlight_enabled_without_knobs_is_empty_object() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "articles",
            "query": "x",
            "highlight": {"enabled": true}
        })))
        .unwrap();
        assert_eq!(doc["highlight"], json!({}));
    }

    #[test]
    fn test_options_object() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "query": "x",
            "ranker": "bm25",
            "field_weights": {"title": 10},
            "boolean_simplify": 1
        })))
        .unwrap();
        assert_eq!(
            doc["options"],
            json!({"ranker": "bm25", "field_weights": {"title": 10}})
        );
    }

    #[test]
    fn test_empty_bool_query_still_compiles() {
        let doc = JsonTranslator::translate(&args(json!({
            "table": "products",
            "bool_query": {}
        })))
        .unwrap();
        assert_eq!(doc["query"], json!({"bool": {}}));
    }
}
