//! SphinxQL literal escaping.
//!
//! Every untrusted string that ends up inside a generated statement goes
//! through [`quote_str`]; [`sql_literal`] renders whole JSON values for
//! value positions (MATCH text, OPTION values, document columns).
//!
//! # Rendering rules
//!
//! ```text
//! O'Brien\path   ->  'O\'Brien\\path'   (strings: \ then ', then quoted)
//! 42             ->  42                 (integers bare)
//! 2.5            ->  2.5                (floats, shortest round-trip)
//! true / false   ->  1 / 0
//! null           ->  NULL
//! {"a":1}        ->  '{"a":1}'          (non-scalars: JSON text, '' doubled)
//! ```

use serde_json::Value;

/// Escape a string and wrap it in single quotes.
///
/// Backslashes and single quotes are handled in one scan, so a backslash
/// inserted for a quote is never itself re-escaped.
pub fn quote_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a JSON value as a SphinxQL literal.
///
/// Strings go through [`quote_str`]. Integers render without decoration and
/// floats in shortest round-trip form; booleans as `1`/`0`; null as `NULL`.
/// Arrays and objects have no literal form, so they fall back to their JSON
/// text, quoted with doubled single quotes.
pub fn sql_literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote_str(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Null => "NULL".to_string(),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string() {
        assert_eq!(quote_str("hello"), "'hello'");
    }

    #[test]
    fn test_quote_and_backslash() {
        // Backslash must be escaped before the quote escape applies
        assert_eq!(quote_str("O'Brien\\path"), "'O\\'Brien\\\\path'");
    }

    #[test]
    fn test_only_backslashes() {
        assert_eq!(quote_str("a\\b\\"), "'a\\\\b\\\\'");
    }

    #[test]
    fn test_only_quotes() {
        assert_eq!(quote_str("it's"), "'it\\'s'");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(quote_str(""), "''");
    }

    #[test]
    fn test_literal_integer() {
        assert_eq!(sql_literal(&json!(42)), "42");
        assert_eq!(sql_literal(&json!(-7)), "-7");
    }

    #[test]
    fn test_literal_float() {
        assert_eq!(sql_literal(&json!(2.5)), "2.5");
    }

    #[test]
    fn test_literal_bool() {
        assert_eq!(sql_literal(&json!(true)), "1");
        assert_eq!(sql_literal(&json!(false)), "0");
    }

    #[test]
    fn test_literal_null() {
        assert_eq!(sql_literal(&Value::Null), "NULL");
    }

    #[test]
    fn test_literal_string() {
        assert_eq!(sql_literal(&json!("it's")), "'it\\'s'");
    }

    #[test]
    fn test_literal_object_fallback() {
        assert_eq!(sql_literal(&json!({"a": 1})), "'{\"a\":1}'");
    }

    #[test]
    fn test_literal_array_fallback_doubles_quotes() {
        assert_eq!(sql_literal(&json!(["it's"])), "'[\"it''s\"]'");
    }
}
