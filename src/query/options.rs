//! Runtime query options.
//!
//! Every per-query knob the backend understands lives in one table:
//! name, extraction rule, and value kind. Both wire forms render from the
//! same [`RuntimeOption`] list, so adding an option is a single new row
//! rather than two compiler edits.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use super::args::SearchArgs;
use super::escape::quote_str;

/// A typed option value; the kind decides how each wire form renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Bare integer: counts, 0/1 toggles, seeds, millisecond budgets
    Int(u64),
    /// Bare identifier, unquoted in SQL (e.g. `ranker=bm25`)
    Name(String),
    /// Free text, single-quoted and escaped in SQL
    Text(String),
    /// Per-field integer map, rendered `(a=1,b=2)` in SQL
    Weights(BTreeMap<String, u64>),
    /// String list, rendered as a quoted comma join in SQL
    List(Vec<String>),
}

impl OptionValue {
    /// Rendering for the `OPTION` clause of a SELECT statement.
    pub fn to_sql(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Name(name) => name.clone(),
            Self::Text(text) => quote_str(text),
            Self::Weights(weights) => {
                let pairs: Vec<String> = weights
                    .iter()
                    .map(|(field, weight)| format!("{}={}", field, weight))
                    .collect();
                format!("({})", pairs.join(","))
            }
            Self::List(items) => quote_str(&items.join(",")),
        }
    }

    /// Rendering for the `options` object of a JSON search document.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(n) => json!(n),
            Self::Name(s) | Self::Text(s) => json!(s),
            Self::Weights(weights) => json!(weights),
            Self::List(items) => json!(items),
        }
    }
}

/// One option extracted from a request, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeOption {
    pub name: &'static str,
    pub value: OptionValue,
}

type Extractor = fn(&SearchArgs) -> Option<OptionValue>;

/// The option table, in emission order. An extractor returns `None` when
/// the option is unset for this request and must not appear on the wire.
///
/// `boolean_simplify` carries the one deliberate special case: the backend
/// already defaults it to `1`, so that value is swallowed here and only a
/// non-default setting is ever sent.
const OPTIONS: &[(&str, Extractor)] = &[
    ("ranker", |a| named(&a.ranker)),
    ("max_matches", |a| positive(a.max_matches)),
    ("cutoff", |a| positive(a.cutoff)),
    ("max_query_time", |a| positive(a.max_query_time)),
    ("field_weights", |a| {
        if a.field_weights.is_empty() {
            None
        } else {
            Some(OptionValue::Weights(a.field_weights.clone()))
        }
    }),
    ("comment", |a| text(&a.comment)),
    ("not_terms_only_allowed", |a| positive(a.not_terms_only_allowed)),
    ("boolean_simplify", |a| {
        a.boolean_simplify.filter(|v| *v != 1).map(OptionValue::Int)
    }),
    ("accurate_aggregation", |a| positive(a.accurate_aggregation)),
    ("rand_seed", |a| positive(a.rand_seed)),
    ("morphology", |a| named(&a.morphology)),
    ("token_filter", |a| text(&a.token_filter)),
    ("max_predicted_time", |a| positive(a.max_predicted_time)),
    ("agent_query_timeout", |a| positive(a.agent_query_timeout)),
    ("retry_count", |a| positive(a.retry_count)),
    ("retry_delay", |a| positive(a.retry_delay)),
    ("fuzzy", |a| fuzzy_enabled(a).map(|_| OptionValue::Int(1))),
    ("distance", |a| {
        fuzzy_enabled(a).and_then(|f| positive(f.distance))
    }),
    ("preserve", |a| {
        fuzzy_enabled(a).and_then(|f| positive(f.preserve))
    }),
    ("layouts", |a| {
        fuzzy_enabled(a).and_then(|f| {
            if f.layouts.is_empty() {
                None
            } else {
                Some(OptionValue::List(f.layouts.clone()))
            }
        })
    }),
];

fn positive(value: Option<u64>) -> Option<OptionValue> {
    value.filter(|v| *v > 0).map(OptionValue::Int)
}

fn named(value: &Option<String>) -> Option<OptionValue> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| OptionValue::Name(v.to_string()))
}

fn text(value: &Option<String>) -> Option<OptionValue> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| OptionValue::Text(v.to_string()))
}

fn fuzzy_enabled(args: &SearchArgs) -> Option<&super::args::FuzzyOptions> {
    args.fuzzy.as_ref().filter(|f| f.enabled)
}

/// Walk the table and collect every option set on this request,
/// preserving table order.
pub fn runtime_options(args: &SearchArgs) -> Vec<RuntimeOption> {
    OPTIONS
        .iter()
        .filter_map(|&(name, extract)| {
            extract(args).map(|value| RuntimeOption { name, value })
        })
        .collect()
}

/// Render options as the body of an `OPTION` clause (`k=v, k=v`), or
/// `None` when the request sets none.
pub fn sql_option_clause(options: &[RuntimeOption]) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let rendered: Vec<String> = options
        .iter()
        .map(|opt| format!("{}={}", opt.name, opt.value.to_sql()))
        .collect();
    Some(rendered.join(", "))
}

/// Render options as the `options` object of a JSON search document, or
/// `None` when the request sets none.
pub fn json_options(options: &[RuntimeOption]) -> Option<Map<String, Value>> {
    if options.is_empty() {
        return None;
    }
    let mut map = Map::new();
    for opt in options {
        map.insert(opt.name.to_string(), opt.value.to_json());
    }
    Some(map)
}
