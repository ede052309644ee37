// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Boolean clause model.
//!
//! The JSON query path accepts a nested boolean tree. Each clause is a
//! closed variant carrying a typed payload, so lowering to the wire
//! document cannot fail once a tree has parsed: unknown tags and
//! mismatched payloads are rejected at parse time, naming the offending
//! tag.
//!
//! # Wire shape
//!
//! ```json
//! {
//!   "must": [
//!     {"type": "match", "data": {"field": "title", "query": "rust"}},
//!     {"type": "range", "data": {"field": "price", "ranges": {"gte": 10}}}
//!   ],
//!   "must_not": [
//!     {"type": "equals", "data": {"field": "hidden", "value": 1}}
//!   ]
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::QueryError;

/// Nested boolean query: three clause lists, each optional.
///
/// Empty lists are valid and contribute nothing to the compiled document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoolQuery {
    /// Clauses that must all match
    pub must: Vec<QueryClause>,
    /// Clauses of which at least one should match
    pub should: Vec<QueryClause>,
    /// Clauses that must not match
    pub must_not: Vec<QueryClause>,
}

impl BoolQuery {
    /// Create an empty boolean query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause that must match
    pub fn with_must(mut self, clause: QueryClause) -> Self {
        self.must.push(clause);
        self
    }

    /// Add a clause of which at least one should match
    pub fn with_should(mut self, clause: QueryClause) -> Self {
        self.should.push(clause);
        self
    }

    /// Add a clause that must not match
    pub fn with_must_not(mut self, clause: QueryClause) -> Self {
        self.must_not.push(clause);
        self
    }

    /// True when no clause list has any entries
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    /// Lower to `{"bool": {...}}`, each list present only when non-empty.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if !self.must.is_empty() {
            body.insert("must".into(), clause_array(&self.must));
        }
        if !self.should.is_empty() {
            body.insert("should".into(), clause_array(&self.should));
        }
        if !self.must_not.is_empty() {
            body.insert("must_not".into(), clause_array(&self.must_not));
        }
        json!({ "bool": body })
    }
}

fn clause_array(clauses: &[QueryClause]) -> Value {
    Value::Array(clauses.iter().map(QueryClause::to_json).collect())
}

/// One clause in a boolean query tree.
///
/// Tagged on the wire as `{"type": "<tag>", "data": {...}}`; see
/// [`QueryClause::from_value`] for the parsing rules.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    /// Full-text match on one field
    Match(MatchClause),
    /// Attribute range filter
    Range(RangeClause),
    /// Attribute equality
    Equals(EqualsClause),
    /// Attribute membership in a value list
    In(InClause),
    /// Geo-distance filter around an anchor point
    GeoDistance(GeoDistanceClause),
    /// Raw query-language fragment, passed through untouched
    QueryString(String),
    /// Matches every document
    MatchAll,
    /// Nested boolean sub-tree
    Bool(BoolQuery),
}

/// Payload for a `match` clause.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchClause {
    /// Field to match against (`*` for all fields)
    pub field: String,
    /// Full-text query text
    pub query: String,
    /// Term combination; the backend defaults to or
    #[serde(default)]
    pub operator: Option<MatchOperator>,
}

/// Term combination operator for a `match` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    And,
    Or,
}

impl MatchOperator {
    /// Wire spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Payload for a `range` clause.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeClause {
    /// Attribute to filter on
    pub field: String,
    /// Bounds; only present bounds are forwarded
    pub ranges: RangeBounds,
}

/// Bounds of a range filter. Unknown bound keys are rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeBounds {
    #[serde(default)]
    pub gte: Option<Value>,
    #[serde(default)]
    pub lte: Option<Value>,
    #[serde(default)]
    pub gt: Option<Value>,
    #[serde(default)]
    pub lt: Option<Value>,
}

impl RangeBounds {
    fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(v) = &self.gte {
            body.insert("gte".into(), v.clone());
        }
        if let Some(v) = &self.lte {
            body.insert("lte".into(), v.clone());
        }
        if let Some(v) = &self.gt {
            body.insert("gt".into(), v.clone());
        }
        if let Some(v) = &self.lt {
            body.insert("lt".into(), v.clone());
        }
        Value::Object(body)
    }
}

/// Payload for an `equals` clause.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EqualsClause {
    /// Attribute to compare
    pub field: String,
    /// Scalar to compare against
    pub value: Value,
}

/// Payload for an `in` clause.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InClause {
    /// Attribute to test
    pub field: String,
    /// Accepted scalar values
    pub values: Vec<Value>,
}

/// Payload for a `geo_distance` clause.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoDistanceClause {
    /// Distance algorithm (`adaptive` or `haversine`); backend default when absent
    #[serde(default)]
    pub distance_type: Option<String>,
    /// Anchor point to measure from
    pub location_anchor: GeoAnchor,
    /// Expression yielding the document's coordinates
    pub location_source: String,
    /// Maximum distance, e.g. `"100 km"`
    pub distance: String,
}

/// Anchor point for geo-distance filters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoAnchor {
    pub lat: f64,
    pub lon: f64,
}

impl QueryClause {
    /// Full-text match on one field
    pub fn match_field(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self::Match(MatchClause {
            field: field.into(),
            query: query.into(),
            operator: None,
        })
    }

    /// Attribute equality
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals(EqualsClause {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Parse one clause from its wire form.
    ///
    /// The only place clause tags and payload shapes are checked; everything
    /// downstream works on the typed tree. Errors name the offending tag.
    pub fn from_value(value: &Value) -> Result<Self, QueryError> {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => {
                return Err(QueryError::MalformedClausePayload {
                    tag: "untagged".to_string(),
                    reason: "expected a JSON object with 'type' and 'data'".to_string(),
                })
            }
        };
        let tag = obj.get("type").and_then(Value::as_str).unwrap_or_default();
        let data = obj.get("data").cloned().unwrap_or(Value::Null);

        match tag {
            "match" => Ok(Self::Match(parse_payload(tag, data)?)),
            "range" => Ok(Self::Range(parse_payload(tag, data)?)),
            "equals" => Ok(Self::Equals(parse_payload(tag, data)?)),
            "in" => Ok(Self::In(parse_payload(tag, data)?)),
            "geo_distance" => Ok(Self::GeoDistance(parse_payload(tag, data)?)),
            "query_string" => match data {
                Value::String(s) => Ok(Self::QueryString(s)),
                other => Err(QueryError::MalformedClausePayload {
                    tag: tag.to_string(),
                    reason: format!("expected a raw query string, got {}", json_kind(&other)),
                }),
            },
            // Payload carries no information; an empty object is customary
            "match_all" => Ok(Self::MatchAll),
            "bool" => Ok(Self::Bool(parse_payload(tag, data)?)),
            other => Err(QueryError::UnsupportedClauseType(other.to_string())),
        }
    }

    /// Lower this clause to its wire-document shape.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Match(m) => match m.operator {
                Some(op) => json!({
                    "match": { (m.field.as_str()): { "query": m.query, "operator": op.as_str() } }
                }),
                None => json!({ "match": { (m.field.as_str()): m.query } }),
            },
            Self::Range(r) => json!({ "range": { (r.field.as_str()): r.ranges.to_json() } }),
            Self::Equals(e) => json!({ "equals": { (e.field.as_str()): e.value } }),
            Self::In(i) => json!({ "in": { (i.field.as_str()): i.values } }),
            Self::GeoDistance(g) => {
                let mut body = Map::new();
                if let Some(dt) = &g.distance_type {
                    body.insert("distance_type".into(), json!(dt));
                }
                body.insert(
                    "location_anchor".into(),
                    json!({ "lat": g.location_anchor.lat, "lon": g.location_anchor.lon }),
                );
                body.insert("location_source".into(), json!(g.location_source));
                body.insert("distance".into(), json!(g.distance));
                json!({ "geo_distance": body })
            }
            Self::QueryString(raw) => json!({ "query_string": raw }),
            Self::MatchAll => json!({ "match_all": {} }),
            Self::Bool(inner) => inner.to_json(),
        }
    }
}

impl<'de> Deserialize<'de> for QueryClause {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_payload<T: DeserializeOwned>(tag: &str, data: Value) -> Result<T, QueryError> {
    serde_json::from_value(data).map_err(|e| QueryError::MalformedClausePayload {
        tag: tag.to_string(),
        reason: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
