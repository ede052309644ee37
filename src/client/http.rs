// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Manticore HTTP client.
//!
//! One reqwest client against the two HTTP endpoints: `/sql?mode=raw`
//! takes a raw SphinxQL statement as the request body, `/search` takes a
//! JSON document. Both can report failures inside an HTTP 200 body, so
//! response parsing owns error detection as much as status codes do.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::GatewayConfig;

use super::retry::{retry_request, RetryPolicy};
use super::{ClientError, Row, SearchBackend};

/// HTTP client for a single Manticore server.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl HttpSearchClient {
    /// Build a client from gateway configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            policy: RetryPolicy::new(config.max_retries, config.retry_delay_ms),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_sql(&self, statement: &str) -> Result<Vec<Row>, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/sql?mode=raw"))
            .body(statement.to_string())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }
        let body: Value = response.json().await?;
        sql_rows(body)
    }

    async fn send_search(&self, document: &Value) -> Result<Vec<Row>, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/search"))
            .json(document)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }
        let body: Value = response.json().await?;
        search_rows(body)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn execute_sql(&self, statement: &str) -> Result<Vec<Row>, ClientError> {
        debug!(statement, "executing sql statement");
        retry_request("sql", &self.policy, || self.send_sql(statement)).await
    }

    async fn execute_search(&self, document: &Value) -> Result<Vec<Row>, ClientError> {
        debug!(document = %document, "executing json search");
        retry_request("search", &self.policy, || self.send_search(document)).await
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.execute_sql("SHOW STATUS").await.map(|_| ())
    }
}

/// Extract rows from a raw-mode SQL response.
///
/// The body is an array of result sets; rows come from the first set's
/// `data` array. A non-empty `error` string in that set is a backend
/// failure even under HTTP 200. Statements without a result set (DDL,
/// writes) yield no rows.
fn sql_rows(body: Value) -> Result<Vec<Row>, ClientError> {
    let sets = body.as_array().ok_or_else(|| {
        ClientError::Decode("sql response is not an array of result sets".to_string())
    })?;
    let first = match sets.first() {
        Some(set) => set,
        None => return Ok(Vec::new()),
    };
    if let Some(message) = first
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        return Err(ClientError::Backend(message.to_string()));
    }
    let rows = first
        .get("data")
        .and_then(Value::as_array)
        .map(|data| {
            data.iter()
                .filter_map(|row| row.as_object().cloned())
                .collect()
        })
        .unwrap_or_default();
    Ok(rows)
}

/// Flatten `/search` hits into rows carrying `_id` and `_score` alongside
/// the `_source` fields.
fn search_rows(body: Value) -> Result<Vec<Row>, ClientError> {
    if let Some(error) = body.get("error") {
        let message = match error {
            Value::String(text) => text.clone(),
            detail => detail
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| detail.to_string()),
        };
        return Err(ClientError::Backend(message));
    }
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(hits.len());
    for hit in &hits {
        let mut row = Row::new();
        if let Some(id) = hit.get("_id") {
            row.insert("_id".to_string(), id.clone());
        }
        if let Some(score) = hit.get("_score") {
            row.insert("_score".to_string(), score.clone());
        }
        if let Some(source) = hit.get("_source").and_then(Value::as_object) {
            for (field, value) in source {
                row.insert(field.clone(), value.clone());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sql_rows_from_first_result_set() {
        let rows = sql_rows(json!([
            {
                "columns": [{"id": {"type": "long long"}}, {"title": {"type": "string"}}],
                "data": [
                    {"id": 1, "title": "first"},
                    {"id": 2, "title": "second"}
                ],
                "total": 2,
                "error": "",
                "warning": ""
            }
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[1]["title"], json!("second"));
    }

    #[test]
    fn test_sql_in_body_error_under_200() {
        let err = sql_rows(json!([
            {"total": 0, "error": "unknown local table 'missing'", "warning": ""}
        ]))
        .unwrap_err();

        match err {
            ClientError::Backend(message) => {
                assert_eq!(message, "unknown local table 'missing'")
            }
            other => panic!("Expected Backend, got {:?}", other),
        }
    }

    #[test]
    fn test_sql_statement_without_rows() {
        let rows = sql_rows(json!([
            {"total": 1, "error": "", "warning": ""}
        ]))
        .unwrap();
        assert!(rows.is_empty());

        let rows = sql_rows(json!([])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_sql_response_must_be_an_array() {
        let err = sql_rows(json!({"error": "oops"})).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_search_hits_are_flattened() {
        let rows = search_rows(json!({
            "took": 2,
            "timed_out": false,
            "hits": {
                "total": 1,
                "hits": [
                    {"_id": 7, "_score": 1500, "_source": {"title": "laptop", "price": 999.5}}
                ]
            }
        }))
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["_id"], json!(7));
        assert_eq!(rows[0]["_score"], json!(1500));
        assert_eq!(rows[0]["title"], json!("laptop"));
        assert_eq!(rows[0]["price"], json!(999.5));
    }

    #[test]
    fn test_search_error_object() {
        let err = search_rows(json!({
            "error": {"type": "parse_exception", "reason": "unknown field"}
        }))
        .unwrap_err();

        match err {
            ClientError::Backend(message) => assert_eq!(message, "unknown field"),
            other => panic!("Expected Backend, got {:?}", other),
        }
    }

    #[test]
    fn test_search_error_string() {
        let err = search_rows(json!({"error": "index not found"})).unwrap_err();
        match err {
            ClientError::Backend(message) => assert_eq!(message, "index not found"),
            other => panic!("Expected Backend, got {:?}", other),
        }
    }

    #[test]
    fn test_search_without_hits() {
        let rows = search_rows(json!({"took": 0, "hits": {"total": 0, "hits": []}})).unwrap();
        assert!(rows.is_empty());
    }
}
