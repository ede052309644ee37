//! Document write tools.
//!
//! Builders for the four write statements. Values pass through the
//! SphinxQL escaper; columns render in deterministic (sorted) order with
//! `id` always first, so the same payload always produces the same
//! statement.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{Row, SearchBackend};
use crate::query::{self, sql_literal, QueryError};

use super::ToolError;

/// Arguments for `insert` and `replace`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WriteArgs {
    pub table: String,
    pub cluster: Option<String>,
    /// Document id; omitted to let the server assign one
    pub id: Option<i64>,
    /// Column → value payload; null values are skipped
    pub document: BTreeMap<String, Value>,
}

/// Arguments for `update`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateArgs {
    pub table: String,
    pub cluster: Option<String>,
    pub id: Option<i64>,
    pub document: BTreeMap<String, Value>,
    /// Extra condition ANDed onto the id match (caller-trusted)
    pub r#where: Option<String>,
}

/// Arguments for `delete`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteArgs {
    pub table: String,
    pub cluster: Option<String>,
    pub id: Option<i64>,
    pub r#where: Option<String>,
}

/// Document writes against one table.
pub struct DocumentsTool {
    backend: Arc<dyn SearchBackend>,
}

impl DocumentsTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// `INSERT INTO …`, failing on duplicate ids.
    pub async fn insert(&self, args: WriteArgs) -> Result<Vec<Row>, ToolError> {
        let statement = write_statement("INSERT", &args)?;
        super::run_sql(&self.backend, "insert", &statement).await
    }

    /// `REPLACE INTO …`, overwriting an existing id.
    pub async fn replace(&self, args: WriteArgs) -> Result<Vec<Row>, ToolError> {
        let statement = write_statement("REPLACE", &args)?;
        super::run_sql(&self.backend, "replace", &statement).await
    }

    /// `UPDATE … SET … WHERE id=N`, with an optional extra condition.
    pub async fn update(&self, args: UpdateArgs) -> Result<Vec<Row>, ToolError> {
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table").into());
        }
        let id = args.id.ok_or(QueryError::MissingParameter("id"))?;

        let assignments: Vec<String> = args
            .document
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(column, value)| format!("{}={}", column, sql_literal(value)))
            .collect();
        if assignments.is_empty() {
            return Err(QueryError::MissingParameter("document").into());
        }

        let mut statement = format!(
            "UPDATE {} SET {} WHERE id={}",
            query::qualified_table(args.cluster.as_deref(), &args.table),
            assignments.join(", "),
            id
        );
        if let Some(condition) = args.r#where.as_deref().filter(|c| !c.is_empty()) {
            statement.push_str(&format!(" AND ({})", condition));
        }
        super::run_sql(&self.backend, "update", &statement).await
    }

    /// `DELETE FROM …` by id or by raw condition; one of the two is
    /// required.
    pub async fn delete(&self, args: DeleteArgs) -> Result<Vec<Row>, ToolError> {
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table").into());
        }
        let target = query::qualified_table(args.cluster.as_deref(), &args.table);
        let statement = match (args.id, args.r#where.as_deref().filter(|c| !c.is_empty())) {
            (Some(id), _) => format!("DELETE FROM {} WHERE id={}", target, id),
            (None, Some(condition)) => format!("DELETE FROM {} WHERE {}", target, condition),
            (None, None) => return Err(QueryError::MissingParameter("id or where").into()),
        };
        super::run_sql(&self.backend, "delete", &statement).await
    }
}

/// Shared INSERT/REPLACE builder: `id` first, remaining columns sorted,
/// nulls skipped.
fn write_statement(verb: &str, args: &WriteArgs) -> Result<String, QueryError> {
    if args.table.is_empty() {
        return Err(QueryError::MissingParameter("table"));
    }

    let mut columns = Vec::new();
    let mut values = Vec::new();
    if let Some(id) = args.id {
        columns.push("id".to_string());
        values.push(id.to_string());
    }
    for (column, value) in &args.document {
        if value.is_null() {
            continue;
        }
        // An explicit id argument wins over an id column in the payload.
        if column == "id" && args.id.is_some() {
            continue;
        }
        columns.push(column.clone());
        values.push(sql_literal(value));
    }
    if values.is_empty() {
        return Err(QueryError::MissingParameter("document"));
    }

    Ok(format!(
        "{} INTO {} ({}) VALUES ({})",
        verb,
        query::qualified_table(args.cluster.as_deref(), &args.table),
        columns.join(", "),
        values.join(", ")
    ))
}
