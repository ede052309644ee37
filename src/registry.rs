// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Tool registry and response envelope.
//!
//! The crate's outermost surface: a hosting layer hands over a tool name
//! and a JSON argument object, and gets back one uniform envelope. Every
//! failure mode — unknown tool, malformed arguments, compilation error,
//! backend error — lands in the same `success=false` shape; dispatch
//! never panics on caller input.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::client::{Row, SearchBackend};
use crate::config::GatewayConfig;
use crate::tools::clusters::{
    AlterClusterArgs, ClusterArgs, ClusterStatusArgs, DeleteClusterArgs, SetClusterArgs,
};
use crate::tools::documents::{DeleteArgs, UpdateArgs, WriteArgs};
use crate::tools::tables::{DescribeTableArgs, ShowTablesArgs};
use crate::tools::{ClustersTool, DocumentsTool, SearchTool, TablesTool, ToolError};
use crate::query::SearchArgs;

/// One entry in the tool catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// The tool catalog, in presentation order.
pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "search",
        description: "Full-text search over one table, with filters, ranking options and highlighting",
    },
    ToolDescriptor {
        name: "show_tables",
        description: "List tables, optionally filtered by a LIKE pattern",
    },
    ToolDescriptor {
        name: "describe_table",
        description: "Show the columns and types of one table",
    },
    ToolDescriptor {
        name: "insert_document",
        description: "Insert one document into a table",
    },
    ToolDescriptor {
        name: "replace_document",
        description: "Insert or overwrite one document by id",
    },
    ToolDescriptor {
        name: "update_document",
        description: "Update attribute columns of one document by id",
    },
    ToolDescriptor {
        name: "delete_document",
        description: "Delete documents by id or by condition",
    },
    ToolDescriptor {
        name: "create_cluster",
        description: "Create a replication cluster",
    },
    ToolDescriptor {
        name: "join_cluster",
        description: "Join this node to an existing replication cluster",
    },
    ToolDescriptor {
        name: "alter_cluster",
        description: "Add a table to or drop a table from a cluster",
    },
    ToolDescriptor {
        name: "delete_cluster",
        description: "Delete a replication cluster",
    },
    ToolDescriptor {
        name: "set_cluster",
        description: "Set a cluster-wide variable",
    },
    ToolDescriptor {
        name: "cluster_status",
        description: "Show replication status counters for one cluster or all",
    },
];

/// Result metadata attached to successful envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// Uniform response envelope for every tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Success envelope for a plain row list.
    pub fn rows(rows: Vec<Row>) -> Self {
        let count = rows.len() as u64;
        Self::ok(json!(rows)).with_meta(Meta {
            count: Some(count),
            ..Default::default()
        })
    }
}

/// Name-based dispatch over every tool the gateway carries.
pub struct Registry {
    search: SearchTool,
    tables: TablesTool,
    documents: DocumentsTool,
    clusters: ClustersTool,
}

impl Registry {
    pub fn new(backend: Arc<dyn SearchBackend>, config: &GatewayConfig) -> Self {
        Self {
            search: SearchTool::new(backend.clone(), config),
            tables: TablesTool::new(backend.clone()),
            documents: DocumentsTool::new(backend.clone()),
            clusters: ClustersTool::new(backend),
        }
    }

    /// The tool catalog for hosting layers.
    pub fn tools() -> &'static [ToolDescriptor] {
        TOOLS
    }

    /// Run one tool call and fold every outcome into the envelope.
    pub async fn dispatch(&self, tool: &str, arguments: Value) -> Response {
        match self.try_dispatch(tool, arguments).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Tool '{}' failed: {}", tool, error);
                Response::error(error.to_string())
            }
        }
    }

    async fn try_dispatch(&self, tool: &str, arguments: Value) -> Result<Response, ToolError> {
        match tool {
            "search" => {
                let args: SearchArgs = parse_args(arguments)?;
                let cluster = args.cluster.clone();
                let outcome = self.search.search(args).await?;
                let meta = Meta {
                    total: Some(outcome.rows.len() as u64),
                    limit: Some(outcome.limit),
                    offset: Some(outcome.offset),
                    table: Some(outcome.table.clone()),
                    cluster,
                    ..Default::default()
                };
                Ok(Response::ok(json!(outcome.rows)).with_meta(meta))
            }
            "show_tables" => {
                let args: ShowTablesArgs = parse_args(arguments)?;
                Ok(Response::rows(self.tables.show_tables(args).await?))
            }
            "describe_table" => {
                let args: DescribeTableArgs = parse_args(arguments)?;
                Ok(Response::rows(self.tables.describe_table(args).await?))
            }
            "insert_document" => {
                let args: WriteArgs = parse_args(arguments)?;
                Ok(acknowledge("insert", self.documents.insert(args).await?))
            }
            "replace_document" => {
                let args: WriteArgs = parse_args(arguments)?;
                Ok(acknowledge("replace", self.documents.replace(args).await?))
            }
            "update_document" => {
                let args: UpdateArgs = parse_args(arguments)?;
                Ok(acknowledge("update", self.documents.update(args).await?))
            }
            "delete_document" => {
                let args: DeleteArgs = parse_args(arguments)?;
                Ok(acknowledge("delete", self.documents.delete(args).await?))
            }
            "create_cluster" => {
                let args: ClusterArgs = parse_args(arguments)?;
                Ok(acknowledge("create", self.clusters.create_cluster(args).await?))
            }
            "join_cluster" => {
                let args: ClusterArgs = parse_args(arguments)?;
                Ok(acknowledge("join", self.clusters.join_cluster(args).await?))
            }
            "alter_cluster" => {
                let args: AlterClusterArgs = parse_args(arguments)?;
                Ok(acknowledge("alter", self.clusters.alter_cluster(args).await?))
            }
            "delete_cluster" => {
                let args: DeleteClusterArgs = parse_args(arguments)?;
                Ok(acknowledge("delete", self.clusters.delete_cluster(args).await?))
            }
            "set_cluster" => {
                let args: SetClusterArgs = parse_args(arguments)?;
                Ok(acknowledge("set", self.clusters.set_cluster(args).await?))
            }
            "cluster_status" => {
                let args: ClusterStatusArgs = parse_args(arguments)?;
                Ok(Response::rows(self.clusters.cluster_status(args).await?))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn acknowledge(operation: &str, rows: Vec<Row>) -> Response {
    let meta = Meta {
        count: Some(rows.len() as u64),
        operation: Some(operation.to_string()),
        ..Default::default()
    };
    Response::ok(json!(rows)).with_meta(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{row, MockBackend};

    fn registry(mock: &Arc<MockBackend>) -> Registry {
        Registry::new(mock.clone(), &GatewayConfig::default())
    }

    #[tokio::test]
    async fn test_search_envelope() {
        let mock = Arc::new(MockBackend::with_rows(vec![
            row(json!({"id": 1, "title": "first"})),
            row(json!({"id": 2, "title": "second"})),
        ]));
        let response = registry(&mock)
            .dispatch("search", json!({"table": "products", "query": "x", "limit": 10}))
            .await;

        assert!(response.success);
        assert_eq!(response.error, None);
        let meta = response.meta.unwrap();
        assert_eq!(meta.total, Some(2));
        assert_eq!(meta.limit, Some(10));
        assert_eq!(meta.table.as_deref(), Some("products"));
        assert_eq!(response.data.unwrap().as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let mock = Arc::new(MockBackend::new());
        let response = registry(&mock).dispatch("explain_query", json!({})).await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("unknown tool 'explain_query'"));
    }

    #[tokio::test]
    async fn test_malformed_arguments_become_an_envelope() {
        let mock = Arc::new(MockBackend::new());
        let response = registry(&mock)
            .dispatch("search", json!({"table": "t", "limit": "ten"}))
            .await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("invalid arguments:"));
    }

    #[tokio::test]
    async fn test_non_object_arguments_do_not_panic() {
        let mock = Arc::new(MockBackend::new());
        let response = registry(&mock).dispatch("search", json!([1, 2, 3])).await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_clause_errors_surface_in_the_envelope() {
        let mock = Arc::new(MockBackend::new());
        let response = registry(&mock)
            .dispatch(
                "search",
                json!({
                    "table": "t",
                    "bool_query": {"must": [{"type": "wildcard", "data": {}}]}
                }),
            )
            .await;
        assert!(!response.success);
        assert!(response
            .error
            .unwrap()
            .contains("unsupported query clause type 'wildcard'"));
    }

    #[tokio::test]
    async fn test_write_acknowledgement_meta() {
        let mock = Arc::new(MockBackend::new());
        let response = registry(&mock)
            .dispatch(
                "insert_document",
                json!({"table": "products", "id": 1, "document": {"title": "x"}}),
            )
            .await;
        assert!(response.success);
        let meta = response.meta.unwrap();
        assert_eq!(meta.operation.as_deref(), Some("insert"));
        assert_eq!(meta.count, Some(0));
    }

    #[tokio::test]
    async fn test_backend_failures_become_envelopes() {
        let mock = Arc::new(MockBackend::failing(|| {
            crate::client::ClientError::Backend("unknown local table 't'".to_string())
        }));
        let response = registry(&mock)
            .dispatch("search", json!({"table": "t", "query": "x"}))
            .await;
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("sql search failed: backend error: unknown local table 't'")
        );
    }

    #[test]
    fn test_envelope_serialization_skips_empty_fields() {
        let value = serde_json::to_value(Response::error("nope")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "nope"}));

        let value = serde_json::to_value(Response::ok(json!([]))).unwrap();
        assert_eq!(value, json!({"success": true, "data": []}));
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<&str> = Registry::tools().iter().map(|t| t.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(names.contains(&"search"));
    }
}
