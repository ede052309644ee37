//! Replication-cluster management tools.
//!
//! Statement builders for the cluster DDL family. Cluster and table names
//! are caller-trusted identifiers; paths, node lists and variable values
//! go through the SphinxQL escaper.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::client::{Row, SearchBackend};
use crate::query::{quote_str, sql_literal, QueryError};

use super::ToolError;

/// Arguments shared by `create_cluster` and `join_cluster`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterArgs {
    pub name: String,
    /// Data directory for the cluster
    pub path: Option<String>,
    /// Node list, e.g. `"10.0.0.1:9312,10.0.0.2:9312"`
    pub nodes: Option<String>,
}

/// Arguments for adding or dropping a table from a cluster.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlterClusterArgs {
    pub name: String,
    /// `add` or `drop`
    pub operation: String,
    pub table: String,
}

/// Arguments for deleting a cluster.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteClusterArgs {
    pub name: String,
}

/// Arguments for setting a cluster-wide variable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetClusterArgs {
    pub name: String,
    pub variable: String,
    pub value: Value,
}

/// Arguments for reading cluster status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterStatusArgs {
    pub name: Option<String>,
}

/// Cluster lifecycle and status operations.
pub struct ClustersTool {
    backend: Arc<dyn SearchBackend>,
}

impl ClustersTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// `CREATE CLUSTER`, with optional path and node list.
    pub async fn create_cluster(&self, args: ClusterArgs) -> Result<Vec<Row>, ToolError> {
        if args.name.is_empty() {
            return Err(QueryError::MissingParameter("name").into());
        }
        let mut statement = format!("CREATE CLUSTER {}", args.name);
        let mut params = Vec::new();
        if let Some(path) = args.path.as_deref().filter(|p| !p.is_empty()) {
            params.push(format!("{} AS path", quote_str(path)));
        }
        if let Some(nodes) = args.nodes.as_deref().filter(|n| !n.is_empty()) {
            params.push(format!("{} AS nodes", quote_str(nodes)));
        }
        if !params.is_empty() {
            statement.push(' ');
            statement.push_str(&params.join(", "));
        }
        super::run_sql(&self.backend, "create cluster", &statement).await
    }

    /// `JOIN CLUSTER`, either `AT 'node'` or the `AS nodes` list form
    /// when a path is also given.
    pub async fn join_cluster(&self, args: ClusterArgs) -> Result<Vec<Row>, ToolError> {
        if args.name.is_empty() {
            return Err(QueryError::MissingParameter("name").into());
        }
        let nodes = args
            .nodes
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(QueryError::MissingParameter("nodes"))?;

        let statement = match args.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => format!(
                "JOIN CLUSTER {} {} AS nodes, {} AS path",
                args.name,
                quote_str(nodes),
                quote_str(path)
            ),
            None => format!("JOIN CLUSTER {} AT {}", args.name, quote_str(nodes)),
        };
        super::run_sql(&self.backend, "join cluster", &statement).await
    }

    /// `ALTER CLUSTER … ADD|DROP <table>`.
    pub async fn alter_cluster(&self, args: AlterClusterArgs) -> Result<Vec<Row>, ToolError> {
        if args.name.is_empty() {
            return Err(QueryError::MissingParameter("name").into());
        }
        if args.table.is_empty() {
            return Err(QueryError::MissingParameter("table").into());
        }
        let operation = match args.operation.to_lowercase().as_str() {
            "add" => "ADD",
            "drop" => "DROP",
            _ => {
                return Err(ToolError::InvalidArguments(
                    "cluster operation must be 'add' or 'drop'".to_string(),
                ))
            }
        };
        let statement = format!("ALTER CLUSTER {} {} {}", args.name, operation, args.table);
        super::run_sql(&self.backend, "alter cluster", &statement).await
    }

    /// `DELETE CLUSTER`.
    pub async fn delete_cluster(&self, args: DeleteClusterArgs) -> Result<Vec<Row>, ToolError> {
        if args.name.is_empty() {
            return Err(QueryError::MissingParameter("name").into());
        }
        let statement = format!("DELETE CLUSTER {}", args.name);
        super::run_sql(&self.backend, "delete cluster", &statement).await
    }

    /// `SET CLUSTER … GLOBAL 'variable' = value`.
    pub async fn set_cluster(&self, args: SetClusterArgs) -> Result<Vec<Row>, ToolError> {
        if args.name.is_empty() {
            return Err(QueryError::MissingParameter("name").into());
        }
        if args.variable.is_empty() {
            return Err(QueryError::MissingParameter("variable").into());
        }
        if args.value.is_null() {
            return Err(QueryError::MissingParameter("value").into());
        }
        let statement = format!(
            "SET CLUSTER {} GLOBAL {} = {}",
            args.name,
            quote_str(&args.variable),
            sql_literal(&args.value)
        );
        super::run_sql(&self.backend, "set cluster", &statement).await
    }

    /// Cluster counters from `SHOW STATUS`, for one cluster or all.
    pub async fn cluster_status(&self, args: ClusterStatusArgs) -> Result<Vec<Row>, ToolError> {
        let pattern = match args.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("cluster_{}_%", name),
            None => "cluster%".to_string(),
        };
        let statement = format!("SHOW STATUS LIKE {}", quote_str(&pattern));
        super::run_sql(&self.backend, "cluster status", &statement).await
    }
}
