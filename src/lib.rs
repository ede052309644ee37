//! # Manticore Gateway
//!
//! A query-translation gateway exposing Manticore Search to tool-calling
//! clients: loosely-typed JSON requests in, exact SphinxQL statements or
//! JSON search documents out, rows back in one uniform envelope.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Registry                            │
//! │  • Tool name + JSON args → typed dispatch                  │
//! │  • Uniform {success, data, error, meta} envelope           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Tool Layer                           │
//! │  • search: SQL or JSON wire form per request shape         │
//! │  • tables / documents / clusters statement builders        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                   (compilers: pure, no I/O)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Query Compilers                        │
//! │  • SqlTranslator  → SELECT … OPTION … (SphinxQL)           │
//! │  • JsonTranslator → /search document                       │
//! │  • Clause trees, escaping, declarative option table        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Execution Client                        │
//! │  • reqwest against /sql?mode=raw and /search               │
//! │  • Bounded fixed-delay retry of transient failures         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use manticore_gateway::{GatewayConfig, HttpSearchClient, Registry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GatewayConfig::default();
//!     let client = HttpSearchClient::new(&config).expect("Failed to build client");
//!     let registry = Registry::new(Arc::new(client), &config);
//!
//!     let response = registry
//!         .dispatch(
//!             "search",
//!             json!({
//!                 "table": "products",
//!                 "query": "laptop",
//!                 "fields": ["title", "price"],
//!                 "limit": 10
//!             }),
//!         )
//!         .await;
//!
//!     println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! }
//! ```
//!
//! ## Features
//!
//! - **Two wire forms**: SphinxQL over `/sql?mode=raw`, JSON over `/search`,
//!   chosen per request shape
//! - **Boolean query trees**: `must`/`should`/`must_not` with a closed
//!   clause set, compiled to the JSON query DSL
//! - **Declarative options**: one table drives `OPTION …` and the JSON
//!   `options` object, including the `boolean_simplify` default rule
//! - **Deterministic statements**: sorted weight maps and columns, so the
//!   same request always compiles to the same bytes
//! - **Bounded retries**: transient failures re-send the identical
//!   statement with a fixed delay
//!
//! ## Configuration
//!
//! See [`GatewayConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`registry`]: Tool dispatch and the [`Registry`] envelope surface
//! - [`tools`]: search, tables, documents and clusters tools
//! - [`query`]: Request model, clause trees, escaping, both compilers
//! - [`client`]: The [`SearchBackend`] seam and the reqwest client
//! - [`config`]: Gateway configuration
//! - [`metrics`]: Metrics facade for hosting processes

pub mod client;
pub mod config;
pub mod metrics;
pub mod query;
pub mod registry;
pub mod tools;

pub use client::{ClientError, HttpSearchClient, RetryPolicy, Row, SearchBackend};
pub use config::GatewayConfig;
pub use metrics::LatencyTimer;
pub use query::{
    BoolQuery, JsonTranslator, QueryClause, QueryError, SearchArgs, SqlTranslator,
};
pub use registry::{Meta, Registry, Response, ToolDescriptor};
pub use tools::{
    ClustersTool, DocumentsTool, SearchOutcome, SearchTool, TablesTool, ToolError, WireForm,
};
