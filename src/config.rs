//! Configuration for the gateway.
//!
//! # Example
//!
//! ```
//! use manticore_gateway::GatewayConfig;
//!
//! // Minimal config (uses defaults)
//! let config = GatewayConfig::default();
//! assert_eq!(config.url, "http://localhost:9308");
//!
//! // Full config
//! let config = GatewayConfig {
//!     url: "http://search.internal:9308".into(),
//!     request_timeout_ms: 5_000,
//!     max_retries: 1,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the gateway.
///
/// All fields have sensible defaults. At minimum, you should configure
/// `url` to point at the Manticore HTTP listener for production use.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Manticore HTTP endpoint (e.g., "http://localhost:9308")
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries per request on transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Result limit applied when a search request leaves limit unset
    #[serde(default = "default_max_results_per_query")]
    pub max_results_per_query: u64,
}

fn default_url() -> String {
    "http://localhost:9308".to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1_000
}
fn default_max_results_per_query() -> u64 {
    100
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            max_results_per_query: default_max_results_per_query(),
        }
    }
}
