// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the gateway.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The hosting process is responsible for choosing the exporter
//! (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `gateway_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `form`: sql, json
//! - `stage`: sql search, json search, show tables, insert, …
//! - `status`: success, error

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

// ═══════════════════════════════════════════════════════════════════════════
// COMPILATION - Statements produced from tool arguments
// ═══════════════════════════════════════════════════════════════════════════

/// Record one compiled query, by wire form
pub fn record_query_compiled(form: &str) {
    counter!(
        "gateway_queries_compiled_total",
        "form" => form.to_string()
    )
    .increment(1);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXECUTION - Backend round trips
// ═══════════════════════════════════════════════════════════════════════════

/// Record a backend execution outcome
pub fn record_execution(stage: &str, status: &str) {
    counter!(
        "gateway_executions_total",
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record backend round-trip latency
pub fn record_execution_latency(stage: &str, duration: Duration) {
    histogram!(
        "gateway_execution_seconds",
        "stage" => stage.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record result-set size
pub fn record_rows_returned(count: usize) {
    histogram!("gateway_result_rows").record(count as f64);
}

/// Record a retried request
pub fn record_retry(operation: &str) {
    counter!(
        "gateway_retries_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    stage: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_execution_latency(self.stage, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests verify the API compiles and doesn't panic.
    // In production, you'd use metrics-util's Recorder for assertions.

    #[test]
    fn test_record_compilation() {
        record_query_compiled("sql");
        record_query_compiled("json");
    }

    #[test]
    fn test_record_execution() {
        record_execution("sql search", "success");
        record_execution("json search", "error");
        record_execution("show tables", "success");
    }

    #[test]
    fn test_record_latency() {
        record_execution_latency("sql search", Duration::from_micros(100));
        record_execution_latency("json search", Duration::from_millis(5));
    }

    #[test]
    fn test_record_rows_and_retries() {
        record_rows_returned(42);
        record_rows_returned(0);
        record_retry("sql");
        record_retry("search");
    }

    #[test]
    fn test_latency_timer() {
        {
            let _timer = LatencyTimer::new("sql search");
            // Simulate some work
            std::thread::sleep(Duration::from_micros(10));
        }
        // Timer recorded on drop
    }
}
