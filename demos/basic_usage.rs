// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic gateway usage example.
//!
//! Demonstrates:
//! 1. Connecting to a Manticore server over HTTP
//! 2. Creating a table and inserting documents through the tool registry
//! 3. Full-text search compiled to the SQL wire form
//! 4. A boolean query tree compiled to the JSON wire form
//! 5. Displaying metrics (OTEL-compatible)
//! 6. Cleanup
//!
//! # Prerequisites
//!
//! Start a Manticore server:
//! ```bash
//! docker run --rm -p 9308:9308 manticoresearch/manticore:6.2.12
//! ```
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::json;

use manticore_gateway::{
    GatewayConfig, HttpSearchClient, JsonTranslator, Registry, Response, SearchArgs,
    SearchBackend, SqlTranslator,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install metrics recorder (captures all metrics for OTEL export)
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║           manticore-gateway: Basic Usage Example              ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Configure and connect
    // ─────────────────────────────────────────────────────────────────────────
    println!("📦 Configuring gateway...");

    let config = GatewayConfig {
        url: "http://localhost:9308".into(),
        ..Default::default()
    };
    let client = Arc::new(HttpSearchClient::new(&config)?);
    let registry = Registry::new(client.clone(), &config);

    println!("\n🚀 Pinging server at {}...", config.url);
    client.ping().await?;
    println!("   ✅ Server is up");

    println!("\n🧰 Tool catalog:");
    for tool in Registry::tools() {
        println!("   └─ {:<18} {}", tool.name, tool.description);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Create a table and insert documents
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📝 Creating table and inserting 5 products...");

    client
        .execute_sql("DROP TABLE IF EXISTS demo_products")
        .await?;
    client
        .execute_sql("CREATE TABLE demo_products (title text, brand string, price float, stock int)")
        .await?;

    let products = [
        (1, "Gaming laptop", "Voltcraft", 1499.5, 7),
        (2, "Ultralight laptop", "Aerie", 2199.0, 4),
        (3, "Laptop sleeve 15 inch", "Felt&Co", 29.9, 120),
        (4, "Mechanical keyboard", "Clackers", 119.0, 33),
        (5, "USB-C dock", "Voltcraft", 89.0, 51),
    ];
    for (id, title, brand, price, stock) in products {
        let response = registry
            .dispatch(
                "insert_document",
                json!({
                    "table": "demo_products",
                    "id": id,
                    "document": {"title": title, "brand": brand, "price": price, "stock": stock}
                }),
            )
            .await;
        match &response.error {
            None => println!("   └─ Inserted: {} ({})", title, brand),
            Some(error) => println!("   └─ ⚠️  Insert failed: {}", error),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Full-text search through the SQL wire form
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🔍 Searching 'laptop' under 2000 (SQL form)...");

    let arguments = json!({
        "table": "demo_products",
        "query": "laptop",
        "fields": ["id", "title", "price"],
        "where": ["price < 2000"],
        "order_by": ["price ASC"],
        "limit": 10,
        "ranker": "bm25",
        "field_weights": {"title": 10}
    });
    let args: SearchArgs = serde_json::from_value(arguments.clone())?;
    println!("   Compiled: {}", SqlTranslator::translate(&args)?);

    let response = registry.dispatch("search", arguments).await;
    print_rows(&response);

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Boolean query tree through the JSON wire form
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🌳 Searching with a boolean query tree (JSON form)...");

    let arguments = json!({
        "table": "demo_products",
        "bool_query": {
            "must": [
                {"type": "match", "data": {"field": "title", "query": "laptop"}},
                {"type": "range", "data": {"field": "price", "ranges": {"lt": 2000}}}
            ],
            "must_not": [
                {"type": "equals", "data": {"field": "stock", "value": 0}}
            ]
        }
    });
    let args: SearchArgs = serde_json::from_value(arguments.clone())?;
    println!("   Document: {}", JsonTranslator::translate(&args)?);

    let response = registry.dispatch("search", arguments).await;
    print_rows(&response);

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Inspect the table, then dump raw metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📋 Columns of demo_products:");
    let response = registry
        .dispatch("describe_table", json!({"table": "demo_products"}))
        .await;
    print_rows(&response);

    println!("\n📈 Raw Metrics (OTEL export format):");
    dump_metrics(&snapshotter);

    // ─────────────────────────────────────────────────────────────────────────
    // 6. Cleanup
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🧹 Dropping demo_products...");
    client.execute_sql("DROP TABLE demo_products").await?;
    println!("   ✅ Done");

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                    Example complete!                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    Ok(())
}

/// Print the rows of one response envelope, or its error.
fn print_rows(response: &Response) {
    match response.data.as_ref().and_then(|data| data.as_array()) {
        Some(rows) if !rows.is_empty() => {
            for row in rows {
                println!("   └─ {}", row);
            }
        }
        _ => println!("   └─ (no rows)"),
    }
    if let Some(error) = &response.error {
        println!("   ⚠️  {}", error);
    }
    if let Some(meta) = &response.meta {
        if let Some(total) = meta.total {
            println!("   Σ  {} row(s)", total);
        }
    }
}

/// Dump all captured metrics in OTEL-compatible format
fn dump_metrics(snapshotter: &Snapshotter) {
    let snapshot = snapshotter.snapshot();

    let mut counters: Vec<_> = vec![];
    let mut histograms: Vec<_> = vec![];

    for (composite_key, _, _, value) in snapshot.into_vec() {
        let (_kind, key) = composite_key.into_parts();
        let name = key.name();
        let labels: Vec<_> = key
            .labels()
            .map(|l| format!("{}={}", l.key(), l.value()))
            .collect();
        let label_str = if labels.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", labels.join(","))
        };

        match value {
            DebugValue::Counter(v) => counters.push((name.to_string(), label_str, v)),
            DebugValue::Histogram(samples) => {
                let count = samples.len();
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                let avg = if count > 0 { sum / count as f64 } else { 0.0 };
                histograms.push((name.to_string(), label_str, count, avg));
            }
            DebugValue::Gauge(_) => {}
        }
    }

    counters.sort_by(|a, b| a.0.cmp(&b.0));
    histograms.sort_by(|a, b| a.0.cmp(&b.0));

    if !counters.is_empty() {
        println!("   ┌─ Counters (cumulative)");
        for (name, labels, value) in &counters {
            println!("   │  └─ {}{} = {}", name, labels, value);
        }
    }
    if !histograms.is_empty() {
        println!("   └─ Histograms (distributions)");
        for (name, labels, count, avg) in &histograms {
            println!("      └─ {}{} count={} avg={:.4}s", name, labels, count, avg);
        }
    }
    if counters.is_empty() && histograms.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
}
