//! End-to-end session demo: install SDK surfaces, stub them for one
//! "test", and watch teardown put the originals back.
//!
//! Run with: `cargo run --example session`

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use understudy::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Collaborator setup: each substitutable singleton installs its real
    // implementation once, at process start.
    let bindings = Arc::new(BindingTable::new());
    for key in keys::ALL {
        bindings.install(*key, Arc::new(FixedSurface::null(*key)));
    }

    let controller = SessionController::new(bindings.clone());

    // One test's worth of substitutions, with guaranteed teardown.
    let report = {
        controller.begin()?;

        StubKit::new(&controller)
            .app_id(Some("demo-app-123"))?
            .auto_log_events_enabled(false)?
            .default_server_configuration()?
            .graph_request_result(json!({"id": "me", "name": "Demo"}), None)?
            .disable_graph_connections()?;

        // Code under test resolves singletons through the binding table and
        // sees the doubles.
        let settings = bindings.resolve(&BindingKey::new(keys::SETTINGS))?;
        println!(
            "settings.app_id() -> {}",
            settings.handle(Call::new("app_id"))?
        );

        let graph = bindings.resolve(&BindingKey::new(keys::GRAPH_REQUEST))?;
        graph.handle(Call::new("start").with_completion(|args| {
            println!("graph completion -> {} / {}", args[0], args[1]);
        }))?;

        // The strict connection-factory double rejects anything unstubbed.
        let factory = bindings.resolve(&BindingKey::new(keys::GRAPH_CONNECTION_FACTORY))?;
        match factory.handle(Call::new("create_connection")) {
            Err(DoubleError::UnstubbedCall { signature, .. }) => {
                println!("connection factory refused: {signature}");
            }
            other => println!("unexpected outcome: {other:?}"),
        }

        controller.end()?
    };

    println!("teardown restored, in order:");
    for key in report.restored() {
        println!("  {key}");
    }

    // Everything resolves to the pre-test originals again.
    let settings = bindings.resolve(&BindingKey::new(keys::SETTINGS))?;
    println!(
        "after teardown, settings.app_id() -> {}",
        settings.handle(Call::new("app_id"))?
    );

    Ok(())
}
