// ERP assistant entry point
// Reads one request from stdin and prints the outcome as JSON

use anyhow::Context;
use std::io::Read;
use std::sync::Arc;
use tracing::info;

use erp_assistant_core::models::AssistantRequest;
use erp_assistant_core::telemetry::init_tracing;
use erp_assistant_core::{AssistantConfig, DispatcherHandle, SolicitationStore, TelemetryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before the logging settings are read
    dotenv::dotenv().ok();
    let telemetry = TelemetryConfig::from_env().context("invalid logging configuration")?;
    init_tracing(&telemetry);

    let config = AssistantConfig::from_env().context("invalid assistant configuration")?;
    info!(
        base_url = %config.base_url,
        environment = %config.environment,
        "ERP assistant starting"
    );

    let store = Arc::new(SolicitationStore::with_default_limit(config.list_limit));
    let handle = DispatcherHandle::new(&config, store.clone())?;

    let health_only = std::env::args().skip(1).any(|arg| arg == "--health");
    if health_only {
        let status = handle.check_health().await?;
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
    let request: AssistantRequest =
        serde_json::from_str(&input).context("request is not valid JSON")?;

    let outcome = handle.dispatch(request).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    info!(solicitations = store.len(), "ERP assistant finished");
    Ok(())
}
