//! `ecowatt serve`: Start the HTTP API server.

use std::path::Path;
use tracing::info;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("⚡ EcoWatt API");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Database:  {}", config.storage.database_url);
    println!(
        "   Assistant: {}",
        if config.has_credential() {
            "generative with rule fallback"
        } else {
            "rules only"
        }
    );

    info!(
        port = config.gateway.port,
        generative = config.has_credential(),
        "Starting gateway"
    );
    ecowatt_gateway::start(config).await?;

    Ok(())
}
