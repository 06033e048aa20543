//! `ecowatt status`: Show the resolved configuration.

use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::resolve_path(config_path);
    let config = super::load_config(config_path)?;
    let generation = &config.assistant.generation;

    println!("⚡ EcoWatt Status");
    println!("================");
    println!("  Config file:  {}", path.display());
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  Database:     {}", config.storage.database_url);
    println!("  Model:        {}", config.assistant.model_url);
    println!(
        "  HF token:     {}",
        if config.has_credential() { "configured" } else { "not set (rules only)" }
    );
    println!(
        "  Generation:   max_new_tokens={} temperature={} top_p={}",
        generation.max_new_tokens, generation.temperature, generation.top_p
    );
    println!("  Timeout:      {}s", config.assistant.timeout_secs);
    println!("  Min reply:    {} chars", config.assistant.min_reply_chars);

    if path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `ecowatt init` first");
    }

    Ok(())
}
