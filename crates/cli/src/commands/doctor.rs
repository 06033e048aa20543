//! `ecowatt doctor`: Diagnose system health.

use ecowatt_config::AppConfig;
use ecowatt_providers::GenerativeClient;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 EcoWatt Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;
    let path = super::resolve_path(config_path);

    if !path.exists() {
        println!("  ⚠️  No config file — defaults in use (run `ecowatt init`)");
        issues += 1;
    }

    let config = match AppConfig::load_with_env(&path) {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    match ecowatt_storage::connect(&config.storage.database_url, config.storage.max_connections).await {
        Ok(store) => println!("  ✅ Database reachable ({})", store.name()),
        Err(e) => {
            println!("  ❌ Database unreachable: {e}");
            issues += 1;
        }
    }

    if config.has_credential() {
        println!("  ✅ Hugging Face token configured");
        if GenerativeClient::from_config(&config.assistant).health_check().await {
            println!("  ✅ Model endpoint reachable");
        } else {
            println!("  ⚠️  Model endpoint unreachable — replies will fall back to rules");
            issues += 1;
        }
    } else {
        println!("  ⚠️  No Hugging Face token — the assistant answers from rules only");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
