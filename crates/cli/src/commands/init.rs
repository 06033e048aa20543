//! `ecowatt init`: Write the default config file.

use ecowatt_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::resolve_path(config_path);

    if path.exists() && !force {
        println!("  Config file exists: {}", path.display());
        println!("  Use --force to overwrite it.");
        return Ok(());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Wrote {}", path.display());

    println!();
    println!("Next steps:");
    println!("  1. Set HF_TOKEN (or assistant.hf_token) to enable generated replies");
    println!("  2. Run `ecowatt doctor` to check the setup");
    println!("  3. Run `ecowatt serve` to start the API");

    Ok(())
}
