//! `ecowatt ask`: Ask the energy assistant one question from the terminal.

use ecowatt_assistant::EnergyAssistant;
use ecowatt_core::error::AssistantError;
use std::path::Path;
use tracing::info;

pub async fn run(
    config_path: Option<&Path>,
    user_id: &str,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = ecowatt_storage::connect(
        &config.storage.database_url,
        config.storage.max_connections,
    )
    .await?;
    info!(store = store.name(), user_id = %user_id, "Asking the assistant");
    let assistant = EnergyAssistant::from_config(store, &config.assistant);

    match assistant.answer(user_id, message).await {
        Ok(response) => {
            println!("{}", response.reply);
            Ok(())
        }
        Err(AssistantError::UserNotFound(id)) => Err(format!("User not found: {id}").into()),
        Err(e) => Err(e.into()),
    }
}
