//! Persistence backends for EcoWatt users and appliances.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use ecowatt_core::error::StoreError;
use ecowatt_core::store::EnergyStore;
use std::sync::Arc;

/// Open the store named by a database URL.
///
/// `memory` selects the in-process store; anything else is handed to SQLite.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<Arc<dyn EnergyStore>, StoreError> {
    if database_url == "memory" {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    #[cfg(feature = "sqlite")]
    {
        let store = SqliteStore::new(database_url, max_connections).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = max_connections;
        Err(StoreError::Storage(format!(
            "No backend compiled in for '{database_url}'"
        )))
    }
}
