//! Store trait: persistence of users and appliances.
//!
//! The assistant only ever reads through [`EnergyStore::load_user_profile`]
//! and [`EnergyStore::load_appliance_summaries`]; the account and appliance
//! endpoints use the rest.

use async_trait::async_trait;

use crate::energy::{ApplianceSummaryEntry, UserEnergyProfile};
use crate::error::StoreError;
use crate::record::{Appliance, NewAppliance, NewUser, User};

/// The core EnergyStore trait.
///
/// Implementations: SQLite, in-memory (for testing).
#[async_trait]
pub trait EnergyStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Register a user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, user: NewUser) -> std::result::Result<User, StoreError>;

    /// Get a user by ID.
    async fn get_user(&self, id: &str) -> std::result::Result<Option<User>, StoreError>;

    /// Find a user by (already normalised) email.
    async fn find_user_by_email(&self, email: &str)
    -> std::result::Result<Option<User>, StoreError>;

    /// List a user's appliances in insertion order.
    async fn list_appliances(&self, user_id: &str)
    -> std::result::Result<Vec<Appliance>, StoreError>;

    /// Connect a new appliance.
    async fn add_appliance(&self, appliance: NewAppliance)
    -> std::result::Result<Appliance, StoreError>;

    /// Delete an appliance by ID. Returns `false` if it did not exist.
    async fn delete_appliance(&self, id: &str) -> std::result::Result<bool, StoreError>;

    /// Load the energy snapshot of a user, `None` if the user is unknown.
    async fn load_user_profile(
        &self,
        user_id: &str,
    ) -> std::result::Result<Option<UserEnergyProfile>, StoreError> {
        Ok(self.get_user(user_id).await?.map(|u| u.energy_profile()))
    }

    /// Load the appliance summaries of a user.
    async fn load_appliance_summaries(
        &self,
        user_id: &str,
    ) -> std::result::Result<Vec<ApplianceSummaryEntry>, StoreError> {
        Ok(self
            .list_appliances(user_id)
            .await?
            .iter()
            .map(Appliance::summary)
            .collect())
    }
}
