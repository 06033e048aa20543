//! In-memory store: useful for testing and ephemeral runs.

use async_trait::async_trait;
use chrono::Utc;
use ecowatt_core::error::StoreError;
use ecowatt_core::record::{Appliance, NewAppliance, NewUser, User};
use ecowatt_core::store::EnergyStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An in-memory store that keeps users and appliances in Vecs.
/// Useful for testing and sessions where persistence isn't needed.
pub struct InMemoryStore {
    users: Arc<RwLock<Vec<User>>>,
    appliances: Arc<RwLock<Vec<Appliance>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            appliances: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Insert a fully formed user, replacing any user with the same ID.
    ///
    /// Lets tests seed metrics that the public API never writes.
    pub async fn insert_user(&self, user: User) {
        let mut users = self.users.write().await;
        users.retain(|u| u.id != user.id);
        users.push(user);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnergyStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!("email {}", new.email)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            age: new.age,
            email: new.email,
            phone: new.phone,
            tn_electricity_id: new.tn_electricity_id,
            password_hash: new.password_hash,
            energy_points: 0.0,
            energy_saved: 0.0,
            coal_saved: 0.0,
            co2_reduced: 0.0,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_appliances(&self, user_id: &str) -> Result<Vec<Appliance>, StoreError> {
        let appliances = self.appliances.read().await;
        Ok(appliances
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_appliance(&self, new: NewAppliance) -> Result<Appliance, StoreError> {
        if self.get_user(&new.user_id).await?.is_none() {
            return Err(StoreError::MissingReference(format!("user {}", new.user_id)));
        }

        let appliance = Appliance {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            name: new.name,
            brand: new.brand,
            device_id: new.device_id,
            power_consumption: new.power_consumption,
            usage_hours: new.usage_hours,
            status: new.status,
            is_active: true,
            created_at: Utc::now(),
        };
        self.appliances.write().await.push(appliance.clone());
        Ok(appliance)
    }

    async fn delete_appliance(&self, id: &str) -> Result<bool, StoreError> {
        let mut appliances = self.appliances.write().await;
        let len_before = appliances.len();
        appliances.retain(|a| a.id != id);
        Ok(appliances.len() < len_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Kavya".into(),
            age: None,
            email: email.into(),
            phone: None,
            tn_electricity_id: None,
            password_hash: "$argon2id$test".into(),
        }
    }

    fn new_appliance(user_id: &str, name: &str, watts: f64) -> NewAppliance {
        NewAppliance {
            user_id: user_id.into(),
            name: name.into(),
            brand: "Generic".into(),
            device_id: format!("{name}-01"),
            power_consumption: watts,
            usage_hours: 0.0,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("kavya@example.com")).await.unwrap();
        assert!(!user.id.is_empty());
        assert_eq!(user.energy_points, 0.0);

        let by_id = store.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "kavya@example.com");

        let by_email = store.find_user_by_email("kavya@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        store.create_user(new_user("dup@example.com")).await.unwrap();
        let err = store.create_user(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn appliances_keep_insertion_order() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("order@example.com")).await.unwrap();
        for (name, watts) in [("Fan", 75.0), ("Fridge", 150.0), ("Geyser", 2000.0)] {
            store.add_appliance(new_appliance(&user.id, name, watts)).await.unwrap();
        }

        let names: Vec<String> = store
            .load_appliance_summaries(&user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Fan", "Fridge", "Geyser"]);
    }

    #[tokio::test]
    async fn appliance_for_unknown_user_rejected() {
        let store = InMemoryStore::new();
        let err = store
            .add_appliance(new_appliance("ghost", "Fan", 75.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[tokio::test]
    async fn delete_appliance() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("del@example.com")).await.unwrap();
        let appliance = store
            .add_appliance(new_appliance(&user.id, "Heater", 1200.0))
            .await
            .unwrap();

        assert!(store.delete_appliance(&appliance.id).await.unwrap());
        assert!(!store.delete_appliance(&appliance.id).await.unwrap());
        assert!(store.list_appliances(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_of_unknown_user_is_none() {
        let store = InMemoryStore::new();
        assert!(store.load_user_profile("nobody").await.unwrap().is_none());
    }
}
