//! Persisted records: users and their connected appliances.
//!
//! Field names on the wire follow the public API (`_id`, `deviceID`,
//! `tnElectricityId`, camelCase metrics).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::{ApplianceSummaryEntry, UserEnergyProfile};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Stored trimmed and lowercased
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Electricity board consumer number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tn_electricity_id: Option<String>,

    /// Argon2id PHC string
    #[serde(skip)]
    pub password_hash: String,

    #[serde(default)]
    pub energy_points: f64,

    #[serde(default)]
    pub energy_saved: f64,

    #[serde(default)]
    pub coal_saved: f64,

    #[serde(default)]
    pub co2_reduced: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The immutable snapshot the assistant reads.
    pub fn energy_profile(&self) -> UserEnergyProfile {
        UserEnergyProfile {
            user_id: self.id.clone(),
            name: self.name.clone(),
            energy_points: self.energy_points,
            energy_saved: self.energy_saved,
            coal_saved: self.coal_saved,
            co2_reduced: self.co2_reduced,
        }
    }
}

/// Everything needed to register a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub age: Option<u32>,
    pub email: String,
    pub phone: Option<String>,
    pub tn_electricity_id: Option<String>,
    pub password_hash: String,
}

/// A connected appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    pub name: String,

    pub brand: String,

    #[serde(rename = "deviceID")]
    pub device_id: String,

    #[serde(default)]
    pub power_consumption: f64,

    #[serde(default)]
    pub usage_hours: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Appliance {
    pub fn summary(&self) -> ApplianceSummaryEntry {
        ApplianceSummaryEntry {
            name: self.name.clone(),
            status: self.status.clone(),
            power_consumption: self.power_consumption,
            usage_hours: self.usage_hours,
        }
    }
}

/// Everything needed to connect an appliance.
#[derive(Debug, Clone)]
pub struct NewAppliance {
    pub user_id: String,
    pub name: String,
    pub brand: String,
    pub device_id: String,
    pub power_consumption: f64,
    pub usage_hours: f64,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u-42".into(),
            name: "Meena".into(),
            age: Some(31),
            email: "meena@example.com".into(),
            phone: None,
            tn_electricity_id: Some("TN-0042".into()),
            password_hash: "$argon2id$secret".into(),
            energy_points: 120.0,
            energy_saved: 14.5,
            coal_saved: 7.0,
            co2_reduced: 12.3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_never_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"_id\":\"u-42\""));
        assert!(json.contains("tnElectricityId"));
    }

    #[test]
    fn profile_projection_copies_metrics() {
        let profile = sample_user().energy_profile();
        assert_eq!(profile.user_id, "u-42");
        assert_eq!(profile.name, "Meena");
        assert_eq!(profile.energy_points, 120.0);
        assert_eq!(profile.co2_reduced, 12.3);
    }

    #[test]
    fn appliance_wire_names() {
        let appliance = Appliance {
            id: "a-1".into(),
            user_id: "u-42".into(),
            name: "Air Conditioner".into(),
            brand: "Voltas".into(),
            device_id: "AC-9".into(),
            power_consumption: 1500.0,
            usage_hours: 6.0,
            status: None,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&appliance).unwrap();
        assert_eq!(json["deviceID"], "AC-9");
        assert_eq!(json["userId"], "u-42");
        assert_eq!(json["powerConsumption"], 1500.0);

        let summary = appliance.summary();
        assert_eq!(summary.name, "Air Conditioner");
        assert_eq!(summary.usage_hours, 6.0);
    }
}
