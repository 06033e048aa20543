//! Energy snapshots: the read-only view of a user the assistant works from.
//!
//! The persistence layer owns users and appliances. Per request the assistant
//! receives a [`UserEnergyProfile`] and a list of [`ApplianceSummaryEntry`]
//! values and never writes anything back.

use serde::{Deserialize, Serialize};

/// Cumulative conservation metrics of one user.
///
/// Missing upstream values deserialize to `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEnergyProfile {
    /// The user's identifier
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Gamified conservation score
    #[serde(default)]
    pub energy_points: f64,

    /// Energy saved, in kWh
    #[serde(default)]
    pub energy_saved: f64,

    /// Coal not burned, in kg
    #[serde(default)]
    pub coal_saved: f64,

    /// CO2 emissions prevented, in kg
    #[serde(default)]
    pub co2_reduced: f64,
}

/// One connected appliance as seen by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSummaryEntry {
    pub name: String,

    /// Free-form operational status; `None` when the device never reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Power draw in watts
    #[serde(default)]
    pub power_consumption: f64,

    /// Daily usage in hours
    #[serde(default)]
    pub usage_hours: f64,
}

impl ApplianceSummaryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
            power_consumption: 0.0,
            usage_hours: 0.0,
        }
    }

    pub fn with_power(mut self, watts: f64) -> Self {
        self.power_consumption = watts;
        self
    }

    pub fn with_usage_hours(mut self, hours: f64) -> Self {
        self.usage_hours = hours;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// The numeric bundle the rule engine answers from.
///
/// `Default` is the all-zero, no-appliance bundle used when the real context
/// has been discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySnapshot {
    pub energy_points: f64,
    pub energy_saved: f64,
    pub coal_saved: f64,
    pub co2_reduced: f64,
    pub appliance_count: usize,
    pub appliance_summary: Vec<ApplianceSummaryEntry>,
}

impl EnergySnapshot {
    /// The all-zero bundle.
    pub fn zeroed() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_metrics_default_to_zero() {
        let profile: UserEnergyProfile =
            serde_json::from_str(r#"{"userId": "u1", "name": "Asha"}"#).unwrap();
        assert_eq!(profile.energy_points, 0.0);
        assert_eq!(profile.energy_saved, 0.0);
        assert_eq!(profile.coal_saved, 0.0);
        assert_eq!(profile.co2_reduced, 0.0);
    }

    #[test]
    fn appliance_defaults() {
        let entry: ApplianceSummaryEntry = serde_json::from_str(r#"{"name": "Fridge"}"#).unwrap();
        assert_eq!(entry, ApplianceSummaryEntry::new("Fridge"));
        assert!(entry.status.is_none());
    }

    #[test]
    fn zeroed_snapshot_is_empty() {
        let snapshot = EnergySnapshot::zeroed();
        assert_eq!(snapshot.appliance_count, 0);
        assert!(snapshot.appliance_summary.is_empty());
        assert_eq!(snapshot.energy_points, 0.0);
    }
}
