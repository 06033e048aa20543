//! Context aggregation.
//!
//! Turns a profile and its appliance list into the two views the assistant
//! needs: the numeric [`EnergySnapshot`] the rules read, and the text block
//! embedded in the prompt. Pure and deterministic.

use ecowatt_core::energy::{ApplianceSummaryEntry, EnergySnapshot, UserEnergyProfile};

/// Shown instead of a status the device never reported.
const MISSING_STATUS: &str = "undefined";

/// Both views of one user's data.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedContext {
    pub snapshot: EnergySnapshot,
    pub text: String,
}

/// Build the rule bundle and the prompt context text.
pub fn aggregate(profile: &UserEnergyProfile, appliances: &[ApplianceSummaryEntry]) -> AggregatedContext {
    let snapshot = EnergySnapshot {
        energy_points: profile.energy_points,
        energy_saved: profile.energy_saved,
        coal_saved: profile.coal_saved,
        co2_reduced: profile.co2_reduced,
        appliance_count: appliances.len(),
        appliance_summary: appliances.to_vec(),
    };

    AggregatedContext {
        text: render_context(profile, appliances),
        snapshot,
    }
}

/// Render the prompt context block.
pub fn render_context(profile: &UserEnergyProfile, appliances: &[ApplianceSummaryEntry]) -> String {
    let appliance_lines = if appliances.is_empty() {
        "No appliances connected".to_string()
    } else {
        appliances
            .iter()
            .map(|a| {
                format!(
                    "- {}: {}W, {} hours/day, Status: {}",
                    a.name,
                    format_number(a.power_consumption),
                    format_number(a.usage_hours),
                    a.status.as_deref().unwrap_or(MISSING_STATUS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let text = format!(
        "User Information:\n\
         - Name: {}\n\
         - Energy Points: {}\n\
         - Energy Saved: {} kWh\n\
         - Coal Saved: {} kg\n\
         - CO2 Reduced: {} kg\n\
         \n\
         Appliances:\n\
         {}",
        profile.name,
        format_number(profile.energy_points),
        format_number(profile.energy_saved),
        format_number(profile.coal_saved),
        format_number(profile.co2_reduced),
        appliance_lines
    );

    text.trim().to_string()
}

/// Shortest form of a metric: `0`, `12.5`, `100`.
///
/// Magnitudes of `1e21` and above, or below `1e-6`, switch to exponent form
/// with an explicit exponent sign (`1e+21`, `1e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0
        return "0".into();
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) && magnitude.is_finite() {
        let exponent_form = format!("{value:e}");
        return match exponent_form.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => exponent_form,
        };
    }
    value.to_string()
}
