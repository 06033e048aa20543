//! Keyword rule engine.
//!
//! An ordered table of rules. The lowercased message is tested against each
//! rule's keywords by substring; the first rule with a hit answers. The last
//! rule has no keywords and always matches, so every message gets a reply.

use ecowatt_core::energy::EnergySnapshot;

use crate::context::format_number;

/// One entry of the rule table.
pub struct Rule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub respond: fn(&EnergySnapshot) -> String,
}

impl Rule {
    /// Whether this rule fires for an already-lowercased message.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.is_empty() || self.keywords.iter().any(|k| lowered.contains(k))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("keywords", &self.keywords)
            .finish()
    }
}

// ── Replies ───────────────────────────────────────────────────────────────

fn points_reply(s: &EnergySnapshot) -> String {
    format!(
        "You currently have {} energy points! Keep saving energy to earn more points.",
        format_number(s.energy_points)
    )
}

fn savings_reply(s: &EnergySnapshot) -> String {
    format!(
        "Great job! You've saved {} kWh of energy. This is equivalent to {} kg of coal not burned and {} kg of CO2 emissions prevented!",
        format_number(s.energy_saved),
        format_number(s.coal_saved),
        format_number(s.co2_reduced)
    )
}

fn appliances_reply(s: &EnergySnapshot) -> String {
    if s.appliance_count == 0 {
        return "You have no appliances connected yet. Connect your appliances to track their energy consumption!".into();
    }
    let lines: Vec<String> = s
        .appliance_summary
        .iter()
        .map(|a| format!("• {}: {}W", a.name, format_number(a.power_consumption)))
        .collect();
    format!(
        "You have {} appliance(s) connected:\n{}",
        s.appliance_count,
        lines.join("\n")
    )
}

fn tips_reply(_: &EnergySnapshot) -> String {
    "Here are some energy-saving tips:\n\
     • Turn off unused appliances\n\
     • Use LED bulbs\n\
     • Set your AC to 24-26°C\n\
     • Unplug chargers when not in use"
        .into()
}

fn environment_reply(s: &EnergySnapshot) -> String {
    format!(
        "Your environmental impact:\n• Coal saved: {} kg\n• CO2 reduced: {} kg\nYou're making a positive difference!",
        format_number(s.coal_saved),
        format_number(s.co2_reduced)
    )
}

fn greeting_reply(_: &EnergySnapshot) -> String {
    "Hello! I'm your EcoWatt energy assistant. Ask me about your energy usage, tips to save power, or your environmental impact!".into()
}

fn menu_reply(_: &EnergySnapshot) -> String {
    "I can help you with:\n\
     • Your energy points and savings\n\
     • Appliance usage information\n\
     • Energy-saving tips\n\
     • Your environmental impact\n\
     \n\
     What would you like to know?"
        .into()
}

/// The rules in priority order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "points",
        keywords: &["point", "score"],
        respond: points_reply,
    },
    Rule {
        name: "savings",
        keywords: &["save", "saved"],
        respond: savings_reply,
    },
    Rule {
        name: "appliances",
        keywords: &["appliance", "device"],
        respond: appliances_reply,
    },
    Rule {
        name: "tips",
        keywords: &["tip", "how to", "advice"],
        respond: tips_reply,
    },
    Rule {
        name: "environment",
        keywords: &["environment", "coal", "co2", "carbon"],
        respond: environment_reply,
    },
    Rule {
        name: "greeting",
        keywords: &["hello", "hi", "hey"],
        respond: greeting_reply,
    },
    Rule {
        name: "menu",
        keywords: &[],
        respond: menu_reply,
    },
];

// ── Engine ────────────────────────────────────────────────────────────────

/// Answers a message from an [`EnergySnapshot`] using [`RULES`].
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    rules: &'static [Rule],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// The rule that answers `message`.
    pub fn matched_rule(&self, message: &str) -> &'static Rule {
        let lowered = message.to_lowercase();
        let rules = self.rules;
        rules
            .iter()
            .find(|r| r.matches(&lowered))
            .unwrap_or(&rules[rules.len() - 1])
    }

    /// Reply to `message` from `snapshot`. Never empty.
    pub fn respond(&self, message: &str, snapshot: &EnergySnapshot) -> String {
        (self.matched_rule(message).respond)(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecowatt_core::energy::ApplianceSummaryEntry;

    fn snapshot() -> EnergySnapshot {
        let appliances = vec![
            ApplianceSummaryEntry::new("Fridge").with_power(150.0),
            ApplianceSummaryEntry::new("AC").with_power(1500.0),
        ];
        EnergySnapshot {
            energy_points: 320.0,
            energy_saved: 42.5,
            coal_saved: 21.0,
            co2_reduced: 38.25,
            appliance_count: appliances.len(),
            appliance_summary: appliances,
        }
    }

    fn rule_for(message: &str) -> &'static str {
        RuleEngine::new().matched_rule(message).name
    }

    #[test]
    fn table_order_is_fixed() {
        let names: Vec<&str> = RuleEngine::new().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["points", "savings", "appliances", "tips", "environment", "greeting", "menu"]
        );
    }

    #[test]
    fn points_reply_text() {
        assert_eq!(
            RuleEngine::new().respond("What's my SCORE?", &snapshot()),
            "You currently have 320 energy points! Keep saving energy to earn more points."
        );
    }

    #[test]
    fn savings_reply_text() {
        assert_eq!(
            RuleEngine::new().respond("how much have I saved", &snapshot()),
            "Great job! You've saved 42.5 kWh of energy. This is equivalent to 21 kg of coal not burned and 38.25 kg of CO2 emissions prevented!"
        );
    }

    #[test]
    fn savings_beat_environment() {
        assert_eq!(rule_for("how much did I save on the environment"), "savings");
    }

    #[test]
    fn points_beat_everything() {
        assert_eq!(rule_for("hi, how many points did I save on my devices?"), "points");
    }

    #[test]
    fn appliance_list() {
        assert_eq!(
            RuleEngine::new().respond("list my devices", &snapshot()),
            "You have 2 appliance(s) connected:\n• Fridge: 150W\n• AC: 1500W"
        );
    }

    #[test]
    fn no_appliances_prompt() {
        assert_eq!(
            RuleEngine::new().respond("show my appliances", &EnergySnapshot::zeroed()),
            "You have no appliances connected yet. Connect your appliances to track their energy consumption!"
        );
    }

    #[test]
    fn tips_reply_text() {
        let reply = RuleEngine::new().respond("Any advice?", &snapshot());
        assert!(reply.starts_with("Here are some energy-saving tips:\n• Turn off unused appliances"));
        assert!(reply.ends_with("• Unplug chargers when not in use"));
        assert_eq!(rule_for("how to cut my bill"), "tips");
    }

    #[test]
    fn environment_reply_text() {
        assert_eq!(
            RuleEngine::new().respond("my carbon footprint", &snapshot()),
            "Your environmental impact:\n• Coal saved: 21 kg\n• CO2 reduced: 38.25 kg\nYou're making a positive difference!"
        );
        assert_eq!(rule_for("CO2"), "environment");
    }

    #[test]
    fn greeting_is_substring_match() {
        assert_eq!(rule_for("Hey there"), "greeting");
        assert_eq!(rule_for("is this working"), "greeting");
    }

    #[test]
    fn default_menu() {
        let reply = RuleEngine::new().respond("what is the weather", &snapshot());
        assert!(reply.starts_with("I can help you with:\n• Your energy points and savings"));
        assert!(reply.ends_with("\n\nWhat would you like to know?"));
        assert_eq!(rule_for(""), "menu");
    }

    #[test]
    fn every_reply_is_non_empty() {
        let engine = RuleEngine::new();
        for message in ["points", "saved", "device", "tip", "coal", "hello", "zzz"] {
            assert!(!engine.respond(message, &EnergySnapshot::zeroed()).is_empty());
            assert!(!engine.respond(message, &snapshot()).is_empty());
        }
    }

    #[test]
    fn zeroed_snapshot_prints_zeroes() {
        assert_eq!(
            RuleEngine::new().respond("points", &EnergySnapshot::zeroed()),
            "You currently have 0 energy points! Keep saving energy to earn more points."
        );
    }
}
