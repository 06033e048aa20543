//! Prompt composition for the generative service.

use ecowatt_config::AssistantConfig;

/// Builds the single-turn prompt: persona, user data, question, marker.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
    marker: String,
}

impl PromptBuilder {
    pub fn new(persona: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.persona.clone(), config.prompt_marker.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn build(&self, context: &str, message: &str) -> String {
        format!(
            "{}\n\nUser's energy data:\n{}\n\nUser question: {}\n\n{}",
            self.persona, context, message, self.marker
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}
