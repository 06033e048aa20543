//! Response arbitration: decides which path produces the reply.
//!
//! | generative outcome   | reply                                             |
//! |----------------------|---------------------------------------------------|
//! | no credential        | rules on real data                                |
//! | success              | generated text, verbatim                          |
//! | empty / too short    | rules on real data                                |
//! | transport failure    | rules on zeroed data + `"\n\n"` + degraded notice |
//!
//! A transport failure discards the user's real numbers while a low-quality
//! reply keeps them. Callers relying on the degraded reply must not expect
//! their own figures in it. A store failure while loading the user's data is
//! answered the same way as a transport failure.

use ecowatt_config::AssistantConfig;
use ecowatt_core::assistant::{
    AssistantRequest, AssistantResponse, GenerativeCallOutcome, Provenance,
};
use ecowatt_core::energy::EnergySnapshot;
use ecowatt_core::error::{AssistantError, StoreError};
use ecowatt_core::store::EnergyStore;
use ecowatt_providers::GenerativeClient;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::context::aggregate;
use crate::prompt::PromptBuilder;
use crate::rules::RuleEngine;

/// Separates the fallback reply from the degraded-service notice.
const NOTICE_SEPARATOR: &str = "\n\n";

/// The energy assistant. Stateless across calls; share it behind an `Arc`.
pub struct EnergyAssistant {
    store: Arc<dyn EnergyStore>,
    generative: GenerativeClient,
    prompt: PromptBuilder,
    rules: RuleEngine,
    degraded_notice: String,
}

impl EnergyAssistant {
    pub fn new(store: Arc<dyn EnergyStore>, generative: GenerativeClient) -> Self {
        let defaults = AssistantConfig::default();
        Self {
            store,
            prompt: PromptBuilder::new(defaults.persona, generative.prompt_marker()),
            generative,
            rules: RuleEngine::new(),
            degraded_notice: defaults.degraded_notice,
        }
    }

    /// Wire the assistant from configuration, using the Hugging Face client.
    pub fn from_config(store: Arc<dyn EnergyStore>, config: &AssistantConfig) -> Self {
        Self::new(store, GenerativeClient::from_config(config))
            .with_prompt(PromptBuilder::from_config(config))
            .with_degraded_notice(config.degraded_notice.clone())
    }

    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_degraded_notice(mut self, notice: impl Into<String>) -> Self {
        self.degraded_notice = notice.into();
        self
    }

    pub fn generative(&self) -> &GenerativeClient {
        &self.generative
    }

    pub fn store(&self) -> &Arc<dyn EnergyStore> {
        &self.store
    }

    /// Answer a request after validating it.
    pub async fn answer_request(
        &self,
        request: &AssistantRequest,
    ) -> Result<AssistantResponse, AssistantError> {
        request.validate()?;
        self.answer(&request.user_id, &request.message).await
    }

    /// Answer one question for one user.
    pub async fn answer(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<AssistantResponse, AssistantError> {
        if user_id.trim().is_empty() || message.trim().is_empty() {
            return Err(AssistantError::InvalidInput(
                "both message and userId are required".into(),
            ));
        }

        let profile = match self.store.load_user_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err(AssistantError::UserNotFound(user_id.to_string())),
            Err(e) => return Ok(self.store_failure_reply(user_id, message, e)),
        };
        let appliances = match self.store.load_appliance_summaries(user_id).await {
            Ok(appliances) => appliances,
            Err(e) => return Ok(self.store_failure_reply(user_id, message, e)),
        };

        let context = aggregate(&profile, &appliances);
        debug!(
            user_id = %user_id,
            appliances = context.snapshot.appliance_count,
            "Aggregated user context"
        );

        if !self.generative.has_credential() {
            return Ok(self.rule_reply(user_id, message, &context.snapshot));
        }

        let prompt = self.prompt.build(&context.text, message);
        let response = match self.generative.call(&prompt).await {
            GenerativeCallOutcome::Success(text) => {
                AssistantResponse::new(text, Provenance::Generative)
            }
            GenerativeCallOutcome::EmptyOrTooShort | GenerativeCallOutcome::NoCredential => {
                self.rule_reply(user_id, message, &context.snapshot)
            }
            GenerativeCallOutcome::TransportError(detail) => {
                debug!(user_id = %user_id, error = %detail, "Answering with degraded notice");
                self.degraded_reply(message)
            }
        };

        info!(user_id = %user_id, provenance = ?response.provenance, "Answered question");
        Ok(response)
    }

    fn store_failure_reply(&self, user_id: &str, message: &str, error: StoreError) -> AssistantResponse {
        warn!(user_id = %user_id, error = %error, "Failed to load user data");
        let response = self.degraded_reply(message);
        info!(user_id = %user_id, provenance = ?response.provenance, "Answered question");
        response
    }

    /// Rules on an all-zero bundle, followed by the notice.
    fn degraded_reply(&self, message: &str) -> AssistantResponse {
        let base = self.rules.respond(message, &EnergySnapshot::zeroed());
        AssistantResponse::new(
            format!("{base}{NOTICE_SEPARATOR}{}", self.degraded_notice),
            Provenance::Degraded,
        )
    }

    fn rule_reply(&self, user_id: &str, message: &str, snapshot: &EnergySnapshot) -> AssistantResponse {
        let rule = self.rules.matched_rule(message);
        info!(user_id = %user_id, rule = rule.name, "Answered from rules");
        AssistantResponse::new((rule.respond)(snapshot), Provenance::RuleBased)
    }
}
