//! Generative client adapter: one bounded attempt per question.
//!
//! The adapter owns the credential, the generation budget and the timeout.
//! Whatever happens downstream, [`GenerativeClient::call`] resolves to a
//! [`GenerativeCallOutcome`]; it never returns an error and never retries.

use ecowatt_config::AssistantConfig;
use ecowatt_core::assistant::GenerativeCallOutcome;
use ecowatt_core::provider::{Credential, GenerationParams, GenerationRequest, Provider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::huggingface::HuggingFaceProvider;

/// Default minimum length of an accepted reply, in UTF-16 code units.
pub const DEFAULT_MIN_REPLY_CHARS: usize = 10;

/// Wraps a [`Provider`] with the single-attempt policy.
pub struct GenerativeClient {
    provider: Arc<dyn Provider>,
    credential: Option<Credential>,
    params: GenerationParams,
    timeout: Duration,
    min_reply_chars: usize,
    prompt_marker: String,
}

impl GenerativeClient {
    pub fn new(provider: Arc<dyn Provider>, credential: Option<Credential>) -> Self {
        Self {
            provider,
            credential,
            params: GenerationParams::default(),
            timeout: Duration::from_secs(30),
            min_reply_chars: DEFAULT_MIN_REPLY_CHARS,
            prompt_marker: "Provide a helpful response:".into(),
        }
    }

    /// Build the Hugging Face client described by the assistant config.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let provider = Arc::new(HuggingFaceProvider::new(config.model_url.clone()));
        Self::new(provider, config.credential())
            .with_params(config.generation)
            .with_timeout(config.timeout())
            .with_min_reply_chars(config.min_reply_chars)
            .with_prompt_marker(config.prompt_marker.clone())
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_reply_chars(mut self, min: usize) -> Self {
        self.min_reply_chars = min;
        self
    }

    pub fn with_prompt_marker(mut self, marker: impl Into<String>) -> Self {
        self.prompt_marker = marker.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn prompt_marker(&self) -> &str {
        &self.prompt_marker
    }

    /// Probe the provider endpoint.
    pub async fn health_check(&self) -> bool {
        match tokio::time::timeout(self.timeout, self.provider.health_check()).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(e)) => {
                warn!(provider = %self.provider.name(), error = %e, "Health check failed");
                false
            }
            Err(_) => false,
        }
    }

    /// Make one attempt at the generative service.
    pub async fn call(&self, prompt: &str) -> GenerativeCallOutcome {
        let Some(credential) = &self.credential else {
            debug!("No generative credential configured; skipping call");
            return GenerativeCallOutcome::NoCredential;
        };

        let provider_name = self.provider.name();
        let request = GenerationRequest::new(prompt, self.params);
        let started = Instant::now();

        let outcome = match tokio::time::timeout(
            self.timeout,
            self.provider.generate(credential, request),
        )
        .await
        {
            Ok(Ok(raw)) => {
                let text = clean_reply(&raw, &self.prompt_marker);
                if text.encode_utf16().count() < self.min_reply_chars {
                    GenerativeCallOutcome::EmptyOrTooShort
                } else {
                    GenerativeCallOutcome::Success(text)
                }
            }
            Ok(Err(e)) => {
                warn!(provider = %provider_name, error = %e, "Generative call failed");
                GenerativeCallOutcome::TransportError(e.to_string())
            }
            Err(_) => {
                warn!(
                    provider = %provider_name,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Generative call timed out"
                );
                GenerativeCallOutcome::TransportError(format!(
                    "Provider '{}' timed out after {:?}",
                    provider_name, self.timeout
                ))
            }
        };

        info!(
            provider = %provider_name,
            outcome = outcome.label(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generative call finished"
        );
        outcome
    }
}

/// Post-process raw generated text.
///
/// When the marker occurs, only the segment after its first occurrence (up to
/// any second occurrence) is kept, trimmed. Otherwise the text is untouched.
pub fn clean_reply(raw: &str, marker: &str) -> String {
    if marker.is_empty() || !raw.contains(marker) {
        return raw.to_string();
    }
    raw.split(marker)
        .nth(1)
        .unwrap_or_default()
        .trim()
        .to_string()
}
