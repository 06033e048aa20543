//! Assistant request/response types and the outcome of one generative call.

use serde::{Deserialize, Serialize};

use crate::error::AssistantError;

/// A question for the energy assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub message: String,
}

impl AssistantRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
        }
    }

    /// Reject blank user ids and messages.
    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.user_id.trim().is_empty() || self.message.trim().is_empty() {
            return Err(AssistantError::InvalidInput(
                "both message and userId are required".into(),
            ));
        }
        Ok(())
    }
}

/// Which path produced a reply. Never sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Accepted output of the generative service
    Generative,
    /// Rule engine on the user's real data
    RuleBased,
    /// Rule engine on zeroed data, with the degraded-service notice
    Degraded,
}

/// The assistant's answer. Only `reply` is serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantResponse {
    pub reply: String,

    #[serde(skip)]
    pub provenance: Provenance,
}

impl AssistantResponse {
    pub fn new(reply: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            reply: reply.into(),
            provenance,
        }
    }
}

/// Result of one attempt at the external generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerativeCallOutcome {
    /// Cleaned, long-enough text
    Success(String),
    /// The service answered, but with nothing usable
    EmptyOrTooShort,
    /// Timeout, non-2xx, malformed payload or connection failure
    TransportError(String),
    /// No credential configured; nothing was sent
    NoCredential,
}

impl GenerativeCallOutcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::EmptyOrTooShort => "empty_or_too_short",
            Self::TransportError(_) => "transport_error",
            Self::NoCredential => "no_credential",
        }
    }
}
