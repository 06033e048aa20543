//! Hugging Face Inference API provider.
//!
//! Sends `{"inputs": prompt, "parameters": {...}}` to a hosted text-generation
//! model and reads the first candidate of a `[{"generated_text": ...}]` reply.

use async_trait::async_trait;
use ecowatt_core::error::ProviderError;
use ecowatt_core::provider::{Credential, GenerationParams, GenerationRequest};
use serde::Serialize;
use tracing::{debug, warn};

/// Default hosted model.
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium";

/// A provider backed by one Hugging Face model endpoint.
pub struct HuggingFaceProvider {
    name: String,
    model_url: String,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    /// Create a provider for the given model URL.
    ///
    /// No request timeout is set here; the generative adapter bounds each call.
    pub fn new(model_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ecowatt/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            name: "huggingface".into(),
            model_url: model_url.into(),
            client,
        }
    }

    pub fn model_url(&self) -> &str {
        &self.model_url
    }

    /// Pull the first candidate's text out of a response body.
    ///
    /// A well-formed body without a candidate yields an empty string; only a
    /// body that is not JSON at all is an error.
    pub fn extract_generated_text(body: &str) -> Result<String, ProviderError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let candidate = match &value {
            serde_json::Value::Array(items) => items.first(),
            serde_json::Value::Object(_) => Some(&value),
            _ => None,
        };

        Ok(candidate
            .and_then(|c| c.get("generated_text"))
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string())
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

#[async_trait]
impl ecowatt_core::Provider for HuggingFaceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: GenerationRequest,
    ) -> std::result::Result<String, ProviderError> {
        let body = ApiRequest {
            inputs: &request.prompt,
            parameters: &request.params,
        };

        debug!(
            provider = %self.name,
            prompt_chars = request.prompt.len(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid token or insufficient permissions".into(),
            ));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Hugging Face API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Self::extract_generated_text(&text)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let response = self
            .client
            .get(&self.model_url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().as_u16() != 404)
    }
}
