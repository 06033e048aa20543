//! Configuration loading, validation, and management for EcoWatt.
//!
//! Loads configuration from `~/.ecowatt/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.

use ecowatt_core::provider::{Credential, GenerationParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.ecowatt/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Energy assistant settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Hugging Face access token. Absent = rule-based replies only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hf_token: Option<String>,

    /// Inference endpoint of the hosted model
    #[serde(default = "default_model_url")]
    pub model_url: String,

    /// Upper bound on the single generative call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Generated replies shorter than this (in UTF-16 code units) are discarded
    #[serde(default = "default_min_reply_chars")]
    pub min_reply_chars: usize,

    /// Opening instructions of the prompt
    #[serde(default = "default_persona")]
    pub persona: String,

    /// Last line of the prompt; generated text after it is the reply
    #[serde(default = "default_prompt_marker")]
    pub prompt_marker: String,

    /// Appended to the fallback reply when the generative service fails
    #[serde(default = "default_degraded_notice")]
    pub degraded_notice: String,

    /// Generation budget
    #[serde(default)]
    pub generation: GenerationParams,
}

fn default_model_url() -> String {
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_min_reply_chars() -> usize {
    10
}
fn default_persona() -> String {
    concat!(
        "You are an energy efficiency assistant for EcoWatt app. ",
        "Help users understand their energy consumption, provide tips to save energy, ",
        "and explain their environmental impact. Be friendly, concise, and helpful."
    )
    .into()
}
fn default_prompt_marker() -> String {
    "Provide a helpful response:".into()
}
fn default_degraded_notice() -> String {
    "(Note: AI service temporarily unavailable. Using basic responses.)".into()
}

impl AssistantConfig {
    /// The configured credential, if any. Blank tokens count as absent.
    pub fn credential(&self) -> Option<Credential> {
        self.hf_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Credential::new)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            hf_token: None,
            model_url: default_model_url(),
            generation: GenerationParams::default(),
            timeout_secs: default_timeout_secs(),
            min_reply_chars: default_min_reply_chars(),
            persona: default_persona(),
            prompt_marker: default_prompt_marker(),
            degraded_notice: default_degraded_notice(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("hf_token", &redact(&self.hf_token))
            .field("model_url", &self.model_url)
            .field("generation", &self.generation)
            .field("timeout_secs", &self.timeout_secs)
            .field("min_reply_chars", &self.min_reply_chars)
            .field("prompt_marker", &self.prompt_marker)
            .field("degraded_notice", &self.degraded_notice)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Allowed CORS origins. Empty = any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_origins: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `sqlite://path/to.db`, `sqlite::memory:`, or `memory` for the
    /// non-persistent in-process store
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://ecowatt.db".into()
}
fn default_max_connections() -> u32 {
    4
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ecowatt/config.toml).
    ///
    /// Environment variables override the file:
    /// - `ECOWATT_HF_TOKEN` / `HF_TOKEN`: generative credential
    /// - `ECOWATT_MODEL_URL`: inference endpoint
    /// - `ECOWATT_HOST`, `PORT`: gateway bind address
    /// - `ECOWATT_DATABASE_URL` / `DATABASE_URL`: store location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// Load from a specific file, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup function.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("ECOWATT_HF_TOKEN").or_else(|| lookup("HF_TOKEN")) {
            self.assistant.hf_token = Some(token);
        }

        if let Some(url) = lookup("ECOWATT_MODEL_URL") {
            self.assistant.model_url = url;
        }

        if let Some(host) = lookup("ECOWATT_HOST") {
            self.gateway.host = host;
        }

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
            }
        }

        if let Some(url) = lookup("ECOWATT_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            self.storage.database_url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ecowatt")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.assistant.generation;

        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(ConfigError::ValidationError(
                "assistant.generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if generation.top_p <= 0.0 || generation.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "assistant.generation.top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if generation.max_new_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.generation.max_new_tokens must be > 0".into(),
            ));
        }

        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.timeout_secs must be > 0".into(),
            ));
        }

        if self.assistant.prompt_marker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assistant.prompt_marker must not be empty".into(),
            ));
        }

        if self.assistant.degraded_notice.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assistant.degraded_notice must not be empty".into(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "storage.max_connections must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if a generative credential is available.
    pub fn has_credential(&self) -> bool {
        self.assistant.credential().is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.assistant.min_reply_chars, 10);
        assert_eq!(config.assistant.prompt_marker, "Provide a helpful response:");
        assert!(!config.has_credential());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.assistant.model_url, config.assistant.model_url);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.assistant.generation, config.assistant.generation);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.assistant.generation.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_top_p_rejected() {
        let mut config = AppConfig::default();
        config.assistant.generation.top_p = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_marker_rejected() {
        let mut config = AppConfig::default();
        config.assistant.prompt_marker = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().gateway.port, 3000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[assistant]
min_reply_chars = 20

[assistant.generation]
max_new_tokens = 64

[gateway]
port = 8080
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.assistant.min_reply_chars, 20);
        assert_eq!(config.assistant.generation.max_new_tokens, 64);
        assert!((config.assistant.generation.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.host, "0.0.0.0");
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("HF_TOKEN", "hf_abc"),
            ("PORT", "4100"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]));
        assert_eq!(config.assistant.hf_token.as_deref(), Some("hf_abc"));
        assert_eq!(config.gateway.port, 4100);
        assert_eq!(config.storage.database_url, "sqlite::memory:");
    }

    #[test]
    fn prefixed_env_wins() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("HF_TOKEN", "hf_generic"),
            ("ECOWATT_HF_TOKEN", "hf_specific"),
        ]));
        assert_eq!(config.assistant.hf_token.as_deref(), Some("hf_specific"));
    }

    #[test]
    fn invalid_port_env_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("PORT", "not-a-port")]));
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn blank_token_is_no_credential() {
        let mut config = AppConfig::default();
        config.assistant.hf_token = Some("   ".into());
        assert!(config.assistant.credential().is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let mut config = AppConfig::default();
        config.assistant.hf_token = Some("hf_supersecret".into());
        let shown = format!("{config:?}");
        assert!(!shown.contains("supersecret"));
        assert!(shown.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("DialoGPT-medium"));
        assert!(toml_str.contains("3000"));
        assert!(!toml_str.contains("hf_token"));
    }
}
