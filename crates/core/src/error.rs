//! Error types for the EcoWatt domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all EcoWatt operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    // --- Assistant errors ---
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the external text-generation service.
///
/// These never reach an assistant caller: the generative adapter folds every
/// variant into a transport-failure outcome.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Referenced record not found: {0}")]
    MissingReference(String),
}

/// Caller-visible failures of the assistant.
///
/// Both are preconditions checked before any decision logic runs. A failing
/// generative call or a failing store read is never one of these.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 503,
            message: "Model is loading".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Model is loading"));
    }

    #[test]
    fn store_error_wraps_into_top_level() {
        let err: Error = StoreError::QueryFailed("users table".into()).into();
        assert!(matches!(err, Error::Store(_)));
        assert!(err.to_string().contains("users table"));
    }

    #[test]
    fn top_level_error_from_assistant() {
        let err: Error = AssistantError::UserNotFound("u-1".into()).into();
        assert!(err.to_string().contains("u-1"));
    }
}
