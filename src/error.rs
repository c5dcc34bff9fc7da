//! Error types for the DreamStreamer client.

use thiserror::Error;

/// Errors surfaced by catalog, storage and identity operations.
///
/// Every variant renders to a message suitable for showing to the user; the
/// command layer never lets one of these escape unhandled.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A required field was missing. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// Requesting an upload destination or transferring the bytes failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Removing a stored object failed.
    #[error("Delete failed: {0}")]
    Delete(String),

    /// The backend rejected a record operation.
    #[error("{message}")]
    RecordOperation {
        entity: &'static str,
        operation: &'static str,
        message: String,
    },

    /// Sign-in, sign-up or token retrieval failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The current identity lacks a required capability.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Builds a record error, preferring the backend supplied reason and
    /// falling back to a generic message for the entity and operation.
    pub fn record(entity: &'static str, operation: &'static str, reason: Option<String>) -> Self {
        let message = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| format!("Failed to {} {}", operation, entity));
        CatalogError::RecordOperation {
            entity,
            operation,
            message,
        }
    }

    /// Message shown to the user at the command boundary.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Http(e) if e.is_connect() || e.is_timeout() => {
                "The catalog service is unreachable. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for DreamStreamer operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
