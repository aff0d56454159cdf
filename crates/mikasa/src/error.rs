//! Error types for Mikasa.

use thiserror::Error;

/// Mikasa error type.
#[derive(Error, Debug)]
pub enum MikasaError {
    /// HTTP transport error talking to the platform
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform rejected or failed a call
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Durable store error
    #[error("Database error: {0}")]
    Database(#[from] bot_database::DatabaseError),

    /// Configuration or credentials error
    #[error("Configuration error: {0}")]
    Config(#[from] bot_config_and_utils::CoreError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MikasaError {
    /// Whether the error came from talking to the platform rather than from
    /// local state. Transport errors end the current dispatcher round.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MikasaError::Http(_) | MikasaError::Provider(_) | MikasaError::Auth(_)
        )
    }
}

/// Result type for Mikasa operations.
pub type MikasaResult<T> = Result<T, MikasaError>;
