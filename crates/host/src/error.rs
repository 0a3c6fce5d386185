//! Error types for host lifecycle operations

use gnomebot_core::{ConfigError, EventError};

/// Error type for host operations
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Loading or saving configuration failed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An event was rejected by the core
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    /// The host has already been shut down
    #[error("Host already shut down")]
    ShutDown,
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;
