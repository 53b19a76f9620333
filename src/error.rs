use thiserror::Error;

/// Main error type for logpull
#[derive(Debug, Error)]
pub enum LogpullError {
    // Device bridge errors
    #[error("Failed to run device bridge '{program}': {reason}")]
    BridgeSpawn { program: String, reason: String },

    #[error("Device bridge executable not found: {0}")]
    BridgeNotFound(String),

    #[error("Device bridge call timed out: {0}")]
    BridgeTimeout(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration field: {0}")]
    MissingConfigField(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // Output errors
    #[error("Failed to write capture: {0}")]
    OutputError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for logpull operations
pub type Result<T> = std::result::Result<T, LogpullError>;
