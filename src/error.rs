use thiserror::Error;

/// Main error type for the fee claimer
#[derive(Error, Debug)]
pub enum ClaimerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Address parsing error: {0}")]
    AddressParsing(String),

    // Chain errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // Relay / automation network errors
    #[error("Relay error: {0}")]
    Relay(String),

    #[error("Automation API error: {0}")]
    Automate(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ClaimerError
pub type Result<T> = std::result::Result<T, ClaimerError>;
