//! Error types for the agent-echo service.

/// Top-level error type for the persona feed system.
#[derive(Debug, thiserror::Error)]
pub enum EchoError {
    /// Content-generation request error (provider/network/malformed output).
    #[error("generation error: {0}")]
    Generation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Input validation error (e.g. prompt length bounds).
    #[error("validation error: {0}")]
    Validation(String),

    /// Phone-number authentication error.
    #[error("auth error: {0}")]
    Auth(String),

    /// Wallet keypair generation or persistence error.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Flat-file user storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// HTTP server error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, EchoError>;
