//! Error types for homecam-ui
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;

/// Main error type for the dashboard controller
#[derive(Error, Debug)]
pub enum Error {
    /// Hub request failed (transport error or explicit failure status)
    #[error("{0}")]
    Hub(String),

    /// Microphone access or capture errors
    #[error("Microphone error: {0}")]
    Microphone(String),

    /// Audio encoding errors
    #[error("Audio encode error: {0}")]
    Encode(String),
}

/// Convenience Result type using homecam-ui Error
pub type Result<T> = std::result::Result<T, Error>;
