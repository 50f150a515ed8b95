//! Common error types for HomeCam

use thiserror::Error;

/// Common result type for HomeCam operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across HomeCam services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
