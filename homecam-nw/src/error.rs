//! Error types for homecam-nw

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Opening the dashboard in a browser failed
    #[error("Failed to open dashboard: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
