//! # HomeCam Common Library
//!
//! Shared code for the HomeCam services including:
//! - Realtime event types pushed by the hub
//! - API request/response wire types
//! - Configuration resolution
//! - Timestamp formatting helpers

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
