//! homecam-nw library — Push-Notification Worker
//!
//! A separate execution context that shares no in-memory state with
//! the dashboard controller. Receives push payloads over HTTP, retains
//! them as pending notifications, and routes user click actions back
//! to the dashboard.

pub mod api;
pub mod deck;
pub mod error;
pub mod link;

pub use api::{build_router, AppState};
pub use error::{Error, Result};
