//! homecam-ui library — Dashboard Controller
//!
//! Owns the client-side session state of the HomeCam dashboard: the
//! recording session state machine, the sample collection and its
//! training gate, the notification log, the bounded capture gallery,
//! the realtime event router, and the hub request dispatcher. The
//! browser dashboard drives it over a small HTTP surface and observes
//! it over SSE; all state is session-scoped and volatile.

pub mod api;
pub mod blob;
pub mod controller;
pub mod error;
pub mod events;
pub mod gallery;
pub mod hub;
pub mod notifications;
pub mod realtime;
pub mod recording;
pub mod samples;

pub use api::{build_router, AppState};
pub use controller::Dashboard;
pub use error::{Error, Result};
