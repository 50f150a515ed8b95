//! Wire types shared across service boundaries
//!
//! Request/response bodies for the hub's one-shot endpoints and the
//! push-notification worker boundary. The hub reports outcomes with a
//! `status` field rather than HTTP status codes, so every reply type
//! carries one.

use serde::{Deserialize, Serialize};

/// Camera movement direction for device control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

/// Device control request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlRequest {
    pub direction: Direction,
}

/// Generic hub reply carrying only an outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusReply {
    /// Whether the hub reported success
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Error detail for failure notifications
    pub fn error_detail(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("status {}", self.status))
    }
}

/// Photo capture reply; `path`/`filename` are present on success only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReply {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Chat exchange request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat exchange reply; `response` is present on success only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Push payload delivered to the notification worker
///
/// The worker shares no in-memory state with the controller; this
/// payload and the dashboard URL are the entire boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: PushNotification,
    /// Opaque routing data forwarded with the notification
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Displayable part of a push payload
///
/// Both fields are optional on the wire; the worker substitutes
/// defaults when they are missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// User interaction with a displayed notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Action identifier; anything other than "dismiss" is treated as
    /// the view action, including the empty string
    #[serde(default)]
    pub action: String,
}
