//! Event types for the hub realtime channel
//!
//! The hub pushes events to the dashboard controller over one
//! persistent SSE connection. Events are serialized with a `type` tag
//! so the stream stays extensible without breaking older controllers.

use serde::{Deserialize, Serialize};

/// Event pushed by the hub over the realtime channel
///
/// Inbound only: the controller never sends events back on this
/// channel. The router forwards `Notification` text verbatim to the
/// notification log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HubEvent {
    /// Server-pushed status notification
    ///
    /// Triggers:
    /// - Notification Log: append message verbatim
    Notification {
        /// Message text to surface to the user
        message: String,
    },
}

impl HubEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            HubEvent::Notification { .. } => "Notification",
        }
    }
}

/// Transport-level state of the realtime channel
///
/// Connect/disconnect are not wire events; they are observed by the
/// transport loop and surfaced to the UI as notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Connection to the hub event stream established
    Connected,
    /// Connection lost; the transport is reconnecting
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_event_round_trip() {
        let event = HubEvent::Notification {
            message: "Motion detected in living room".to_string(),
        };

        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"type\":\"Notification\""));
        assert!(json.contains("Motion detected"));

        let back: HubEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
        assert_eq!(back.event_type(), "Notification");
    }

    #[test]
    fn test_notification_event_parses_hub_payload() {
        // Shape the hub actually emits on its event stream
        let json = r#"{"type":"Notification","message":"Door opened"}"#;
        let event: HubEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            event,
            HubEvent::Notification {
                message: "Door opened".to_string()
            }
        );
    }
}
