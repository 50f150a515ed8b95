//! UI event types and broadcaster
//!
//! Every UI-visible state transition in the controller is mirrored as
//! a `UiEvent` on a broadcast channel. Connected dashboards receive
//! the stream over SSE and derive their affordances purely from it —
//! the record button label, the recording timer, the training-gate
//! state are never stored independently on the client side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::gallery::GalleryItem;

/// UI-visible state transition events
///
/// Events are broadcast via `UiEventBus` and serialized for SSE
/// transmission with a `type` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    /// A line was appended to the notification log
    NotificationPosted {
        /// When the notification was posted
        timestamp: DateTime<Utc>,
        /// Rendered line, including the `[HH:MM:SS]` prefix
        text: String,
    },

    /// Gallery contents changed (insert or eviction)
    GalleryUpdated {
        /// Full gallery, newest first, at most 9 items
        items: Vec<GalleryItem>,
    },

    /// A chat message was appended to the transcript
    ChatMessage {
        /// "user" or "assistant"
        role: String,
        /// Message text
        text: String,
    },

    /// A recording session started
    RecordingStarted {
        /// Session identifier, unique per recording attempt
        session_id: Uuid,
    },

    /// One second of recording elapsed
    RecordingTick {
        /// Seconds since the session started, strictly increasing
        elapsed_seconds: u32,
    },

    /// The active session finalized into a sample
    RecordingFinished {
        /// Handle of the appended sample
        sample_id: Uuid,
        /// Recorded duration in seconds, in [0, 30]
        duration_seconds: u32,
    },

    /// Sample collection changed (append, removal, or clear)
    SamplesChanged {
        /// Current sample count
        count: usize,
        /// Derived training gate: count > 0
        trainable: bool,
    },

    /// A training submission was accepted by the hub
    ///
    /// Triggers:
    /// - Dashboard: close the voice-training modal
    TrainingCompleted {},
}

impl UiEvent {
    /// Get event type as string for SSE event naming and filtering
    pub fn event_type(&self) -> &str {
        match self {
            UiEvent::NotificationPosted { .. } => "NotificationPosted",
            UiEvent::GalleryUpdated { .. } => "GalleryUpdated",
            UiEvent::ChatMessage { .. } => "ChatMessage",
            UiEvent::RecordingStarted { .. } => "RecordingStarted",
            UiEvent::RecordingTick { .. } => "RecordingTick",
            UiEvent::RecordingFinished { .. } => "RecordingFinished",
            UiEvent::SamplesChanged { .. } => "SamplesChanged",
            UiEvent::TrainingCompleted {} => "TrainingCompleted",
        }
    }
}

/// Broadcast bus for UI events
///
/// Wraps tokio::broadcast: non-blocking publish, multiple concurrent
/// subscribers, automatic cleanup when subscribers drop. Slow SSE
/// clients lag rather than blocking the controller.
#[derive(Clone)]
pub struct UiEventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl UiEventBus {
    /// Create a new bus buffering up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no dashboard is connected
    pub fn emit_lossy(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let event = UiEvent::RecordingTick { elapsed_seconds: 7 };
        assert_eq!(event.event_type(), "RecordingTick");

        let event = UiEvent::TrainingCompleted {};
        assert_eq!(event.event_type(), "TrainingCompleted");
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = UiEvent::SamplesChanged {
            count: 2,
            trainable: true,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"type\":\"SamplesChanged\""));
        assert!(json.contains("\"trainable\":true"));
    }

    #[test]
    fn test_bus_delivers_to_all_subscribers() {
        let bus = UiEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit_lossy(UiEvent::RecordingTick { elapsed_seconds: 1 });

        assert_eq!(rx1.try_recv().unwrap().event_type(), "RecordingTick");
        assert_eq!(rx2.try_recv().unwrap().event_type(), "RecordingTick");
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let bus = UiEventBus::new(4);
        bus.emit_lossy(UiEvent::TrainingCompleted {});
        assert_eq!(bus.subscriber_count(), 0);
    }
}
