//! Pending notification deck
//!
//! Retains received push payloads until the user acts on them. The
//! deck is bounded: when full, the oldest pending notification is
//! dropped, matching how a platform notification tray coalesces.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use homecam_common::api::PushPayload;

/// Upper bound on retained notifications
pub const MAX_PENDING: usize = 100;

/// Title shown when the payload carries none
pub const DEFAULT_TITLE: &str = "HomeCam";

/// Body shown when the payload carries none
pub const DEFAULT_BODY: &str = "You have a new notification.";

/// One displayed notification awaiting user action
#[derive(Debug, Clone, Serialize)]
pub struct PendingNotification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Opaque routing data from the push payload
    pub data: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl PendingNotification {
    /// Build from a push payload, substituting display defaults
    pub fn from_payload(payload: PushPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: payload
                .notification
                .title
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: payload
                .notification
                .body
                .unwrap_or_else(|| DEFAULT_BODY.to_string()),
            data: payload.data,
            received_at: homecam_common::time::now(),
        }
    }
}

/// Ordered deck of pending notifications, oldest first
#[derive(Debug, Default)]
pub struct NotificationDeck {
    pending: Vec<PendingNotification>,
}

impl NotificationDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain a notification, evicting the oldest when full
    pub fn push(&mut self, notification: PendingNotification) {
        if self.pending.len() >= MAX_PENDING {
            self.pending.remove(0);
        }
        self.pending.push(notification);
    }

    /// Remove by id; `None` when absent
    pub fn take(&mut self, id: Uuid) -> Option<PendingNotification> {
        let index = self.pending.iter().position(|n| n.id == id)?;
        Some(self.pending.remove(index))
    }

    pub fn list(&self) -> Vec<PendingNotification> {
        self.pending.clone()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecam_common::api::PushNotification;

    fn payload(title: Option<&str>, body: Option<&str>) -> PushPayload {
        PushPayload {
            notification: PushNotification {
                title: title.map(String::from),
                body: body.map(String::from),
            },
            data: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_defaults_substituted_for_missing_fields() {
        let n = PendingNotification::from_payload(payload(None, None));
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.body, DEFAULT_BODY);

        let n = PendingNotification::from_payload(payload(Some("Motion"), None));
        assert_eq!(n.title, "Motion");
        assert_eq!(n.body, DEFAULT_BODY);
    }

    #[test]
    fn test_take_removes_by_id() {
        let mut deck = NotificationDeck::new();
        let a = PendingNotification::from_payload(payload(Some("a"), None));
        let b = PendingNotification::from_payload(payload(Some("b"), None));
        let a_id = a.id;
        deck.push(a);
        deck.push(b);

        let taken = deck.take(a_id).expect("present");
        assert_eq!(taken.title, "a");
        assert_eq!(deck.len(), 1);
        assert!(deck.take(a_id).is_none());
    }

    #[test]
    fn test_deck_bounded_drops_oldest() {
        let mut deck = NotificationDeck::new();
        for i in 0..MAX_PENDING + 5 {
            deck.push(PendingNotification::from_payload(payload(
                Some(&format!("n{}", i)),
                None,
            )));
        }
        assert_eq!(deck.len(), MAX_PENDING);
        assert_eq!(deck.list()[0].title, "n5");
    }
}
