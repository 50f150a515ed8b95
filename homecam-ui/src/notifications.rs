//! Notification log
//!
//! Append-only, UI-visible record of timestamped status lines. Every
//! component that needs to surface status posts here: request
//! dispatcher failures, realtime channel transitions, microphone
//! errors. Entries are immutable, never removed, and live until the
//! session is torn down. Unbounded growth is acceptable; this is a UI
//! surface, not a systems log.

use chrono::{DateTime, Utc};
use homecam_common::time;
use serde::Serialize;

/// One timestamped status line
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEntry {
    /// Wall-clock time at post
    pub timestamp: DateTime<Utc>,
    /// Raw message text, without the clock prefix
    pub text: String,
}

impl NotificationEntry {
    /// Rendered line as shown in the dashboard: `[HH:MM:SS] text`
    pub fn rendered(&self) -> String {
        format!("{} {}", time::clock_prefix(self.timestamp), self.text)
    }
}

/// Append-only notification log
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<NotificationEntry>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a status line stamped with the current time
    ///
    /// Always succeeds; the caller gets the created entry back for
    /// event emission. Entries appear in the order `post` was invoked,
    /// interleaved across sources.
    pub fn post(&mut self, text: impl Into<String>) -> NotificationEntry {
        let entry = NotificationEntry {
            timestamp: time::now(),
            text: text.into(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[NotificationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
