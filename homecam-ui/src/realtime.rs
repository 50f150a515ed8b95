//! Realtime event router
//!
//! Maintains the one persistent connection to the hub's SSE event
//! stream. Connect and disconnect transitions are surfaced as
//! notifications; pushed `Notification` events are forwarded verbatim
//! to the notification log. Reconnection belongs to this transport
//! loop, not to the router logic: a dropped stream is retried with
//! capped exponential backoff. The router mutates nothing but the
//! notification log.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, warn};

use homecam_common::events::{ChannelStatus, HubEvent};

use crate::controller::Dashboard;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Incremental parser for SSE framing
///
/// Feeds on raw byte chunks and yields the `data:` payload of each
/// completed frame. Event names, ids, retry hints, and comment lines
/// are ignored; the payload itself carries the `type` tag.
///
/// The buffer holds raw bytes and decoding happens per complete line:
/// the transport may split a multi-byte UTF-8 sequence across chunks,
/// and decoding each chunk independently would corrupt it.
#[derive(Debug, Default)]
pub struct SseFrameParser {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseFrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk, returning the payloads of frames it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                // Blank line terminates a frame
                if !self.data_lines.is_empty() {
                    payloads.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines.push(data.trim_start().to_string());
            }
            // "event:", "id:", "retry:", and ":" comments carry nothing
            // the router needs
        }

        payloads
    }
}

/// Run the realtime transport loop until the controller shuts down
///
/// A disconnect notification is posted only after an established
/// connection drops; failed connection attempts retry silently.
pub async fn run_realtime_router(dashboard: Arc<Dashboard>, base_url: String) {
    let client = match reqwest::Client::builder()
        // No overall timeout: the event stream is long-lived
        .connect_timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Realtime client init failed, no hub events: {}", e);
            return;
        }
    };

    let events_url = format!("{}/events", base_url);
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match client.get(&events_url).send().await {
            Ok(response) if response.status().is_success() => {
                dashboard.channel_status(ChannelStatus::Connected).await;
                backoff = INITIAL_BACKOFF;

                let mut parser = SseFrameParser::new();
                let mut stream = response.bytes_stream();
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(bytes) => {
                            for payload in parser.push(&bytes) {
                                dispatch(&dashboard, &payload).await;
                            }
                        }
                        Err(e) => {
                            debug!("Event stream read error: {}", e);
                            break;
                        }
                    }
                }

                dashboard.channel_status(ChannelStatus::Disconnected).await;
            }
            Ok(response) => {
                debug!("Event stream rejected: HTTP {}", response.status());
            }
            Err(e) => {
                debug!("Event stream connect failed: {}", e);
            }
        }

        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

/// Route one frame payload to the controller
async fn dispatch(dashboard: &Dashboard, payload: &str) {
    match serde_json::from_str::<HubEvent>(payload) {
        Ok(HubEvent::Notification { message }) => {
            dashboard.hub_notification(message).await;
        }
        Err(e) => {
            // Heartbeats and unknown event shapes are expected noise
            debug!("Ignoring unparseable event payload: {}", e);
        }
    }
}
