//! Dashboard controller
//!
//! The explicit session object owning all UI-visible state: the
//! notification log, gallery buffer, sample collection, blob store,
//! chat transcript, and the recording session state machine. It is
//! constructed once at service startup and handed to handlers by
//! reference; there are no ambient globals.
//!
//! All mutation happens under one async mutex, so the buffers are
//! single-writer-at-a-time exactly like the one-threaded event loop
//! they model. UI events are emitted while the lock is held, keeping
//! event order identical to mutation order.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use homecam_common::api::Direction;
use homecam_common::events::ChannelStatus;

use crate::blob::{BlobHandle, BlobStore};
use crate::events::{UiEvent, UiEventBus};
use crate::gallery::{GalleryBuffer, GalleryItem};
use crate::hub::{HubApi, TrainingPart};
use crate::notifications::{NotificationEntry, NotificationLog};
use crate::recording::{
    encode_wav, MicSource, RecordingPhase, RecordingSession, Tick,
};
use crate::samples::{RecordedSample, SampleCollection, SampleInfo};

/// One transcript line
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// "user" or "assistant"
    pub role: String,
    pub text: String,
}

/// Full controller state snapshot for `GET /api/state`
#[derive(Debug, Serialize)]
pub struct StateSnapshot {
    /// Rendered notification lines, oldest first
    pub notifications: Vec<String>,
    /// Gallery contents, newest first
    pub gallery: Vec<GalleryItem>,
    /// Recorded samples in completion order
    pub samples: Vec<SampleInfo>,
    /// Derived training gate
    pub trainable: bool,
    /// Chat transcript, oldest first
    pub transcript: Vec<ChatMessage>,
    /// Recording machine phase
    pub recording: RecordingPhase,
    /// Elapsed seconds of the active session (0 when idle)
    pub elapsed_seconds: u32,
}

struct DashboardState {
    notifications: NotificationLog,
    gallery: GalleryBuffer,
    samples: SampleCollection,
    blobs: BlobStore,
    transcript: Vec<ChatMessage>,
    recording: RecordingSession,
}

/// The dashboard controller
pub struct Dashboard {
    state: Mutex<DashboardState>,
    events: UiEventBus,
    hub: Arc<dyn HubApi>,
    mic: Arc<dyn MicSource>,
}

impl Dashboard {
    /// Construct the controller and post the startup notification
    pub fn new(hub: Arc<dyn HubApi>, mic: Arc<dyn MicSource>) -> Arc<Self> {
        let mut state = DashboardState {
            notifications: NotificationLog::new(),
            gallery: GalleryBuffer::new(),
            samples: SampleCollection::new(),
            blobs: BlobStore::new(),
            transcript: Vec::new(),
            recording: RecordingSession::new(),
        };
        state.notifications.post("HomeCam system started.");

        Arc::new(Self {
            state: Mutex::new(state),
            events: UiEventBus::new(256),
            hub,
            mic,
        })
    }

    /// The UI event bus, for SSE subscriptions
    pub fn events(&self) -> &UiEventBus {
        &self.events
    }

    fn emit_notification(&self, entry: &NotificationEntry) {
        self.events.emit_lossy(UiEvent::NotificationPosted {
            timestamp: entry.timestamp,
            text: entry.rendered(),
        });
    }

    fn post_locked(&self, state: &mut DashboardState, text: impl Into<String>) {
        let entry = state.notifications.post(text);
        self.emit_notification(&entry);
    }

    /// Append a status line to the notification log
    pub async fn post_notification(&self, text: impl Into<String>) {
        let mut state = self.state.lock().await;
        self.post_locked(&mut state, text);
    }

    /// Surface a realtime channel transition
    pub async fn channel_status(&self, status: ChannelStatus) {
        let text = match status {
            ChannelStatus::Connected => "Connected to server.",
            ChannelStatus::Disconnected => "Server connection lost. Reconnecting...",
        };
        self.post_notification(text).await;
    }

    /// Surface a server-pushed notification verbatim
    pub async fn hub_notification(&self, message: String) {
        self.post_notification(message).await;
    }

    /// Relay a device-control command; notify only on failure
    pub async fn control_camera(&self, direction: Direction) {
        if let Err(e) = self.hub.control_camera(direction).await {
            self.post_notification(format!("Camera control failed: {}", e))
                .await;
        }
    }

    /// Request a photo capture; insert into the gallery on success
    pub async fn capture_photo(&self) {
        match self.hub.capture_photo().await {
            Ok(photo) => {
                let mut state = self.state.lock().await;
                self.post_locked(&mut state, "Photo captured.");
                state.gallery.insert_newest(GalleryItem {
                    image_path: photo.path,
                    filename: photo.filename,
                });
                self.events.emit_lossy(UiEvent::GalleryUpdated {
                    items: state.gallery.items(),
                });
            }
            Err(e) => {
                self.post_notification(format!("Photo capture failed: {}", e))
                    .await;
            }
        }
    }

    /// One chat exchange: the outgoing message lands in the transcript
    /// before the call, the assistant reply on success
    pub async fn send_chat(&self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }

        {
            let mut state = self.state.lock().await;
            let entry = ChatMessage {
                role: "user".to_string(),
                text: message.to_string(),
            };
            state.transcript.push(entry.clone());
            self.events.emit_lossy(UiEvent::ChatMessage {
                role: entry.role,
                text: entry.text,
            });
        }

        match self.hub.chat(message).await {
            Ok(reply) => {
                let mut state = self.state.lock().await;
                let entry = ChatMessage {
                    role: "assistant".to_string(),
                    text: reply,
                };
                state.transcript.push(entry.clone());
                self.events.emit_lossy(UiEvent::ChatMessage {
                    role: entry.role,
                    text: entry.text,
                });
            }
            Err(e) => {
                self.post_notification(format!("Chat error: {}", e)).await;
            }
        }
    }

    /// Toggle the recording session
    ///
    /// The same affordance starts and stops: when a session is active
    /// the trigger routes to stop, so two concurrent captures are
    /// impossible. Returns the phase after the toggle.
    pub async fn toggle_recording(self: &Arc<Self>) -> RecordingPhase {
        let mut state = self.state.lock().await;

        if state.recording.is_recording() {
            self.finish_recording_locked(&mut state);
            return RecordingPhase::Idle;
        }

        let (chunk_tx, chunk_rx) = mpsc::channel(64);
        let capture = match self.mic.open(chunk_tx) {
            Ok(capture) => capture,
            Err(e) => {
                self.post_locked(&mut state, format!("Microphone access error: {}", e));
                return RecordingPhase::Idle;
            }
        };

        let session_id = state.recording.begin(capture);
        info!("Recording session {} started", session_id);
        self.events
            .emit_lossy(UiEvent::RecordingStarted { session_id });

        self.spawn_chunk_pump(session_id, chunk_rx);
        let ticker = self.spawn_ticker(session_id);
        state.recording.attach_ticker(ticker);

        RecordingPhase::Recording
    }

    fn spawn_chunk_pump(
        self: &Arc<Self>,
        session_id: Uuid,
        mut chunk_rx: mpsc::Receiver<Vec<f32>>,
    ) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            // Ends when the capture device drops its sender, or when a
            // chunk arrives for a session that already stopped
            while let Some(chunk) = chunk_rx.recv().await {
                let kept = {
                    let mut state = this.state.lock().await;
                    state.recording.push_chunk(session_id, chunk)
                };
                if !kept {
                    break;
                }
            }
            debug!("Chunk pump for session {} ended", session_id);
        });
    }

    fn spawn_ticker(self: &Arc<Self>, session_id: Uuid) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            // First tick of tokio's interval fires immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if !this.run_tick(session_id).await {
                    break;
                }
            }
        })
    }

    /// Apply one tick; returns whether the ticker should continue
    async fn run_tick(&self, session_id: Uuid) -> bool {
        let mut state = self.state.lock().await;
        match state.recording.tick(session_id) {
            Tick::Ignored => false,
            Tick::Advanced {
                elapsed_seconds,
                reached_cap,
            } => {
                self.events
                    .emit_lossy(UiEvent::RecordingTick { elapsed_seconds });
                if reached_cap {
                    debug!("Session {} reached the recording cap", session_id);
                    self.finish_recording_locked(&mut state);
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Stop transition: release the device, finalize one sample,
    /// append it to the collection
    fn finish_recording_locked(&self, state: &mut DashboardState) {
        let Some(finished) = state.recording.finish() else {
            return;
        };
        info!(
            "Recording session {} stopped after {}s",
            finished.session_id, finished.duration_seconds
        );

        let wav = match encode_wav(&finished.samples, finished.sample_rate) {
            Ok(wav) => wav,
            Err(e) => {
                self.post_locked(state, format!("Recording failed: {}", e));
                return;
            }
        };

        let (handle, data) = state.blobs.create(wav);
        state.samples.append(RecordedSample {
            handle,
            data,
            duration_seconds: finished.duration_seconds,
        });

        self.events.emit_lossy(UiEvent::RecordingFinished {
            sample_id: handle.id(),
            duration_seconds: finished.duration_seconds,
        });
        self.events.emit_lossy(UiEvent::SamplesChanged {
            count: state.samples.len(),
            trainable: state.samples.is_trainable(),
        });
    }

    /// Remove one sample by handle identity and revoke its handle
    ///
    /// No-op when the handle is unknown.
    pub async fn remove_sample(&self, id: Uuid) -> bool {
        let mut state = self.state.lock().await;
        let Some(sample) = state.samples.remove(BlobHandle(id)) else {
            return false;
        };
        state.blobs.revoke(sample.handle);
        self.events.emit_lossy(UiEvent::SamplesChanged {
            count: state.samples.len(),
            trainable: state.samples.is_trainable(),
        });
        true
    }

    /// Submit every recorded sample for voice training
    ///
    /// An empty collection is rejected locally: one notification, no
    /// network call. On success the collection is cleared and every
    /// handle revoked; on failure it is left untouched.
    pub async fn train_voice(self: &Arc<Self>) {
        let parts = {
            let mut state = self.state.lock().await;
            if !state.samples.is_trainable() {
                self.post_locked(&mut state, "No voice samples to train.");
                return;
            }
            state
                .samples
                .iter()
                .enumerate()
                .map(|(i, sample)| TrainingPart {
                    filename: format!("sample_{}.wav", i),
                    data: (*sample.data).clone(),
                })
                .collect::<Vec<_>>()
        };

        match self.hub.train_voice(parts).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                for sample in state.samples.clear() {
                    state.blobs.revoke(sample.handle);
                }
                self.post_locked(&mut state, "Voice training completed.");
                self.events.emit_lossy(UiEvent::TrainingCompleted {});
                self.events.emit_lossy(UiEvent::SamplesChanged {
                    count: 0,
                    trainable: false,
                });
            }
            Err(e) => {
                self.post_notification(format!("Voice training failed: {}", e))
                    .await;
            }
        }
    }

    /// Resolve a sample's audio by its revocable handle
    pub async fn sample_audio(&self, id: Uuid) -> Option<Arc<Vec<u8>>> {
        let state = self.state.lock().await;
        state.blobs.get(BlobHandle(id))
    }

    /// Full state snapshot for a dashboard (re)connecting
    pub async fn snapshot(&self) -> StateSnapshot {
        let state = self.state.lock().await;
        StateSnapshot {
            notifications: state
                .notifications
                .entries()
                .iter()
                .map(|e| e.rendered())
                .collect(),
            gallery: state.gallery.items(),
            samples: state.samples.infos(),
            trainable: state.samples.is_trainable(),
            transcript: state.transcript.clone(),
            recording: state.recording.phase(),
            elapsed_seconds: state.recording.elapsed_seconds(),
        }
    }
}
