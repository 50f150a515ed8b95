//! Recording session state machine
//!
//! Owns the microphone-capture lifecycle: idle → recording → stopped,
//! with a hard 30-second cap, per-second elapsed-time ticks, and chunk
//! accumulation into one finalized sample per session.
//!
//! The machine itself is synchronous and lock-protected; the
//! controller drives it from three asynchronous sources (the tick
//! task, the chunk pump, and user toggle requests) and performs the
//! side effects (spawning tasks, encoding, notifications). Exactly one
//! session can be recording at any instant; the session id guards
//! late events from a finished session.

mod mic;
mod wav;

pub use mic::CpalMicSource;
pub use wav::encode_wav;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::Result;

/// Hard cap on recording duration, enforced by the tick transition
pub const MAX_RECORDING_SECONDS: u32 = 30;

/// Mono f32 audio fragment, delivered in capture order
pub type AudioChunk = Vec<f32>;

/// Microphone access seam
///
/// Production uses [`CpalMicSource`]; tests substitute a fake that
/// never touches hardware. Opening may fail (no device, permission);
/// that failure is reported as a notification and the machine stays
/// idle.
pub trait MicSource: Send + Sync {
    /// Acquire the device and start delivering chunks on `chunks`
    fn open(&self, chunks: mpsc::Sender<AudioChunk>) -> Result<Box<dyn CaptureHandle>>;
}

/// Handle to an open capture device
///
/// Releasing stops chunk delivery and frees the device. The session
/// machine guarantees release happens exactly once per session on
/// every exit path, including timeout.
pub trait CaptureHandle: Send {
    /// Sample rate of the delivered chunks, in Hz
    fn sample_rate(&self) -> u32;

    /// Stop capture and release the device
    fn release(self: Box<Self>);
}

/// Externally visible phase of the machine
///
/// `Stopped` is transient: finalization happens inside the stop
/// transition and the machine returns to `Idle` before the lock is
/// released, so it never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingPhase {
    Idle,
    Recording,
}

/// Result of applying one tick to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Tick belonged to a session that is no longer active
    Ignored,
    /// Elapsed time advanced by one second
    Advanced {
        elapsed_seconds: u32,
        /// True the tick elapsed time reaches the cap; the caller must
        /// stop the session before releasing the lock
        reached_cap: bool,
    },
}

/// Everything the stop transition hands back for finalization
#[derive(Debug)]
pub struct FinishedRecording {
    pub session_id: Uuid,
    /// Accumulated chunks concatenated in capture order
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Seconds elapsed when the session stopped, in [0, 30]
    pub duration_seconds: u32,
}

/// The recording session state machine
///
/// Singleton within the controller: starting while recording is routed
/// to stop by the toggle affordance, never to a second capture.
pub struct RecordingSession {
    phase: RecordingPhase,
    session_id: Option<Uuid>,
    elapsed_seconds: u32,
    chunks: Vec<AudioChunk>,
    capture: Option<Box<dyn CaptureHandle>>,
    ticker: Option<JoinHandle<()>>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            phase: RecordingPhase::Idle,
            session_id: None,
            elapsed_seconds: 0,
            chunks: Vec::new(),
            capture: None,
            ticker: None,
        }
    }

    pub fn phase(&self) -> RecordingPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == RecordingPhase::Recording
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Id of the active session, if any
    pub fn current_session(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Idle → Recording with an acquired device
    ///
    /// Clears the chunk buffer and resets elapsed time. Returns the
    /// new session id. Must not be called while recording; the toggle
    /// affordance routes that trigger to stop instead.
    pub fn begin(&mut self, capture: Box<dyn CaptureHandle>) -> Uuid {
        debug_assert_eq!(self.phase, RecordingPhase::Idle);
        let session_id = Uuid::new_v4();
        self.phase = RecordingPhase::Recording;
        self.session_id = Some(session_id);
        self.elapsed_seconds = 0;
        self.chunks.clear();
        self.capture = Some(capture);
        session_id
    }

    /// Attach the per-second tick task spawned for the session just
    /// begun, so stop can cancel it
    pub fn attach_ticker(&mut self, ticker: JoinHandle<()>) {
        self.ticker = Some(ticker);
    }

    /// Append a fragment to the active session's buffer
    ///
    /// Chunks for a session that already stopped are dropped. Returns
    /// whether the chunk was kept.
    pub fn push_chunk(&mut self, session_id: Uuid, chunk: AudioChunk) -> bool {
        if self.phase != RecordingPhase::Recording || self.session_id != Some(session_id) {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Advance elapsed time by one second
    pub fn tick(&mut self, session_id: Uuid) -> Tick {
        if self.phase != RecordingPhase::Recording || self.session_id != Some(session_id) {
            return Tick::Ignored;
        }
        self.elapsed_seconds += 1;
        Tick::Advanced {
            elapsed_seconds: self.elapsed_seconds,
            reached_cap: self.elapsed_seconds >= MAX_RECORDING_SECONDS,
        }
    }

    /// Recording → Stopped → Idle
    ///
    /// Idempotent: a second stop (timeout racing a user click) finds
    /// the machine idle and returns `None`. The device handle is taken
    /// out of the machine before release, so it is released exactly
    /// once; the pending tick task is cancelled.
    pub fn finish(&mut self) -> Option<FinishedRecording> {
        if self.phase != RecordingPhase::Recording {
            return None;
        }
        let session_id = self.session_id.take()?;

        let capture = self.capture.take();
        let sample_rate = capture.as_ref().map(|c| c.sample_rate()).unwrap_or(0);
        if let Some(capture) = capture {
            capture.release();
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        let samples: Vec<f32> = self.chunks.drain(..).flatten().collect();
        let duration_seconds = self.elapsed_seconds;

        self.phase = RecordingPhase::Idle;
        self.elapsed_seconds = 0;

        Some(FinishedRecording {
            session_id,
            samples,
            sample_rate,
            duration_seconds,
        })
    }
}
