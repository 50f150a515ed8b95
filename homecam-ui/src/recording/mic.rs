//! cpal-backed microphone source
//!
//! cpal streams are not `Send`, so each capture runs on a dedicated
//! thread that owns the stream for the session's lifetime. The thread
//! reports its negotiated sample rate back through a setup channel,
//! then parks until the release signal arrives; dropping the stream
//! releases the device.

use std::sync::mpsc as std_mpsc;
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{AudioChunk, CaptureHandle, MicSource};
use crate::error::{Error, Result};

/// Production microphone source using the default cpal input device
#[derive(Debug, Default)]
pub struct CpalMicSource;

impl CpalMicSource {
    pub fn new() -> Self {
        Self
    }
}

impl MicSource for CpalMicSource {
    fn open(&self, chunks: mpsc::Sender<AudioChunk>) -> Result<Box<dyn CaptureHandle>> {
        let (setup_tx, setup_rx) = std_mpsc::channel::<Result<u32>>();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || capture_thread(chunks, setup_tx, stop_rx))
            .map_err(|e| Error::Microphone(format!("capture thread spawn failed: {}", e)))?;

        // The thread reports either the negotiated sample rate or the
        // device-access failure before entering its park loop
        match setup_rx.recv() {
            Ok(Ok(sample_rate)) => Ok(Box::new(CpalCaptureHandle {
                sample_rate,
                stop_tx,
                join: Some(join),
            })),
            Ok(Err(e)) => {
                let _ = join.join();
                Err(e)
            }
            Err(_) => {
                let _ = join.join();
                Err(Error::Microphone(
                    "capture thread exited during setup".to_string(),
                ))
            }
        }
    }
}

struct CpalCaptureHandle {
    sample_rate: u32,
    stop_tx: std_mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl CaptureHandle for CpalCaptureHandle {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn release(mut self: Box<Self>) {
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn capture_thread(
    chunks: mpsc::Sender<AudioChunk>,
    setup_tx: std_mpsc::Sender<Result<u32>>,
    stop_rx: std_mpsc::Receiver<()>,
) {
    let host = cpal::default_host();
    let device = match host.default_input_device() {
        Some(device) => device,
        None => {
            let _ = setup_tx.send(Err(Error::Microphone(
                "no input audio device found".to_string(),
            )));
            return;
        }
    };

    let config = match device.default_input_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = setup_tx.send(Err(Error::Microphone(format!(
                "no usable input config: {}",
                e
            ))));
            return;
        }
    };

    let sample_rate = config.sample_rate().0;
    let channels = config.channels();
    let device_name = device.name().unwrap_or_else(|_| "<unknown>".to_string());
    debug!(
        "Capturing from '{}' at {}Hz, {}ch",
        device_name, sample_rate, channels
    );

    let stream_config: cpal::StreamConfig = config.clone().into();
    let err_fn = |e| warn!("Audio capture stream error: {}", e);

    // The callback must never block: drop chunks when the pump lags
    let stream = match config.sample_format() {
        SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mono = downmix_to_mono(data, channels);
                let _ = chunks.try_send(mono);
            },
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let floats: Vec<f32> =
                    data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                let mono = downmix_to_mono(&floats, channels);
                let _ = chunks.try_send(mono);
            },
            err_fn,
            None,
        ),
        other => {
            let _ = setup_tx.send(Err(Error::Microphone(format!(
                "unsupported input sample format: {:?}",
                other
            ))));
            return;
        }
    };

    let stream = match stream {
        Ok(stream) => stream,
        Err(e) => {
            let _ = setup_tx.send(Err(Error::Microphone(format!(
                "failed to build input stream: {}",
                e
            ))));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = setup_tx.send(Err(Error::Microphone(format!(
            "failed to start input stream: {}",
            e
        ))));
        return;
    }

    let _ = setup_tx.send(Ok(sample_rate));

    // Park until release; Err means the handle was dropped
    let _ = stop_rx.recv();
    drop(stream);
    debug!("Capture thread for '{}' stopped", device_name);
}

/// Downmix interleaved multi-channel audio to mono by averaging
/// channels per frame
fn downmix_to_mono(data: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    let ch = channels as usize;
    data.chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_passthrough() {
        let data = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&data, 1), data);
    }

    #[test]
    fn test_downmix_stereo_averages_frames() {
        let data = vec![0.0, 1.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix_to_mono(&data, 2), vec![0.5, 0.5, 0.0]);
    }
}
