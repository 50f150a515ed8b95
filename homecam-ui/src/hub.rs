//! Hub request dispatcher
//!
//! Fire-and-forget wrappers around the hub's four one-shot endpoints.
//! Transport errors and explicit failure statuses in a 2xx body are
//! collapsed into one `Error::Hub` carrying the detail; the controller
//! turns that into a single failure notification. No retries happen at
//! this layer.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use homecam_common::api::{
    CaptureReply, ChatReply, ChatRequest, ControlRequest, Direction, StatusReply,
};

use crate::error::{Error, Result};

/// Successful capture result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub path: String,
    pub filename: String,
}

/// One named WAV sample for the training upload
#[derive(Debug, Clone)]
pub struct TrainingPart {
    pub filename: String,
    pub data: Vec<u8>,
}

/// The hub's one-shot operations
///
/// Trait seam so tests can substitute a scripted hub and assert on the
/// calls that were (or were not) issued.
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Move the camera; the hub reports failure via its status field
    async fn control_camera(&self, direction: Direction) -> Result<()>;

    /// Take a photo; returns the stored image reference
    async fn capture_photo(&self) -> Result<CapturedPhoto>;

    /// One chat exchange; returns the assistant reply text
    async fn chat(&self, message: &str) -> Result<String>;

    /// Upload every recorded sample as one multipart request
    async fn train_voice(&self, parts: Vec<TrainingPart>) -> Result<()>;
}

/// reqwest-backed hub client
pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
}

impl HubClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Hub(format!("client init failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HubApi for HubClient {
    async fn control_camera(&self, direction: Direction) -> Result<()> {
        debug!("Control camera: {}", direction);
        let reply: StatusReply = self
            .http
            .post(self.url("/control_camera"))
            .json(&ControlRequest { direction })
            .send()
            .await
            .map_err(|e| Error::Hub(format!("request error: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::Hub(format!("invalid response: {}", e)))?;

        if reply.is_success() {
            Ok(())
        } else {
            Err(Error::Hub(reply.error_detail()))
        }
    }

    async fn capture_photo(&self) -> Result<CapturedPhoto> {
        debug!("Capture photo");
        let reply: CaptureReply = self
            .http
            .post(self.url("/capture"))
            .send()
            .await
            .map_err(|e| Error::Hub(format!("request error: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::Hub(format!("invalid response: {}", e)))?;

        if reply.status != "success" {
            return Err(Error::Hub(
                reply
                    .message
                    .unwrap_or_else(|| format!("status {}", reply.status)),
            ));
        }

        match (reply.path, reply.filename) {
            (Some(path), Some(filename)) => Ok(CapturedPhoto { path, filename }),
            _ => Err(Error::Hub(
                "success response missing image reference".to_string(),
            )),
        }
    }

    async fn chat(&self, message: &str) -> Result<String> {
        let reply: ChatReply = self
            .http
            .post(self.url("/chat"))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| Error::Hub(format!("request error: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::Hub(format!("invalid response: {}", e)))?;

        if reply.status != "success" {
            return Err(Error::Hub(
                reply
                    .message
                    .unwrap_or_else(|| format!("status {}", reply.status)),
            ));
        }

        reply
            .response
            .ok_or_else(|| Error::Hub("success response missing reply text".to_string()))
    }

    async fn train_voice(&self, parts: Vec<TrainingPart>) -> Result<()> {
        debug!("Upload {} training samples", parts.len());
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            let file = reqwest::multipart::Part::bytes(part.data)
                .file_name(part.filename)
                .mime_str("audio/wav")
                .map_err(|e| Error::Hub(format!("invalid part: {}", e)))?;
            form = form.part("samples", file);
        }

        let reply: StatusReply = self
            .http
            .post(self.url("/train_voice"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Hub(format!("request error: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::Hub(format!("invalid response: {}", e)))?;

        if reply.is_success() {
            Ok(())
        } else {
            Err(Error::Hub(reply.error_detail()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HubClient::new("http://hub.local:5000").expect("client");
        assert_eq!(client.url("/capture"), "http://hub.local:5000/capture");
    }
}
