//! HTTP surface tests
//!
//! Exercise the router with in-process requests; no listener is bound.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use homecam_common::api::Direction;
use homecam_ui::controller::Dashboard;
use homecam_ui::error::Result;
use homecam_ui::hub::{CapturedPhoto, HubApi, TrainingPart};
use homecam_ui::recording::{AudioChunk, CaptureHandle, MicSource};
use homecam_ui::{build_router, AppState};

/// Hub that succeeds at everything with canned replies
struct CannedHub;

#[async_trait]
impl HubApi for CannedHub {
    async fn control_camera(&self, _direction: Direction) -> Result<()> {
        Ok(())
    }

    async fn capture_photo(&self) -> Result<CapturedPhoto> {
        Ok(CapturedPhoto {
            path: "/static/captures/cap_7.jpg".to_string(),
            filename: "cap_7.jpg".to_string(),
        })
    }

    async fn chat(&self, message: &str) -> Result<String> {
        Ok(format!("Reply to: {}", message))
    }

    async fn train_voice(&self, _parts: Vec<TrainingPart>) -> Result<()> {
        Ok(())
    }
}

struct FakeMic {
    releases: Arc<AtomicUsize>,
}

impl MicSource for FakeMic {
    fn open(&self, _chunks: mpsc::Sender<AudioChunk>) -> Result<Box<dyn CaptureHandle>> {
        Ok(Box::new(FakeCapture {
            releases: Arc::clone(&self.releases),
        }))
    }
}

struct FakeCapture {
    releases: Arc<AtomicUsize>,
}

impl CaptureHandle for FakeCapture {
    fn sample_rate(&self) -> u32 {
        16_000
    }

    fn release(self: Box<Self>) {
        self.releases
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

fn test_app() -> (axum::Router, Arc<Dashboard>) {
    let dashboard = Dashboard::new(
        Arc::new(CannedHub),
        Arc::new(FakeMic {
            releases: Arc::new(AtomicUsize::new(0)),
        }),
    );
    let app = build_router(AppState {
        dashboard: Arc::clone(&dashboard),
    });
    (app, dashboard)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_module_identity() {
    let (app, _) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "homecam-ui");
}

#[tokio::test]
async fn state_starts_idle_with_startup_notification() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/state")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["recording"], "idle");
    assert_eq!(json["trainable"], false);
    assert_eq!(json["notifications"].as_array().unwrap().len(), 1);
    assert!(json["gallery"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn capture_lands_in_state_gallery() {
    let (app, dashboard) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/capture")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = dashboard.snapshot().await;
    assert_eq!(snapshot.gallery.len(), 1);
    assert_eq!(snapshot.gallery[0].filename, "cap_7.jpg");
}

#[tokio::test]
async fn control_accepts_direction_body() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/control")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"direction":"left"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "accepted");
}

#[tokio::test]
async fn chat_updates_transcript() {
    let (app, dashboard) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message":"who is at the door?"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = dashboard.snapshot().await;
    assert_eq!(snapshot.transcript.len(), 2);
    assert_eq!(snapshot.transcript[1].text, "Reply to: who is at the door?");
}

#[tokio::test]
async fn record_toggle_reports_phase() {
    let (app, dashboard) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/record/toggle")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["phase"], "recording");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/record/toggle")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["phase"], "idle");

    assert_eq!(dashboard.snapshot().await.samples.len(), 1);
}

#[tokio::test]
async fn unknown_sample_delete_returns_404() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/samples/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sample_audio_serves_wav_until_revoked() {
    let (app, dashboard) = test_app();

    // One full record cycle through the controller
    dashboard.toggle_recording().await;
    dashboard.toggle_recording().await;
    let id = dashboard.snapshot().await.samples[0].id;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/samples/{}/audio", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "audio/wav"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..4], b"RIFF");

    // Deleting the sample revokes its handle
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/samples/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/samples/{}/audio", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
