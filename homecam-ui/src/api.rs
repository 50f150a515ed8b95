//! HTTP surface for the browser dashboard
//!
//! Thin handlers over the controller: every POST delegates to one
//! controller operation and acknowledges immediately; outcomes travel
//! to the dashboard through the notification log and the UI event
//! stream, never through these response bodies.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use futures::stream::{Stream, StreamExt};
use serde_json::json;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use homecam_common::api::{ChatRequest, ControlRequest};

use crate::controller::Dashboard;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/state", get(get_state))
        .route("/api/control", post(post_control))
        .route("/api/capture", post(post_capture))
        .route("/api/chat", post(post_chat))
        .route("/api/record/toggle", post(post_record_toggle))
        .route("/api/train", post(post_train))
        .route("/api/samples/:id", delete(delete_sample))
        .route("/api/samples/:id/audio", get(get_sample_audio))
        .route("/api/events", get(get_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "module": "homecam-ui",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.snapshot().await)
}

async fn post_control(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> impl IntoResponse {
    state.dashboard.control_camera(request.direction).await;
    Json(json!({ "status": "accepted" }))
}

async fn post_capture(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.capture_photo().await;
    Json(json!({ "status": "accepted" }))
}

async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    state.dashboard.send_chat(&request.message).await;
    Json(json!({ "status": "accepted" }))
}

async fn post_record_toggle(State(state): State<AppState>) -> impl IntoResponse {
    let phase = state.dashboard.toggle_recording().await;
    Json(json!({ "phase": phase }))
}

async fn post_train(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.train_voice().await;
    Json(json!({ "status": "accepted" }))
}

async fn delete_sample(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if state.dashboard.remove_sample(id).await {
        (StatusCode::OK, Json(json!({ "status": "removed" })))
    } else {
        // Removing an absent sample is a no-op for controller state
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "not_found" })),
        )
    }
}

async fn get_sample_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.dashboard.sample_audio(id).await {
        Some(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "audio/wav")],
            data.to_vec(),
        )
            .into_response(),
        // Revoked handles resolve to nothing
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// SSE stream of UI events for connected dashboards
async fn get_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.dashboard.events().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(ui_event) => {
                let name = ui_event.event_type().to_string();
                Event::default().event(name).json_data(&ui_event).ok().map(Ok)
            }
            Err(e) => {
                // Lagged SSE client; drop the gap and continue
                warn!("UI event stream client lagged: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
