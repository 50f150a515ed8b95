//! HTTP surface for the push-notification worker

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use homecam_common::api::{ActionRequest, PushPayload};

use crate::deck::{NotificationDeck, PendingNotification};
use crate::link::{route_view, DashboardLink};

#[derive(Clone)]
pub struct AppState {
    pub deck: Arc<Mutex<NotificationDeck>>,
    pub link: Arc<dyn DashboardLink>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/push", post(receive_push))
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id/action", post(handle_action))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "module": "homecam-nw",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Retain and display an incoming push payload
async fn receive_push(
    State(state): State<AppState>,
    Json(payload): Json<PushPayload>,
) -> impl IntoResponse {
    let notification = PendingNotification::from_payload(payload);
    info!(
        "Push notification {}: {} — {}",
        notification.id, notification.title, notification.body
    );

    let id = notification.id;
    state.deck.lock().await.push(notification);
    Json(json!({ "status": "ok", "id": id }))
}

async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.deck.lock().await.list())
}

/// Route a user action on a displayed notification
///
/// `dismiss` drops it; every other action, the empty default included,
/// is the view action and routes back to the dashboard.
async fn handle_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActionRequest>,
) -> impl IntoResponse {
    let notification = state.deck.lock().await.take(id);
    let Some(notification) = notification else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "not_found" })),
        );
    };

    if request.action == "dismiss" {
        info!("Notification {} dismissed", notification.id);
        return (StatusCode::OK, Json(json!({ "status": "dismissed" })));
    }

    match route_view(state.link.as_ref()).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({ "status": "viewed", "outcome": outcome })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": e.to_string() })),
        ),
    }
}
