//! HTTP routes

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use errlens_session::{analyzer_ws_handler, SessionController, SharedSelection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Selection pushed by the editor
#[derive(Debug, Deserialize)]
pub struct SelectionUpdate {
    /// Selected text; `null` or empty clears the selection
    #[serde(default)]
    pub text: Option<String>,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn update_selection(
    State(selection): State<SharedSelection>,
    Json(update): Json<SelectionUpdate>,
) -> StatusCode {
    match update.text.filter(|t| !t.is_empty()) {
        Some(text) => {
            debug!(chars = text.len(), "Editor selection updated");
            selection.set(text);
        }
        None => selection.clear(),
    }
    StatusCode::NO_CONTENT
}

/// Build the application router
pub fn router(controller: Arc<SessionController>, selection: SharedSelection) -> Router {
    let ws = Router::new()
        .route("/ws", get(analyzer_ws_handler))
        .with_state(controller);

    let api = Router::new()
        .route("/api/v1/selection", post(update_selection))
        .with_state(selection);

    Router::new()
        .route("/health", get(health_check))
        .merge(ws)
        .merge(api)
        .layer(TraceLayer::new_for_http())
}
