//! WebSocket Handler
//!
//! Binds one websocket connection as the analyzer surface. While a surface
//! is open, a second connection only reveals the existing one and is then
//! closed.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::controller::{Opened, SessionController};
use crate::error::{Error, Result};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::surface::{ChannelSurface, Surface};

/// Failure sent to a connection that arrives while a surface is open
pub const ALREADY_OPEN_MESSAGE: &str = "The error analyzer is already open in another window";

/// WebSocket upgrade handler
pub async fn analyzer_ws_handler(
    ws: WebSocketUpgrade,
    State(controller): State<Arc<SessionController>>,
) -> impl IntoResponse {
    debug!("WebSocket upgrade requested");
    ws.on_upgrade(move |socket| handle_socket(socket, controller))
}

/// Parse one inbound text frame
///
/// # Errors
/// Returns [`Error::InvalidMessage`] for frames that are not a known command
pub fn parse_client_message(text: &str) -> Result<ClientMessage> {
    serde_json::from_str(text).map_err(|e| Error::invalid_message(e.to_string()))
}

async fn handle_socket(socket: WebSocket, controller: Arc<SessionController>) {
    let (mut sender, mut receiver) = socket.split();

    let mut bound = None;
    let opened = controller.open(|id| {
        let (surface, rx) = ChannelSurface::new(id);
        let surface = Arc::new(surface);
        bound = Some((surface.clone(), rx));
        surface as Arc<dyn Surface>
    });

    let (surface_id, surface, mut outbound) = match (opened, bound) {
        (Opened::Created(id), Some((surface, rx))) => (id, surface, rx),
        (opened, _) => {
            info!(surface_id = %opened.surface_id(), "Analyzer already open, closing new connection");
            let _ = send_message(
                &mut sender,
                &ServerMessage::failure(ALREADY_OPEN_MESSAGE, None),
            )
            .await;
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };
    info!(surface_id = %surface_id, "WebSocket connected");

    let forward_handle = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if let Err(e) = send_message(&mut sender, &message).await {
                debug!(error = %e, "Outbound send failed");
                break;
            }
        }
    });

    // Main message loop
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                debug!(text = %text, "Received message");
                match parse_client_message(&text) {
                    Ok(message) => {
                        controller.handle_message(surface_id, message);
                    }
                    Err(e) => {
                        warn!(error = %e, "Error handling message");
                        let _ = surface.post(ServerMessage::failure(
                            format!("Invalid message: {e}"),
                            None,
                        ));
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!(surface_id = %surface_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                warn!(error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    controller.dispose(surface_id);
    forward_handle.abort();
    info!(surface_id = %surface_id, "WebSocket disconnected");
}

/// Send a server message
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<()> {
    let json = serde_json::to_string(message)?;
    sender
        .send(Message::Text(json))
        .await
        .map_err(|_| Error::SurfaceClosed)
}
