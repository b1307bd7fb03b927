//! errlens Session - single-surface analysis sessions
//!
//! This crate exposes the diagnosis pipeline to one interactive surface:
//! - Protocol: inbound/outbound JSON messages
//! - Surface: outbound sink abstraction and a channel-backed surface
//! - Selection: host editor selection lookup
//! - Controller: Idle/Active state machine and request dispatch
//! - WebSocket: axum handler that binds a socket as the surface
//!
//! ## Usage
//!
//! ```ignore
//! use errlens_session::{analyzer_ws_handler, SessionController};
//! use axum::{routing::get, Router};
//! use std::sync::Arc;
//!
//! let controller = Arc::new(SessionController::new(pipeline, mode));
//! let app: Router<()> = Router::new()
//!     .route("/ws", get(analyzer_ws_handler))
//!     .with_state(controller);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod protocol;
pub mod selection;
pub mod surface;
pub mod websocket;

pub use controller::{ModeSource, Opened, SessionController};
pub use error::{Error, Result};
pub use protocol::{AnalysisOutcome, ClientMessage, OutcomeMessage, SelectionMessage, ServerMessage};
pub use selection::{NoSelection, SelectionSource, SharedSelection};
pub use surface::{ChannelSurface, Surface, SurfaceId};
pub use websocket::analyzer_ws_handler;
