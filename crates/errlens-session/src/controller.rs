//! Session Controller
//!
//! Two states: `Idle` (no surface) and `Active` (one bound surface).
//! Opening while active reveals the existing surface instead of creating a
//! second one. Each analyze request runs on its own task; its outcome is
//! delivered only if the surface that asked is still the active one.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::selection::{NoSelection, SelectionSource};
use crate::surface::{Surface, SurfaceId};
use errlens_core::{AnalysisMode, AnalysisRequest, DiagnosisPipeline};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Failure message for empty or whitespace-only error text
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter an error message";

/// Failure message when a second analysis arrives while one is running
pub const BUSY_MESSAGE: &str = "An analysis is already in progress";

/// Supplies the analysis mode at request time
pub trait ModeSource: Send + Sync {
    /// Current mode
    fn mode(&self) -> AnalysisMode;
}

impl ModeSource for AnalysisMode {
    fn mode(&self) -> AnalysisMode {
        self.clone()
    }
}

/// Result of [`SessionController::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    /// A new surface was created and bound
    Created(SurfaceId),
    /// A surface already existed and was brought to the foreground
    Revealed(SurfaceId),
}

impl Opened {
    /// The id of the surface that is now active
    #[must_use]
    pub fn surface_id(&self) -> SurfaceId {
        match self {
            Self::Created(id) | Self::Revealed(id) => *id,
        }
    }
}

#[derive(Clone)]
struct ActiveSurface {
    id: SurfaceId,
    surface: Arc<dyn Surface>,
    in_flight: Arc<AtomicBool>,
}

enum SessionState {
    Idle,
    Active(ActiveSurface),
}

/// Mediates between one surface and the diagnosis pipeline
pub struct SessionController {
    pipeline: DiagnosisPipeline,
    modes: Arc<dyn ModeSource>,
    selection: Arc<dyn SelectionSource>,
    state: Mutex<SessionState>,
}

impl SessionController {
    /// Create an idle controller
    #[must_use]
    pub fn new(pipeline: DiagnosisPipeline, modes: impl ModeSource + 'static) -> Self {
        Self {
            pipeline,
            modes: Arc::new(modes),
            selection: Arc::new(NoSelection),
            state: Mutex::new(SessionState::Idle),
        }
    }

    /// Configure where `getSelectedText` looks
    #[must_use]
    pub fn with_selection(mut self, selection: Arc<dyn SelectionSource>) -> Self {
        self.selection = selection;
        self
    }

    /// Open the surface, creating it only when idle
    ///
    /// Neither `create` nor [`Surface::reveal`] runs under the session lock,
    /// so surfaces may call back into the controller.
    pub fn open<F>(&self, create: F) -> Opened
    where
        F: FnOnce(SurfaceId) -> Arc<dyn Surface>,
    {
        if let Some(active) = self.current() {
            active.surface.reveal();
            return Opened::Revealed(active.id);
        }

        let id = SurfaceId::new();
        let surface = create(id);

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let existing = match &*state {
            SessionState::Active(active) => Some(active.clone()),
            SessionState::Idle => None,
        };
        if existing.is_none() {
            *state = SessionState::Active(ActiveSurface {
                id,
                surface,
                in_flight: Arc::new(AtomicBool::new(false)),
            });
        }
        drop(state);

        match existing {
            Some(active) => {
                debug!(surface_id = %active.id, "Surface opened concurrently, revealing it");
                active.surface.reveal();
                Opened::Revealed(active.id)
            }
            None => {
                info!(surface_id = %id, "Analyzer surface created");
                Opened::Created(id)
            }
        }
    }

    /// Release the surface after the user closed it
    ///
    /// Outstanding requests are abandoned; their results get discarded.
    /// Returns false if `id` is not the active surface.
    pub fn dispose(&self, id: SurfaceId) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !matches!(&*state, SessionState::Active(active) if active.id == id) {
            debug!(surface_id = %id, "Dispose for inactive surface ignored");
            return false;
        }

        *state = SessionState::Idle;
        info!(surface_id = %id, "Analyzer surface disposed");
        true
    }

    /// The active surface, if any
    #[must_use]
    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.current().map(|active| active.id)
    }

    /// Handle one inbound message from surface `id`
    ///
    /// Analysis runs on a spawned task whose handle is returned; every
    /// other message is answered inline.
    pub fn handle_message(
        self: &Arc<Self>,
        id: SurfaceId,
        message: ClientMessage,
    ) -> Option<JoinHandle<()>> {
        let Some(active) = self.lookup(id) else {
            debug!(surface_id = %id, "Message from inactive surface ignored");
            return None;
        };

        match message {
            ClientMessage::Analyze { error, request_id } => {
                self.dispatch_analysis(active, &error, request_id)
            }
            ClientMessage::GetSelectedText => {
                match self.selection.selected_text() {
                    Some(text) if !text.is_empty() => {
                        post(&active, ServerMessage::selected_text(text));
                    }
                    _ => debug!("No editor selection to send"),
                }
                None
            }
        }
    }

    /// Post a message to surface `id` if it is still active
    pub fn deliver(&self, id: SurfaceId, message: ServerMessage) {
        match self.lookup(id) {
            Some(active) => post(&active, message),
            None => debug!(surface_id = %id, "Discarding message for closed surface"),
        }
    }

    fn dispatch_analysis(
        self: &Arc<Self>,
        active: ActiveSurface,
        error_text: &str,
        request_id: Option<String>,
    ) -> Option<JoinHandle<()>> {
        let request = match AnalysisRequest::new(error_text) {
            Ok(request) => request,
            Err(e) => {
                debug!(code = e.code(), "Rejected analysis request");
                post(&active, ServerMessage::failure(EMPTY_INPUT_MESSAGE, request_id));
                return None;
            }
        };

        if active.in_flight.swap(true, Ordering::AcqRel) {
            warn!(surface_id = %active.id, "Analysis already in progress");
            post(&active, ServerMessage::failure(BUSY_MESSAGE, request_id));
            return None;
        }

        let controller = Arc::clone(self);
        let mode = self.modes.mode();
        let (id, in_flight) = (active.id, active.in_flight);
        Some(tokio::spawn(async move {
            let pipeline = controller.pipeline.clone();
            let error_text = request.into_error_text();
            let task = tokio::spawn(async move { pipeline.analyze(&error_text, &mode).await });

            let message = match task.await {
                Ok(diagnosis) => ServerMessage::analysis(diagnosis, request_id),
                Err(e) => {
                    let reason = if e.is_panic() {
                        panic_message(e.into_panic())
                    } else {
                        e.to_string()
                    };
                    error!(error = %reason, "Analysis task failed");
                    ServerMessage::failure(format!("Analysis failed: {reason}"), request_id)
                }
            };

            in_flight.store(false, Ordering::Release);
            controller.deliver(id, message);
        }))
    }

    fn lookup(&self, id: SurfaceId) -> Option<ActiveSurface> {
        self.current().filter(|active| active.id == id)
    }

    fn current(&self) -> Option<ActiveSurface> {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            SessionState::Active(active) => Some(active.clone()),
            SessionState::Idle => None,
        }
    }
}

fn post(active: &ActiveSurface, message: ServerMessage) {
    if let Err(e) = active.surface.post(message) {
        debug!(surface_id = %active.id, error = %e, "Surface no longer accepts messages");
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
