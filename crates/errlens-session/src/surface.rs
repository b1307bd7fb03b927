//! Presentation surfaces
//!
//! A surface is wherever outbound messages end up: a websocket, a test
//! channel, an editor panel. Posting to a surface that has gone away must
//! be harmless.

use crate::error::{Error, Result};
use crate::protocol::ServerMessage;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Identity of one bound surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    /// Create a fresh, unique id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound side of a presentation surface
pub trait Surface: Send + Sync {
    /// Deliver a message
    ///
    /// # Errors
    /// Returns [`Error::SurfaceClosed`] once the surface is torn down
    fn post(&self, message: ServerMessage) -> Result<()>;

    /// Bring the surface to the foreground
    fn reveal(&self);
}

/// Surface backed by an unbounded channel
pub struct ChannelSurface {
    id: SurfaceId,
    tx: mpsc::UnboundedSender<ServerMessage>,
    reveals: AtomicUsize,
}

impl ChannelSurface {
    /// Create a surface and the receiver its messages arrive on
    #[must_use]
    pub fn new(id: SurfaceId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = Self {
            id,
            tx,
            reveals: AtomicUsize::new(0),
        };
        (surface, rx)
    }

    /// How many times the surface was revealed
    #[must_use]
    pub fn reveal_count(&self) -> usize {
        self.reveals.load(Ordering::Relaxed)
    }
}

impl Surface for ChannelSurface {
    fn post(&self, message: ServerMessage) -> Result<()> {
        self.tx.send(message).map_err(|_| Error::SurfaceClosed)
    }

    fn reveal(&self) {
        self.reveals.fetch_add(1, Ordering::Relaxed);
        debug!(surface_id = %self.id, "Surface revealed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_ids_unique() {
        assert_ne!(SurfaceId::new(), SurfaceId::new());
    }

    #[tokio::test]
    async fn test_post_delivers() {
        let (surface, mut rx) = ChannelSurface::new(SurfaceId::new());
        surface
            .post(ServerMessage::selected_text("abc"))
            .unwrap();
        assert_eq!(rx.recv().await, Some(ServerMessage::selected_text("abc")));
    }

    #[test]
    fn test_post_after_receiver_dropped_is_closed() {
        let (surface, rx) = ChannelSurface::new(SurfaceId::new());
        drop(rx);
        let result = surface.post(ServerMessage::failure("late", None));
        assert!(matches!(result, Err(Error::SurfaceClosed)));
    }

    #[test]
    fn test_reveal_counts() {
        let (surface, _rx) = ChannelSurface::new(SurfaceId::new());
        surface.reveal();
        surface.reveal();
        assert_eq!(surface.reveal_count(), 2);
    }
}
