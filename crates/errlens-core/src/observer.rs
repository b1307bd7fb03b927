//! Observability surface for the pipeline
//!
//! The pipeline reports each stage as an ordered trace line and raises an
//! alert when the AI path fails and the heuristic takes over.

use tracing::{info, warn};

/// Receiver for pipeline trace lines and user-facing alerts
pub trait AnalysisObserver: Send + Sync {
    /// Append one human-readable trace line
    fn trace(&self, line: &str);

    /// Surface a failure to the user
    fn alert(&self, message: &str);
}

/// Observer that forwards to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn trace(&self, line: &str) {
        info!(target: "errlens::analysis", "{}", line);
    }

    fn alert(&self, message: &str) {
        warn!(target: "errlens::analysis", "{}", message);
    }
}

/// Observer that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {
    fn trace(&self, _line: &str) {}

    fn alert(&self, _message: &str) {}
}
