//! Diagnosis pipeline
//!
//! Remote-first, heuristic-fallback. With AI mode on, the remote client and
//! interpreter run inside an internal `Result`; any error there is reported
//! to the observer and replaced by the heuristic answer. With AI mode off
//! the remote client is never touched. [`DiagnosisPipeline::analyze`]
//! therefore always yields a [`Diagnosis`].

use crate::diagnosis::{AnalysisMode, Diagnosis};
use crate::error::Result;
use crate::heuristic::classify;
use crate::interpreter::interpret;
use crate::observer::{AnalysisObserver, TracingObserver};
use crate::remote::DiagnosisClient;
use std::sync::Arc;

/// Orchestrates remote analysis and heuristic fallback
#[derive(Clone)]
pub struct DiagnosisPipeline {
    client: Arc<dyn DiagnosisClient>,
    observer: Arc<dyn AnalysisObserver>,
}

impl DiagnosisPipeline {
    /// Create a pipeline reporting through `tracing`
    #[must_use]
    pub fn new(client: Arc<dyn DiagnosisClient>) -> Self {
        Self {
            client,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Analyze `error_text`; never fails
    pub async fn analyze(&self, error_text: &str, mode: &AnalysisMode) -> Diagnosis {
        self.observer.trace("Starting error analysis...");
        self.observer
            .trace(&format!("AI Analysis enabled: {}", mode.ai_enabled));

        if mode.ai_enabled {
            self.observer.trace("Attempting AI analysis...");
            match self.analyze_remote(error_text, mode).await {
                Ok(diagnosis) => {
                    self.observer.trace("AI analysis completed");
                    return diagnosis;
                }
                Err(e) => {
                    self.observer.trace(&format!("AI analysis failed: {e}"));
                    self.observer.alert(&format!("AI analysis failed: {e}"));
                    return classify(error_text);
                }
            }
        }

        self.observer.trace("Using basic analysis");
        classify(error_text)
    }

    async fn analyze_remote(&self, error_text: &str, mode: &AnalysisMode) -> Result<Diagnosis> {
        let credential = mode.credential.as_deref().unwrap_or_default();
        let raw = self.client.request_diagnosis(error_text, credential).await?;
        self.observer.trace(&format!("Raw AI response: {raw}"));
        Ok(interpret(&raw))
    }
}
