//! errlens Core - Error Diagnosis Pipeline
//!
//! Turns a free-form React Native runtime error into a [`Diagnosis`]:
//! - Heuristic: ordered substring rules, always available
//! - Remote: prompt construction and one chat-completion round-trip
//! - Interpreter: lenient parsing of the completion text
//! - Pipeline: remote-first analysis with heuristic fallback
//! - Observer: trace lines and user-facing alerts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod diagnosis;
pub mod error;
pub mod heuristic;
pub mod interpreter;
pub mod observer;
pub mod pipeline;
pub mod remote;

pub use diagnosis::{AnalysisMode, AnalysisRequest, Diagnosis};
pub use error::{Error, Result};
pub use heuristic::classify;
pub use interpreter::interpret;
pub use observer::{AnalysisObserver, NoopObserver, TracingObserver};
pub use pipeline::DiagnosisPipeline;
pub use remote::{
    DiagnosisClient, OpenAiProviderFactory, ProviderFactory, RemoteDiagnosisClient,
    RemoteSettings,
};
