//! Server module for errlens
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `routes`: HTTP and websocket routes
//! - `init`: Pipeline construction and the main run loop

pub mod config;
mod init;
mod loader;
mod routes;
mod shutdown;

// Re-export public API
pub use init::{build_pipeline, run};
pub use loader::load_config;
