//! Stepwise Infrastructure - Adapters and engine wiring
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, configuration loading, the logging
//! bootstrap and an [`Engine`] assembling the whole resolution pipeline.

pub mod adapters;
pub mod config;
pub mod engine;
pub mod logging;
pub mod persistence;

pub use adapters::TracingStepMonitor;
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineBuilder};
pub use logging::init_tracing;
pub use persistence::{FileStoryLoader, SharedVariables};
