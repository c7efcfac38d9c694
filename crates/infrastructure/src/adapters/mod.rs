//! Port adapters

mod tracing_monitor;

pub use tracing_monitor::TracingStepMonitor;
