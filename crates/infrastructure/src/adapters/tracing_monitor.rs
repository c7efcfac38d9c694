//! Tracing step monitor adapter

use stepwise_application::ports::StepMonitor;
use stepwise_domain::{Parameter, TargetType};
use tracing::debug;

/// Reports every conversion as a `debug` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStepMonitor;

impl TracingStepMonitor {
    /// Creates a new tracing monitor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StepMonitor for TracingStepMonitor {
    fn converted_value_of_type(
        &self,
        raw: &str,
        target: &TargetType,
        converted: &Parameter,
        converter: &str,
    ) {
        debug!(
            raw,
            target_type = %target,
            converter,
            converted = ?converted,
            "Converted step parameter"
        );
    }
}
