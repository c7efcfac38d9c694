//! Step monitor port

use stepwise_domain::{Parameter, TargetType};

/// Observes successful parameter conversions performed by the converter chain.
pub trait StepMonitor: Send + Sync {
    /// Called after `raw` has been converted to `target` by `converter`.
    fn converted_value_of_type(
        &self,
        raw: &str,
        target: &TargetType,
        converted: &Parameter,
        converter: &str,
    );
}

/// A monitor that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentStepMonitor;

impl StepMonitor for SilentStepMonitor {
    fn converted_value_of_type(&self, _: &str, _: &TargetType, _: &Parameter, _: &str) {}
}
