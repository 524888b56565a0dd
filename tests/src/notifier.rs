use outguard_kernel::governance::{GovernanceNotifier, GovernanceStep};
use parking_lot::Mutex;

/// Tag of a step, as serialized in its `step` field.
pub fn step_name(step: &GovernanceStep) -> &'static str {
    match step {
        GovernanceStep::ContractSelected { .. } => "contract_selected",
        GovernanceStep::Validating { .. } => "validating",
        GovernanceStep::Correcting { .. } => "correcting",
        GovernanceStep::Accepted { .. } => "accepted",
        GovernanceStep::Degraded { .. } => "degraded",
        GovernanceStep::Formatted { .. } => "formatted",
    }
}

/// Records every governance step it is notified of.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    steps: Mutex<Vec<GovernanceStep>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> Vec<GovernanceStep> {
        self.steps.lock().clone()
    }

    /// Step tags in notification order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.lock().iter().map(step_name).collect()
    }
}

impl GovernanceNotifier for RecordingNotifier {
    fn notify(&self, step: &GovernanceStep) {
        self.steps.lock().push(step.clone());
    }
}
