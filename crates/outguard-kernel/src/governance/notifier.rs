//! "Thinking step" notifications for diagnostic views
//!
//! Fire-and-forget: a notifier can never fail or slow down governance.

use super::contract::ContractType;
use super::output::GovernanceMode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A step reached by one governance invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum GovernanceStep {
    ContractSelected {
        invocation_id: Uuid,
        mode: GovernanceMode,
        contract_type: ContractType,
        json_only: bool,
    },
    Validating {
        invocation_id: Uuid,
        attempt: u32,
    },
    Correcting {
        invocation_id: Uuid,
        attempt: u32,
        violations: usize,
    },
    Accepted {
        invocation_id: Uuid,
        attempts: u32,
    },
    Degraded {
        invocation_id: Uuid,
        attempts: u32,
        errors: usize,
    },
    Formatted {
        invocation_id: Uuid,
        has_json: bool,
        voice_words: usize,
    },
}

impl GovernanceStep {
    #[must_use]
    pub fn invocation_id(&self) -> Uuid {
        match self {
            Self::ContractSelected { invocation_id, .. }
            | Self::Validating { invocation_id, .. }
            | Self::Correcting { invocation_id, .. }
            | Self::Accepted { invocation_id, .. }
            | Self::Degraded { invocation_id, .. }
            | Self::Formatted { invocation_id, .. } => *invocation_id,
        }
    }
}

/// Receives governance steps.
pub trait GovernanceNotifier: Send + Sync {
    fn notify(&self, step: &GovernanceStep);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_notifier_object_safe(_: &dyn GovernanceNotifier) {}

    #[test]
    fn step_serializes_with_tag() {
        let id = Uuid::nil();
        let step = GovernanceStep::Correcting {
            invocation_id: id,
            attempt: 1,
            violations: 2,
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["step"], "correcting");
        assert_eq!(json["violations"], 2);
        assert_eq!(step.invocation_id(), id);
    }
}
