//! Governance error taxonomy
//!
//! Content problems (contract violations, leaked secrets, exhausted retries)
//! are captured in the returned result and never surface as `Err` from the
//! pipeline. These types exist for the seams where something genuinely
//! failed: the generation callback, the audit sink, or a misconfigured
//! orchestrator.

use thiserror::Error;

/// Errors from the output governance layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GovernanceError {
    /// The response violated its contract
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The generation callback failed and the retry cycle was abandoned
    #[error("regeneration failed: {0}")]
    RegenerationFailed(String),

    /// Every correction round was used without producing a valid response
    #[error("Retries exhausted after {attempts} attempt(s): {}", .errors.join("; "))]
    ExhaustedRetries {
        /// Number of regeneration calls made
        attempts: u32,
        /// Errors from the last validation pass
        errors: Vec<String>,
    },

    /// Invalid orchestrator configuration (programming defect)
    #[error("Invalid governance configuration: {0}")]
    Configuration(String),
}

/// Failure reported by the caller-supplied generation callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegenerationError {
    /// The upstream call failed
    #[error("{0}")]
    Failed(String),

    /// The caller aborted the request
    #[error("request cancelled")]
    Cancelled,

    /// The caller's own deadline elapsed
    #[error("timed out after {duration_ms}ms")]
    Timeout {
        /// Elapsed deadline in milliseconds
        duration_ms: u64,
    },
}

impl RegenerationError {
    /// Shorthand for [`RegenerationError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<String> for RegenerationError {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for RegenerationError {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_string())
    }
}

/// Failure writing to an audit sink. Never fails a governance call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sink is closed or otherwise not accepting records
    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}
