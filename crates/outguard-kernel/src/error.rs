//! Crate-level error types for `outguard-kernel`.
//!
//! Provides a unified [`KernelError`] that composes the errors of every
//! sub-module together with [`error_stack::Report`] for context-carrying
//! propagation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use outguard_kernel::error::{KernelError, KernelResult};
//! use error_stack::ResultExt;
//!
//! fn load() -> KernelResult<GovernanceConfig> {
//!     outguard_kernel::config::load_governance_config("governance.toml")
//!         .map_err(KernelError::from)
//!         .map_err(error_stack::Report::new)
//!         .attach("loading governance.toml")
//! }
//! ```

use crate::config::ConfigError;
use crate::governance::{AuditError, GovernanceError, RegenerationError};
use thiserror::Error;

/// Crate-level error type for `outguard-kernel`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KernelError {
    #[error("Governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("Regeneration error: {0}")]
    Regeneration(#[from] RegenerationError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal / untyped error described by a message string.
    #[error("{0}")]
    Internal(String),
}

/// Convenience result alias using [`error_stack::Report`].
pub type KernelResult<T> = Result<T, error_stack::Report<KernelError>>;

#[cfg(test)]
mod tests {
    use super::*;
    use error_stack::{Report, ResultExt};

    #[test]
    fn governance_error_converts_via_from() {
        let err: KernelError = GovernanceError::Configuration("max_retries".into()).into();
        assert!(matches!(err, KernelError::Governance(_)));
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn config_error_converts_via_from() {
        let err: KernelError = ConfigError::UnsupportedFormat("xml".into()).into();
        assert!(matches!(err, KernelError::Config(_)));
    }

    #[test]
    fn report_carries_context() {
        let result: KernelResult<()> = Err(Report::new(KernelError::Internal("root cause".into())))
            .attach("while loading governance config");

        let display = format!("{:?}", result.unwrap_err());
        assert!(display.contains("root cause"));
        assert!(display.contains("while loading governance config"));
    }
}
