//! Output Governance Module
//!
//! Kernel-level contracts for governing model output before any client
//! consumes it:
//! - **Contracts**: the closed set of answer shapes and their rules
//! - **Secret scanning**: detect and mask credentials and personal data
//! - **Retry cycle**: validate → correct → regenerate, bounded
//! - **Channel views**: markdown, voice script and structured payload
//! - **Audit / notification**: append-only records and thinking steps
//!
//! # Architecture
//!
//! This module defines types and traits only. Concrete implementations live
//! in `outguard-foundation`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                outguard-kernel/governance             │
//! │  ┌─────────────┐ ┌────────────┐ ┌──────────────────┐ │
//! │  │SecretScanner│ │ Regenerator│ │AuditSink Notifier│ │
//! │  └─────────────┘ └────────────┘ └──────────────────┘ │
//! └──────────────────────────────────────────────────────┘
//!                          ▲ traits
//!                          │
//! ┌──────────────────────────────────────────────────────┐
//! │                  outguard-foundation                  │
//! │  RegexSecretScanner  catalog+intent   SchemaValidator │
//! │  AutoRetryEngine  ResponseFormatter  Orchestrator     │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod contract;
pub mod error;
pub mod notifier;
pub mod output;
pub mod retry;
pub mod secrets;
pub mod validation;

pub use audit::{AuditRecord, AuditSink};
pub use contract::{Contract, ContractType, OutputRule, RuleCheck, VoiceStyle};
pub use error::{AuditError, GovernanceError, RegenerationError};
pub use notifier::{GovernanceNotifier, GovernanceStep};
pub use output::{
    DetailPayload, FileDescriptor, FormatOptions, FormattedOutput, GovernanceMode,
    GovernanceOptions, GovernanceOutcome, GovernanceResult, LiveResponse,
};
pub use retry::{Regenerator, RetryOutcome, RetryRequest, RetryTermination};
pub use secrets::{MaskResult, SecretKind, SecretMatch, SecretScanner, merge_labels};
pub use validation::ValidationOutcome;
