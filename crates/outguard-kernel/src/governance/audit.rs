//! Audit trail contract
//!
//! One record per governance invocation, appended to an external sink. The
//! core never reads records back.

use super::contract::ContractType;
use super::error::AuditError;
use super::output::GovernanceMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable summary of one governance invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub invocation_id: Uuid,
    pub mode: GovernanceMode,
    pub contract_type: ContractType,
    pub json_only: bool,
    pub validation_passed: bool,
    pub retry_attempts: u32,
    pub secrets_detected: bool,
    /// Number of errors left on the final result
    pub errors_found: usize,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Append-only destination for audit records.
///
/// Deliberately synchronous: implementations must not block the hot path and
/// must tolerate concurrent writers without read-modify-write cycles.
pub trait AuditSink: Send + Sync {
    /// Append one record.
    fn write(&self, record: &AuditRecord) -> Result<(), AuditError>;
}
