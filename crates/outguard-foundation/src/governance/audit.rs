//! Audit sink implementations
//!
//! Concrete implementations of `AuditSink` for recording governance
//! invocations. Every sink appends; none reads records back on the hot path.

use outguard_kernel::governance::{AuditError, AuditRecord, AuditSink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// TracingAuditSink
// ============================================================================

/// Emits each record as a structured `tracing` event on the
/// `outguard::audit` target. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn write(&self, record: &AuditRecord) -> Result<(), AuditError> {
        info!(
            target: "outguard::audit",
            invocation_id = %record.invocation_id,
            mode = %record.mode,
            contract = %record.contract_type,
            json_only = record.json_only,
            validation_passed = record.validation_passed,
            retry_attempts = record.retry_attempts,
            secrets_detected = record.secrets_detected,
            errors_found = record.errors_found,
            duration_ms = record.duration_ms,
            "governance audit"
        );
        Ok(())
    }
}

// ============================================================================
// InMemoryAuditSink
// ============================================================================

/// In-memory sink for tests and diagnostics. Records are lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records written so far, in write order.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn write(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

// ============================================================================
// JsonLinesAuditSink
// ============================================================================

/// Appends one JSON object per line to a file.
///
/// Each record is serialized first and written with a single `write_all`
/// under the lock, so concurrent writers never interleave lines.
#[derive(Debug)]
pub struct JsonLinesAuditSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesAuditSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonLinesAuditSink {
    fn write(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
