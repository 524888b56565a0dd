//! Governance inputs and channel-specific outputs

use super::audit::AuditRecord;
use super::contract::ContractType;
use super::error::GovernanceError;
use super::retry::RetryTermination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Options
// =============================================================================

/// Client channel a governance call is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceMode {
    #[default]
    Chat,
    Multimodal,
    Live,
}

impl fmt::Display for GovernanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Multimodal => write!(f, "multimodal"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// An attachment that accompanied the prompt. Only its type matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// MIME type (`image/png`, `text/csv`, ...) or a bare extension
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
        }
    }
}

/// Per-call options. `files` only influences contract detection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GovernanceOptions {
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    #[serde(default)]
    pub mode: GovernanceMode,
}

impl GovernanceOptions {
    #[must_use]
    pub fn with_files(mut self, files: Vec<FileDescriptor>) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GovernanceMode) -> Self {
        self.mode = mode;
        self
    }
}

// =============================================================================
// Formatted views
// =============================================================================

/// Flags the formatter needs from the retry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub secrets_detected: bool,
    pub json_only: bool,
}

/// Structured payload for UI detail panes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPayload {
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    /// The JSON value in json-only mode, the markdown text otherwise
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_data: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// The three views derived from an accepted response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedOutput {
    pub markdown: String,
    pub voice_script: String,
    pub detail_payload: DetailPayload,
    pub has_json: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_data: Option<Value>,
    pub secrets_warning: bool,
}

// =============================================================================
// Governance result
// =============================================================================

/// Whether the response was accepted or only delivered best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GovernanceOutcome {
    /// The response satisfied its contract
    Ok { text: String },
    /// Automatic correction could not validate the response; `text` is
    /// masked and safe to show with a notice
    Degraded {
        text: String,
        errors: Vec<String>,
        termination: RetryTermination,
    },
}

impl GovernanceOutcome {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Ok { text } | Self::Degraded { text, .. } => text,
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Ok { .. } => &[],
            Self::Degraded { errors, .. } => errors,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Everything a channel needs to answer the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceResult {
    pub outcome: GovernanceOutcome,
    pub markdown: String,
    pub voice_script: String,
    pub detail_payload: DetailPayload,
    pub contract_type: ContractType,
    pub json_only: bool,
    pub retry_attempts: u32,
    pub secrets_detected: bool,
    pub secrets_masked: Vec<String>,
    pub audit: AuditRecord,
}

impl GovernanceResult {
    #[must_use]
    pub fn valid(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.outcome.text()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        self.outcome.errors()
    }

    /// Convert a degraded outcome into the error that explains it, for callers
    /// that prefer `?` over inspecting the tag.
    pub fn into_accepted(self) -> Result<String, GovernanceError> {
        match self.outcome {
            GovernanceOutcome::Ok { text } => Ok(text),
            GovernanceOutcome::Degraded {
                errors,
                termination: RetryTermination::RegenerationFailed,
                ..
            } => Err(GovernanceError::RegenerationFailed(
                errors
                    .iter()
                    .find_map(|e| e.strip_prefix("regeneration failed: "))
                    .unwrap_or("unknown error")
                    .to_string(),
            )),
            GovernanceOutcome::Degraded { errors, .. } => Err(GovernanceError::ExhaustedRetries {
                attempts: self.retry_attempts,
                errors,
            }),
        }
    }
}

/// Projection of a governance result for the voice-driven live assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveResponse {
    pub voice_script: String,
    pub chat_payload: DetailPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_data: Option<Value>,
    pub audit: AuditRecord,
}

impl From<GovernanceResult> for LiveResponse {
    fn from(result: GovernanceResult) -> Self {
        Self {
            voice_script: result.voice_script,
            json_data: result.detail_payload.json_data.clone(),
            chat_payload: result.detail_payload,
            audit: result.audit,
        }
    }
}
