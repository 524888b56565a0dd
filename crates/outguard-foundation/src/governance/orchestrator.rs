//! Governance orchestrator
//!
//! Single entry point shared by the chat, multimodal and live channels:
//! detect the contract, run the retry cycle, format the accepted text and
//! append an audit record.
//!
//! # Example
//!
//! ```rust,ignore
//! use outguard_foundation::governance::GovernanceOrchestrator;
//! use outguard_kernel::governance::RegenerationError;
//!
//! let orchestrator = GovernanceOrchestrator::builder().build()?;
//! let prompt = orchestrator.enrich_prompt("Corrija este JSON, apenas json", &[]);
//! let raw = llm.complete(&prompt).await?;
//! let regenerate = |p: String| async move { llm.complete(&p).await.map_err(RegenerationError::from) };
//! let result = orchestrator.for_chat(&raw, &prompt, &regenerate, vec![]).await;
//! ```

use super::audit::TracingAuditSink;
use super::notifier::NoopNotifier;
use crate::contract::{build_contract_prompt, detect_intent, is_incident, is_json_requested};
use crate::format::ResponseFormatter;
use crate::retry::AutoRetryEngine;
use crate::security::RegexSecretScanner;
use crate::validation::SchemaValidator;
use chrono::Utc;
use outguard_kernel::GovernanceConfig;
use outguard_kernel::governance::{
    AuditRecord, AuditSink, ContractType, FileDescriptor, FormatOptions, GovernanceError,
    GovernanceMode, GovernanceNotifier, GovernanceOptions, GovernanceOutcome, GovernanceResult,
    GovernanceStep, LiveResponse, Regenerator, RetryRequest, SecretScanner,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Contract selection derived from a prompt and its attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptIntent {
    pub contract_type: ContractType,
    pub json_only: bool,
    pub incident: bool,
}

impl PromptIntent {
    /// Run the intent heuristics over `prompt` and `files`.
    pub fn detect(prompt: &str, files: &[FileDescriptor]) -> Self {
        let file_types: Vec<&str> = files.iter().map(|f| f.mime_type.as_str()).collect();
        Self {
            contract_type: detect_intent(prompt, !files.is_empty(), &file_types),
            json_only: is_json_requested(prompt),
            incident: is_incident(prompt),
        }
    }
}

// ============================================================================
// GovernanceOrchestrator
// ============================================================================

/// Governs model output for every client channel.
///
/// `Send + Sync`; share one instance behind an `Arc`. Invocations are
/// independent of each other.
pub struct GovernanceOrchestrator {
    config: GovernanceConfig,
    engine: AutoRetryEngine,
    formatter: ResponseFormatter,
    audit: Arc<dyn AuditSink>,
    notifier: Arc<dyn GovernanceNotifier>,
}

impl GovernanceOrchestrator {
    pub fn builder() -> GovernanceOrchestratorBuilder {
        GovernanceOrchestratorBuilder::default()
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    /// Prepend the contract instructions matching `prompt` to it.
    pub fn enrich_prompt(&self, prompt: &str, files: &[FileDescriptor]) -> String {
        let intent = PromptIntent::detect(prompt, files);
        let block = build_contract_prompt(intent.contract_type, intent.json_only, intent.incident);
        format!("{block}\n\n{prompt}")
    }

    /// Govern `raw`, the completion produced for `prompt`.
    ///
    /// Never fails: content problems are reported through a degraded
    /// outcome, and the returned text is always masked.
    pub async fn apply(
        &self,
        raw: &str,
        prompt: &str,
        regenerator: &dyn Regenerator,
        options: GovernanceOptions,
    ) -> GovernanceResult {
        let invocation_id = Uuid::new_v4();
        let intent = PromptIntent::detect(prompt, &options.files);
        let span = info_span!(
            "governance.apply",
            %invocation_id,
            contract = %intent.contract_type,
            mode = %options.mode,
            json_only = intent.json_only
        );

        self.govern(invocation_id, raw, intent, regenerator, options.mode)
            .instrument(span)
            .await
    }

    async fn govern(
        &self,
        invocation_id: Uuid,
        raw: &str,
        intent: PromptIntent,
        regenerator: &dyn Regenerator,
        mode: GovernanceMode,
    ) -> GovernanceResult {
        let started = Instant::now();
        let PromptIntent {
            contract_type,
            json_only,
            incident,
        } = intent;

        self.notifier.notify(&GovernanceStep::ContractSelected {
            invocation_id,
            mode,
            contract_type,
            json_only,
        });

        let request = RetryRequest::new(raw, contract_type)
            .json_only(json_only)
            .incident(incident);
        let retry = self.engine.execute_for(invocation_id, request, regenerator).await;

        self.notifier.notify(&if retry.success {
            GovernanceStep::Accepted {
                invocation_id,
                attempts: retry.attempts,
            }
        } else {
            GovernanceStep::Degraded {
                invocation_id,
                attempts: retry.attempts,
                errors: retry.errors.len(),
            }
        });

        let formatted = self.formatter.format(
            &retry.text,
            contract_type,
            FormatOptions {
                secrets_detected: retry.secrets_detected,
                json_only,
            },
        );
        self.notifier.notify(&GovernanceStep::Formatted {
            invocation_id,
            has_json: formatted.has_json,
            voice_words: formatted.voice_script.split_whitespace().count(),
        });

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let audit = AuditRecord {
            invocation_id,
            mode,
            contract_type,
            json_only,
            validation_passed: retry.success,
            retry_attempts: retry.attempts,
            secrets_detected: retry.secrets_detected,
            errors_found: retry.errors.len(),
            timestamp: Utc::now(),
            duration_ms,
        };
        if let Err(e) = self.audit.write(&audit) {
            warn!(%invocation_id, error = %e, "Failed to write audit record");
        }

        info!(
            valid = retry.success,
            attempts = retry.attempts,
            secrets_detected = retry.secrets_detected,
            duration_ms,
            "Governance complete"
        );

        let outcome = if retry.success {
            GovernanceOutcome::Ok {
                text: formatted.markdown.clone(),
            }
        } else {
            GovernanceOutcome::Degraded {
                text: formatted.markdown.clone(),
                errors: retry.errors,
                termination: retry.termination,
            }
        };

        GovernanceResult {
            outcome,
            markdown: formatted.markdown,
            voice_script: formatted.voice_script,
            detail_payload: formatted.detail_payload,
            contract_type,
            json_only,
            retry_attempts: retry.attempts,
            secrets_detected: retry.secrets_detected,
            secrets_masked: retry.secrets_masked,
            audit,
        }
    }

    /// Govern a text-chat answer.
    pub async fn for_chat(
        &self,
        raw: &str,
        prompt: &str,
        regenerator: &dyn Regenerator,
        files: Vec<FileDescriptor>,
    ) -> GovernanceResult {
        let options = GovernanceOptions::default()
            .with_files(files)
            .with_mode(GovernanceMode::Chat);
        self.apply(raw, prompt, regenerator, options).await
    }

    /// Govern an answer about attached files or images.
    pub async fn for_multimodal(
        &self,
        raw: &str,
        prompt: &str,
        regenerator: &dyn Regenerator,
        files: Vec<FileDescriptor>,
    ) -> GovernanceResult {
        let options = GovernanceOptions::default()
            .with_files(files)
            .with_mode(GovernanceMode::Multimodal);
        self.apply(raw, prompt, regenerator, options).await
    }

    /// Govern an answer for the voice-driven live assistant.
    pub async fn for_live(
        &self,
        raw: &str,
        prompt: &str,
        regenerator: &dyn Regenerator,
        files: Vec<FileDescriptor>,
    ) -> LiveResponse {
        let options = GovernanceOptions::default()
            .with_files(files)
            .with_mode(GovernanceMode::Live);
        self.apply(raw, prompt, regenerator, options).await.into()
    }
}

impl Default for GovernanceOrchestrator {
    fn default() -> Self {
        GovernanceOrchestratorBuilder::default().assemble(GovernanceConfig::default())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`GovernanceOrchestrator`]. Every part is optional.
#[derive(Default)]
pub struct GovernanceOrchestratorBuilder {
    config: Option<GovernanceConfig>,
    scanner: Option<Arc<dyn SecretScanner>>,
    audit: Option<Arc<dyn AuditSink>>,
    notifier: Option<Arc<dyn GovernanceNotifier>>,
}

impl GovernanceOrchestratorBuilder {
    #[must_use]
    pub fn config(mut self, config: GovernanceConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn scanner(mut self, scanner: Arc<dyn SecretScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    #[must_use]
    pub fn audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn GovernanceNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validate the configuration and assemble the orchestrator.
    pub fn build(self) -> Result<GovernanceOrchestrator, GovernanceError> {
        let config = self.config.clone().unwrap_or_default();
        config
            .validate()
            .map_err(|e| GovernanceError::Configuration(e.to_string()))?;
        Ok(self.assemble(config))
    }

    fn assemble(self, config: GovernanceConfig) -> GovernanceOrchestrator {
        let scanner = self
            .scanner
            .unwrap_or_else(|| Arc::new(RegexSecretScanner::default()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(NoopNotifier));
        let validator = SchemaValidator::new(Arc::clone(&scanner));
        let engine = AutoRetryEngine::new(&config, validator).with_notifier(Arc::clone(&notifier));

        GovernanceOrchestrator {
            formatter: ResponseFormatter::new(scanner, config.voice),
            engine,
            audit: self.audit.unwrap_or_else(|| Arc::new(TracingAuditSink)),
            notifier,
            config,
        }
    }
}
