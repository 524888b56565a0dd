//! Validate → correct → regenerate cycle
//!
//! [`AutoRetryEngine`] validates a candidate response against its contract
//! and, while violations remain and the retry budget allows, asks the
//! caller's [`Regenerator`] for a corrected completion. The loop is strictly
//! sequential and has no timeout of its own: cancellation belongs to the
//! caller and surfaces as a [`RegenerationError`](outguard_kernel::governance::RegenerationError).

use crate::contract::{INCIDENT_DIRECTIVE, JSON_ONLY_DIRECTIVE, get_contract, numbered_rules};
use crate::governance::NoopNotifier;
use crate::validation::SchemaValidator;
use outguard_kernel::GovernanceConfig;
use outguard_kernel::governance::{
    ContractType, GovernanceError, GovernanceNotifier, GovernanceStep, Regenerator, RetryOutcome, RetryRequest,
    RetryTermination, ValidationOutcome, merge_labels,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

/// Drives one response through validation and bounded correction rounds.
pub struct AutoRetryEngine {
    validator: SchemaValidator,
    notifier: Arc<dyn GovernanceNotifier>,
    max_retries: u32,
    preview_chars: usize,
}

impl AutoRetryEngine {
    /// Create an engine with the retry budget of `config`.
    pub fn new(config: &GovernanceConfig, validator: SchemaValidator) -> Self {
        Self {
            validator,
            notifier: Arc::new(NoopNotifier),
            max_retries: config.max_retries,
            preview_chars: config.correction_preview_chars,
        }
    }

    /// Report validation and correction steps to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn GovernanceNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run one retry cycle under a fresh invocation id.
    pub async fn execute(&self, request: RetryRequest, regenerator: &dyn Regenerator) -> RetryOutcome {
        self.execute_for(Uuid::new_v4(), request, regenerator).await
    }

    /// Run one retry cycle, tagging notifications with `invocation_id`.
    pub async fn execute_for(
        &self,
        invocation_id: Uuid,
        request: RetryRequest,
        regenerator: &dyn Regenerator,
    ) -> RetryOutcome {
        let RetryRequest {
            initial_text,
            contract_type,
            json_only,
            incident,
        } = request;

        let mut text = initial_text;
        let mut attempts: u32 = 0;
        let mut secrets_detected = false;
        let mut secrets_masked: Vec<String> = Vec::new();

        loop {
            let attempt_span = tracing::info_span!(
                "governance.retry_attempt",
                attempt = attempts,
                max_retries = self.max_retries,
                contract = %contract_type
            );

            self.notifier.notify(&GovernanceStep::Validating {
                invocation_id,
                attempt: attempts,
            });
            let outcome = attempt_span.in_scope(|| self.validator.validate(&text, contract_type, json_only));
            secrets_detected |= outcome.secrets_detected;
            merge_labels(&mut secrets_masked, &outcome.secrets_masked);

            if outcome.valid {
                if attempts > 0 {
                    info!(attempts, contract = %contract_type, "Response accepted after correction");
                }
                return RetryOutcome {
                    text: self.render(&text, &outcome, json_only),
                    attempts,
                    success: true,
                    errors: Vec::new(),
                    secrets_detected,
                    secrets_masked,
                    termination: RetryTermination::Succeeded,
                };
            }

            if attempts >= self.max_retries {
                warn!(
                    attempts,
                    errors = outcome.errors.len(),
                    contract = %contract_type,
                    "Retries exhausted, returning best-effort response"
                );
                return RetryOutcome {
                    text: self.render(&text, &outcome, false),
                    attempts,
                    success: false,
                    errors: outcome.errors,
                    secrets_detected,
                    secrets_masked,
                    termination: RetryTermination::Exhausted,
                };
            }

            let prompt = self.correction_prompt(&text, &outcome.errors, contract_type, json_only, incident);
            attempts += 1;
            self.notifier.notify(&GovernanceStep::Correcting {
                invocation_id,
                attempt: attempts,
                violations: outcome.errors.len(),
            });
            debug!(attempts, violations = outcome.errors.len(), "Requesting corrected response");

            match regenerator.regenerate(prompt).instrument(attempt_span).await {
                Ok(next) => text = next,
                Err(e) => {
                    warn!(attempts, error = %e, "Regeneration failed, abandoning retry cycle");
                    let mut errors = outcome.errors.clone();
                    errors.push(GovernanceError::RegenerationFailed(e.to_string()).to_string());
                    return RetryOutcome {
                        text: self.render(&text, &outcome, false),
                        attempts,
                        success: false,
                        errors,
                        secrets_detected,
                        secrets_masked,
                        termination: RetryTermination::RegenerationFailed,
                    };
                }
            }
        }
    }

    /// Produce the text handed to the formatter.
    ///
    /// With `as_json`, the safe JSON value alone, pretty-printed. Otherwise
    /// the sanitized JSON replaces the island in place and the rest of the
    /// text is masked.
    fn render(&self, text: &str, outcome: &ValidationOutcome, as_json: bool) -> String {
        if as_json {
            if let Some(json) = outcome.safe_json().and_then(|v| render_json(v, true)) {
                return json;
            }
        }

        let mut rendered = text.to_string();
        if let (Some(sanitized), Some(span)) = (&outcome.sanitized_data, &outcome.json_span) {
            let pretty = text[span.clone()].contains('\n');
            if let Some(json) = render_json(sanitized, pretty) {
                rendered.replace_range(span.clone(), &json);
            }
        }
        self.validator.scanner().mask(&rendered).masked
    }

    /// Build the prompt asking the generator to fix its previous answer.
    fn correction_prompt(
        &self,
        previous: &str,
        errors: &[String],
        contract_type: ContractType,
        json_only: bool,
        incident: bool,
    ) -> String {
        let contract = get_contract(contract_type);
        let masked = self.validator.scanner().mask(previous).masked;
        let mut preview: String = masked.chars().take(self.preview_chars).collect();
        if masked.chars().count() > self.preview_chars {
            preview.push_str(" [truncated]");
        }

        let violations = errors
            .iter()
            .enumerate()
            .map(|(idx, error)| format!("{}. {error}", idx + 1))
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = format!(
            "Your previous answer did not satisfy the \"{}\" contract.\n\n\
             Previous answer (sensitive data masked):\n<<<\n{preview}\n>>>\n\n\
             Violations:\n{violations}\n\n\
             Rewrite the answer so that it follows every rule:\n{}",
            contract.title,
            numbered_rules(contract)
        );
        if json_only {
            prompt.push_str("\n\n");
            prompt.push_str(JSON_ONLY_DIRECTIVE);
        }
        if incident {
            prompt.push_str("\n\n");
            prompt.push_str(INCIDENT_DIRECTIVE);
        }
        prompt
    }
}

fn render_json(value: &Value, pretty: bool) -> Option<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.ok()
}
