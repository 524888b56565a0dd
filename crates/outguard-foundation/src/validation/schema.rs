//! Contract validation of model responses

use super::json_island::{JsonIsland, extract_json};
use crate::contract::get_contract;
use crate::security::{RegexSecretScanner, mask_json_with_labels};
use outguard_kernel::governance::{
    ContractType, RuleCheck, SecretScanner, ValidationOutcome, merge_labels,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Error reported when a json-only response holds no JSON value.
pub const JSON_ONLY_ERROR: &str = "response must contain JSON only.";

/// Validates a candidate response against its contract.
///
/// Stateless apart from the shared scanner; one validator can serve any
/// number of concurrent invocations.
#[derive(Clone)]
pub struct SchemaValidator {
    scanner: Arc<dyn SecretScanner>,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(Arc::new(RegexSecretScanner::default()))
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Create a validator using the given secret scanner.
    pub fn new(scanner: Arc<dyn SecretScanner>) -> Self {
        Self { scanner }
    }

    /// The scanner used for secret detection.
    pub fn scanner(&self) -> &Arc<dyn SecretScanner> {
        &self.scanner
    }

    /// Validate `text` against the contract of `contract_type`.
    pub fn validate(&self, text: &str, contract_type: ContractType, json_only: bool) -> ValidationOutcome {
        let contract = get_contract(contract_type);
        let island = extract_json(text);
        let mut errors = Vec::new();

        if json_only {
            match &island {
                None => errors.push(JSON_ONLY_ERROR.to_string()),
                Some(JsonIsland {
                    parsed: Err(message),
                    ..
                }) => errors.push(format!("invalid JSON: {message}")),
                Some(_) => {}
            }
        }

        let (parsed_data, json_span) = match island {
            Some(JsonIsland {
                span,
                parsed: Ok(value),
            }) => (Some(value), Some(span)),
            _ => (None, None),
        };

        let mask = self.scanner.mask(text);
        let mut labels = mask.labels_found;
        // Parsed strings are unescaped, so they can hold secrets the raw scan missed
        let masked_data = parsed_data.as_ref().map(|value| {
            let (masked, found) = mask_json_with_labels(self.scanner.as_ref(), value);
            merge_labels(&mut labels, found);
            masked
        });
        let secrets_detected = !labels.is_empty();
        let sanitized_data = if secrets_detected {
            warn!(
                contract = %contract_type,
                kinds = ?labels,
                "Secrets detected in model output"
            );
            masked_data
        } else {
            None
        };

        for (position, rule, check) in contract.enforced_rules() {
            if let Some(detail) = evaluate(check, text, parsed_data.as_ref(), json_only) {
                errors.push(format!("rule {position} violated: {} ({detail})", rule.text));
            }
        }

        debug!(
            contract = %contract_type,
            json_only,
            has_json = parsed_data.is_some(),
            errors = errors.len(),
            "Validated response"
        );

        ValidationOutcome {
            valid: errors.is_empty(),
            errors,
            secrets_detected,
            secrets_masked: labels,
            sanitized_data,
            parsed_data,
            json_span,
        }
    }
}

/// Evaluate one rule predicate, returning the violation detail.
fn evaluate(check: RuleCheck, text: &str, parsed: Option<&Value>, json_only: bool) -> Option<String> {
    match check {
        RuleCheck::NonEmpty => text.trim().is_empty().then(|| "empty response".to_string()),
        // Already reported by the json-only check
        RuleCheck::RequiresJson if json_only => None,
        RuleCheck::RequiresJson => parsed.is_none().then(|| "no valid JSON value found".to_string()),
        RuleCheck::RequiredKeys(keys) => match parsed? {
            Value::Object(map) => {
                let missing: Vec<&str> = keys
                    .iter()
                    .copied()
                    .filter(|key| !map.contains_key(*key))
                    .collect();
                (!missing.is_empty()).then(|| format!("missing keys: {}", missing.join(", ")))
            }
            _ => Some("JSON value is not an object".to_string()),
        },
        RuleCheck::MaxWords(limit) => {
            let words = text.split_whitespace().count();
            (words > limit).then(|| format!("{words} words, limit is {limit}"))
        }
    }
}
