//! Validation outcome

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Range;

/// Result of validating one candidate response against a contract.
///
/// Produced fresh for every validation pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Human-readable violations, empty when `valid`
    pub errors: Vec<String>,
    pub secrets_detected: bool,
    /// Labels of the secret kinds found in the text
    pub secrets_masked: Vec<String>,
    /// Parsed JSON with every string value masked, present when secrets were
    /// detected and a JSON value was parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_data: Option<Value>,
    /// Parsed JSON exactly as found in the text
    #[serde(skip)]
    pub parsed_data: Option<Value>,
    /// Byte range of the JSON value inside the validated text
    #[serde(skip)]
    pub json_span: Option<Range<usize>>,
}

impl ValidationOutcome {
    /// JSON value safe to hand to clients: sanitized when secrets were found.
    #[must_use]
    pub fn safe_json(&self) -> Option<&Value> {
        self.sanitized_data.as_ref().or(if self.secrets_detected {
            None
        } else {
            self.parsed_data.as_ref()
        })
    }
}
