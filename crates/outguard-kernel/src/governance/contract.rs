//! Output contract types
//!
//! A contract names the expected genre of an answer and carries the ordered
//! rules an acceptable response must satisfy. Rules are rendered into the
//! instruction prompt and double as validator messages; the ones with a
//! [`RuleCheck`] are enforced mechanically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Contract Type
// =============================================================================

/// Closed set of answer shapes the pipeline knows how to govern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Free-form conversational answer
    GeneralChat,
    /// Repair or reformat a JSON document
    JsonFix,
    /// Diagnose application or system logs
    LogAnalysis,
    /// Analyse tabular data (CSV, Excel)
    SpreadsheetAnalysis,
    /// Summarise an attached or quoted document
    DocumentSummary,
    /// Troubleshoot from a screenshot or photo
    VisualTroubleshooting,
    /// Describe an action to be executed by a downstream system
    ActionExecution,
    /// Operational incident response
    Incident,
}

impl ContractType {
    /// Every contract type, in catalog order.
    pub const ALL: [ContractType; 8] = [
        ContractType::GeneralChat,
        ContractType::JsonFix,
        ContractType::LogAnalysis,
        ContractType::SpreadsheetAnalysis,
        ContractType::DocumentSummary,
        ContractType::VisualTroubleshooting,
        ContractType::ActionExecution,
        ContractType::Incident,
    ];

    /// Stable snake_case tag, identical to the serde representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralChat => "general_chat",
            Self::JsonFix => "json_fix",
            Self::LogAnalysis => "log_analysis",
            Self::SpreadsheetAnalysis => "spreadsheet_analysis",
            Self::DocumentSummary => "document_summary",
            Self::VisualTroubleshooting => "visual_troubleshooting",
            Self::ActionExecution => "action_execution",
            Self::Incident => "incident",
        }
    }
}

impl Default for ContractType {
    fn default() -> Self {
        Self::GeneralChat
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown contract type: {s}"))
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Machine-checkable predicate attached to an [`OutputRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCheck {
    /// The response must contain non-whitespace text
    NonEmpty,
    /// The response must contain a parseable JSON value
    RequiresJson,
    /// When a JSON value is present it must be an object with these keys
    RequiredKeys(&'static [&'static str]),
    /// The response must not exceed this many words
    MaxWords(usize),
}

/// A single human-readable constraint, optionally enforced by a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRule {
    /// Instruction text, shown to the model and in validator errors
    pub text: &'static str,
    /// Predicate enforced by the validator, if any
    pub check: Option<RuleCheck>,
}

impl OutputRule {
    /// A rule that is only communicated to the model.
    #[must_use]
    pub const fn advisory(text: &'static str) -> Self {
        Self { text, check: None }
    }

    /// A rule that the validator enforces.
    #[must_use]
    pub const fn enforced(text: &'static str, check: RuleCheck) -> Self {
        Self {
            text,
            check: Some(check),
        }
    }
}

/// How the voice channel should speak an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStyle {
    /// Summarise the answer text within the word budget
    Summarize,
    /// Always speak this fixed phrase
    Canned(&'static str),
    /// Announce completion and the number of JSON fields, never the JSON
    JsonChangeCount,
}

// =============================================================================
// Contract
// =============================================================================

/// Static definition of one contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub contract_type: ContractType,
    /// Short human name, used in prompts
    pub title: &'static str,
    /// Ordered output rules
    pub output_rules: &'static [OutputRule],
    pub voice: VoiceStyle,
}

impl Contract {
    /// Rules that carry a machine-checkable predicate, with their 1-based
    /// position in [`Contract::output_rules`].
    pub fn enforced_rules(&self) -> impl Iterator<Item = (usize, &'static OutputRule, RuleCheck)> {
        self.output_rules
            .iter()
            .enumerate()
            .filter_map(|(idx, rule)| rule.check.map(|check| (idx + 1, rule, check)))
    }

    /// Whether the contract demands JSON regardless of the json-only flag.
    #[must_use]
    pub fn requires_json(&self) -> bool {
        self.output_rules
            .iter()
            .any(|rule| rule.check == Some(RuleCheck::RequiresJson))
    }
}
