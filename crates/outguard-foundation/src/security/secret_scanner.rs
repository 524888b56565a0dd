//! Regex-based secret detection and masking
//!
//! Provides `RegexSecretScanner`, the default [`SecretScanner`] used by the
//! validator and the formatter.

use once_cell::sync::Lazy;
use outguard_kernel::governance::{MaskResult, SecretKind, SecretMatch, SecretScanner, merge_labels};
use regex::Regex;
use serde_json::{Map, Value};
use std::ops::Range;
use tracing::debug;

// =============================================================================
// Compiled Regex Patterns
// =============================================================================

// API keys: OpenAI (sk-, sk-proj-), GitHub (ghp_, github_pat_), AWS (AKIA),
// Google (AIza), Slack (xoxb-, xoxp-, ...)
static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:sk-[A-Za-z0-9_-]{20,}|ghp_[A-Za-z0-9]{36,}|github_pat_[A-Za-z0-9_]{22,}|AKIA[0-9A-Z]{16}|AIza[0-9A-Za-z_-]{35}|xox[abpr]-[A-Za-z0-9-]{10,})",
    )
    .unwrap()
});

// Email: RFC 5322 simplified
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

// Phone: optional +country code, area code with or without parentheses,
// 3-5 digit prefix, 4 digit line (BR and US layouts)
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{2,3}\)|\d{2,3})[\s.-]?\d{3,5}[\s.-]?\d{4}").unwrap()
});

// Opaque identifiers: 16+ hex characters
static OPAQUE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9A-Fa-f]{16,}\b").unwrap());

/// Placeholder substituted for API keys.
pub const API_KEY_PLACEHOLDER: &str = "[REDACTED_API_KEY]";

/// Masking passes per call. A second pass only finds something on
/// pathological inputs where masking exposes a new match.
const MAX_MASK_PASSES: usize = 4;

// =============================================================================
// RegexSecretScanner
// =============================================================================

/// Regex-based secret scanner.
///
/// Detectors run in [`SecretKind`] priority order; a match overlapping a span
/// already claimed by a higher-priority detector is dropped, so no span is
/// masked twice.
#[derive(Debug, Clone)]
pub struct RegexSecretScanner {
    enabled: Vec<SecretKind>,
}

impl Default for RegexSecretScanner {
    fn default() -> Self {
        Self {
            enabled: vec![
                SecretKind::ApiKey,
                SecretKind::Email,
                SecretKind::Phone,
                SecretKind::OpaqueId,
            ],
        }
    }
}

impl RegexSecretScanner {
    /// Create a scanner for specific kinds only.
    #[must_use]
    pub fn with_kinds(mut kinds: Vec<SecretKind>) -> Self {
        kinds.sort();
        kinds.dedup();
        Self { enabled: kinds }
    }

    fn regex(kind: SecretKind) -> &'static Regex {
        match kind {
            SecretKind::ApiKey => &API_KEY_RE,
            SecretKind::Email => &EMAIL_RE,
            SecretKind::Phone => &PHONE_RE,
            SecretKind::OpaqueId => &OPAQUE_ID_RE,
        }
    }

    fn candidates(kind: SecretKind, text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
        Self::regex(kind)
            .find_iter(text)
            .map(|m| m.range())
            .filter(move |range| kind != SecretKind::Phone || is_isolated_number(text, range))
    }

    fn mask_value(original: &str, kind: SecretKind) -> String {
        match kind {
            SecretKind::ApiKey => API_KEY_PLACEHOLDER.to_string(),
            SecretKind::Email => {
                // Preserve first char and domain: j***@example.com
                match original.find('@') {
                    Some(at_pos) => {
                        let first_char = original.chars().next().unwrap_or('*');
                        format!("{first_char}***{}", &original[at_pos..])
                    }
                    None => "***@***".to_string(),
                }
            }
            SecretKind::Phone => {
                // Keep the last 4 digits, mask every preceding digit
                let total = original.chars().filter(char::is_ascii_digit).count();
                let keep_from = total.saturating_sub(4);
                let mut seen = 0;
                original
                    .chars()
                    .map(|c| {
                        if c.is_ascii_digit() {
                            seen += 1;
                            if seen <= keep_from { '*' } else { c }
                        } else {
                            c
                        }
                    })
                    .collect()
            }
            SecretKind::OpaqueId => {
                let len = original.len();
                if len <= 8 {
                    return "*".repeat(len);
                }
                format!("{}{}{}", &original[..4], "*".repeat(len - 8), &original[len - 4..])
            }
        }
    }

    fn mask_once(&self, text: &str) -> (String, Vec<SecretMatch>) {
        let matches = self.scan(text);
        let mut masked = text.to_string();
        for m in matches.iter().rev() {
            masked.replace_range(m.span.clone(), &Self::mask_value(&m.original, m.kind));
        }
        (masked, matches)
    }
}

/// A phone candidate must not be glued to other digits, letters or mask
/// characters, otherwise it is a slice of a longer token.
fn is_isolated_number(text: &str, range: &Range<usize>) -> bool {
    let glued = |c: char| c.is_alphanumeric() || c == '*' || c == '_';
    let before_ok = text[..range.start].chars().next_back().is_none_or(|c| !glued(c) && c != '+');
    let after_ok = text[range.end..].chars().next().is_none_or(|c| !glued(c));
    before_ok && after_ok
}

impl SecretScanner for RegexSecretScanner {
    fn scan(&self, text: &str) -> Vec<SecretMatch> {
        let mut claimed: Vec<SecretMatch> = Vec::new();

        for &kind in &self.enabled {
            for span in Self::candidates(kind, text) {
                let overlaps = claimed
                    .iter()
                    .any(|m| span.start < m.span.end && m.span.start < span.end);
                if !overlaps {
                    claimed.push(SecretMatch {
                        kind,
                        original: text[span.clone()].to_string(),
                        span,
                    });
                }
            }
        }

        // Sort by start position for deterministic output
        claimed.sort_by_key(|m| m.span.start);
        claimed
    }

    fn mask(&self, text: &str) -> MaskResult {
        let mut current = text.to_string();
        let mut labels = Vec::new();

        for pass in 0..MAX_MASK_PASSES {
            let (masked, matches) = self.mask_once(&current);
            if matches.is_empty() {
                break;
            }
            if pass > 0 {
                debug!(pass, found = matches.len(), "Masking exposed further secrets");
            }
            merge_labels(&mut labels, matches.iter().map(|m| m.kind.label()));
            current = masked;
        }

        MaskResult {
            masked: current,
            labels_found: labels,
        }
    }
}

// =============================================================================
// JSON masking
// =============================================================================

/// Mask every string value of `value`, at every nesting level.
///
/// Object keys are masked as well. A number whose digits match a detector
/// is replaced by its masked string form, so the result stays valid JSON.
/// When two keys mask to the same string, the first one in map order is kept.
pub fn mask_json(scanner: &dyn SecretScanner, value: &Value) -> Value {
    mask_json_with_labels(scanner, value).0
}

/// [`mask_json`], also returning the labels of every secret kind found.
///
/// Strings are inspected after JSON unescaping, so `\u0040` spelled emails
/// and similar encodings are caught here even when a scan of the raw text
/// misses them.
pub fn mask_json_with_labels(scanner: &dyn SecretScanner, value: &Value) -> (Value, Vec<String>) {
    let mut labels = Vec::new();
    let masked = mask_node(scanner, value, &mut labels);
    (masked, labels)
}

fn mask_str(scanner: &dyn SecretScanner, text: &str, labels: &mut Vec<String>) -> String {
    let result = scanner.mask(text);
    merge_labels(labels, result.labels_found);
    result.masked
}

fn mask_node(scanner: &dyn SecretScanner, value: &Value, labels: &mut Vec<String>) -> Value {
    match value {
        Value::String(s) => Value::String(mask_str(scanner, s, labels)),
        Value::Number(n) => {
            let digits = n.to_string();
            let masked = mask_str(scanner, &digits, labels);
            if masked == digits {
                value.clone()
            } else {
                Value::String(masked)
            }
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| mask_node(scanner, v, labels)).collect()),
        Value::Object(map) => {
            let mut masked = Map::with_capacity(map.len());
            for (key, item) in map {
                let masked_key = mask_str(scanner, key, labels);
                if masked.contains_key(&masked_key) {
                    debug!(key = %masked_key, "Dropping entry whose masked key collides");
                    continue;
                }
                masked.insert(masked_key, mask_node(scanner, item, labels));
            }
            Value::Object(masked)
        }
        other => other.clone(),
    }
}

// =============================================================================
// Tests
// =============================================================================
