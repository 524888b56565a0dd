//! Secret detection and masking contract
//!
//! Kernel-level trait for finding credential-like tokens, emails, phone
//! numbers and opaque identifiers in model output. Concrete detectors live in
//! `outguard-foundation::security`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Categories of sensitive substrings, in masking priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretKind {
    /// Vendor API keys and access tokens
    ApiKey,
    /// Email addresses
    Email,
    /// Phone-like digit runs
    Phone,
    /// Long hexadecimal identifiers (hashes, session ids)
    OpaqueId,
}

impl SecretKind {
    /// Label reported in `secrets_masked`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApiKey => "api_key",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::OpaqueId => "opaque_id",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One sensitive substring found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretMatch {
    pub kind: SecretKind,
    /// Byte range in the scanned text
    pub span: Range<usize>,
    pub original: String,
}

/// Result of masking a text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaskResult {
    pub masked: String,
    /// Labels of every kind that was masked, first-seen order, no duplicates
    pub labels_found: Vec<String>,
}

impl MaskResult {
    /// Returns `true` if anything was masked.
    #[must_use]
    pub fn has_secrets(&self) -> bool {
        !self.labels_found.is_empty()
    }
}

/// Detects and masks sensitive substrings.
///
/// Both operations are pure. `mask` must be idempotent: masking an already
/// masked text returns it unchanged.
pub trait SecretScanner: Send + Sync {
    /// Find all non-overlapping sensitive substrings, sorted by position.
    fn scan(&self, text: &str) -> Vec<SecretMatch>;

    /// Replace every sensitive substring with its masked form.
    fn mask(&self, text: &str) -> MaskResult;
}

/// Merge `labels` into `acc`, keeping first-seen order.
pub fn merge_labels<I, S>(acc: &mut Vec<String>, labels: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for label in labels {
        let label = label.as_ref();
        if !acc.iter().any(|existing| existing == label) {
            acc.push(label.to_string());
        }
    }
}
