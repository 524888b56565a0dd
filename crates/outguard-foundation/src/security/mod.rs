//! Secret detection and masking: foundation implementations
//!
//! Concrete implementations of the scanner trait defined in
//! `outguard-kernel::governance::secrets`.
//!
//! - **`secret_scanner`**: Regex-based detection of API keys, emails, phones
//!   and opaque identifiers

pub mod secret_scanner;

// Re-export main types for convenience
pub use secret_scanner::{API_KEY_PLACEHOLDER, RegexSecretScanner, mask_json, mask_json_with_labels};
