//! Governance configuration
//!
//! [`GovernanceConfig`] is always available. With the `config` feature the
//! module also provides a file loader that supports YAML, TOML, JSON, INI,
//! RON and JSON5, `${VAR}` / `$VAR` substitution and `OUTGUARD__*`
//! environment overrides.

use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
mod loader;
#[cfg(feature = "config")]
pub use loader::{
    ENV_PREFIX, detect_format, from_str, load_config, load_governance_config, load_with_env,
    substitute_env_vars,
};

/// Configuration error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Word budget for voice scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceBudget {
    /// Whole lines are accumulated up to this many words
    pub soft_word_budget: usize,
    /// No voice script ever exceeds this many words
    pub hard_word_cap: usize,
}

impl Default for VoiceBudget {
    fn default() -> Self {
        Self {
            soft_word_budget: 45,
            hard_word_cap: 55,
        }
    }
}

/// Tunables of the governance pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Maximum number of regeneration calls per invocation
    pub max_retries: u32,
    /// Characters of the rejected response quoted in correction prompts
    pub correction_preview_chars: usize,
    pub voice: VoiceBudget,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            correction_preview_chars: 800,
            voice: VoiceBudget::default(),
        }
    }
}

impl GovernanceConfig {
    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_retries",
                reason: format!("must be at most {MAX_RETRIES_LIMIT}, got {}", self.max_retries),
            });
        }
        if self.correction_preview_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "correction_preview_chars",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.voice.soft_word_budget == 0 {
            return Err(ConfigError::Invalid {
                field: "voice.soft_word_budget",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.voice.soft_word_budget > self.voice.hard_word_cap {
            return Err(ConfigError::Invalid {
                field: "voice.soft_word_budget",
                reason: format!(
                    "must not exceed voice.hard_word_cap ({})",
                    self.voice.hard_word_cap
                ),
            });
        }
        Ok(())
    }
}
