//! Retry cycle contracts
//!
//! The generation engine is an opaque async callback supplied by the caller.
//! The retry engine only needs to hand it a correction prompt and await the
//! new completion.

use super::contract::ContractType;
use super::error::RegenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

// =============================================================================
// Regenerator
// =============================================================================

/// Produces a fresh completion for a correction prompt.
///
/// Implemented for any `Fn(String) -> impl Future<Output = Result<String,
/// RegenerationError>>`, so callers can pass an async closure directly.
#[async_trait]
pub trait Regenerator: Send + Sync {
    async fn regenerate(&self, prompt: String) -> Result<String, RegenerationError>;
}

#[async_trait]
impl<F, Fut> Regenerator for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, RegenerationError>> + Send + 'static,
{
    async fn regenerate(&self, prompt: String) -> Result<String, RegenerationError> {
        (self)(prompt).await
    }
}

// =============================================================================
// Request / Outcome
// =============================================================================

/// Input of one retry cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryRequest {
    /// First completion produced by the caller
    pub initial_text: String,
    pub contract_type: ContractType,
    pub json_only: bool,
    /// Tighten correction prompts for operational incidents
    pub incident: bool,
}

impl RetryRequest {
    pub fn new(initial_text: impl Into<String>, contract_type: ContractType) -> Self {
        Self {
            initial_text: initial_text.into(),
            contract_type,
            json_only: false,
            incident: false,
        }
    }

    #[must_use]
    pub fn json_only(mut self, json_only: bool) -> Self {
        self.json_only = json_only;
        self
    }

    #[must_use]
    pub fn incident(mut self, incident: bool) -> Self {
        self.incident = incident;
        self
    }
}

/// Terminal state of a retry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryTermination {
    /// A candidate passed validation
    Succeeded,
    /// Every correction round was used
    Exhausted,
    /// The regenerator failed; remaining rounds were skipped
    RegenerationFailed,
}

/// Result of one retry cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryOutcome {
    /// Accepted text, or the best-effort masked text on failure
    pub text: String,
    /// Number of regeneration calls made
    pub attempts: u32,
    pub success: bool,
    /// Empty on success
    pub errors: Vec<String>,
    /// Whether any pass of the cycle found secrets
    pub secrets_detected: bool,
    /// Labels accumulated across every pass of the cycle
    pub secrets_masked: Vec<String>,
    pub termination: RetryTermination,
}
