//! Outguard foundation: implementations of the output governance pipeline.

// security module - regex secret detection and masking
pub mod security;

// contract module - contract catalog and intent heuristics
pub mod contract;

// validation module - JSON island scanner and contract validator
pub mod validation;

// retry module - validate / correct / regenerate cycle
pub mod retry;

// format module - markdown, voice and detail views
pub mod format;

// governance module - orchestrator, audit sinks, notifiers
pub mod governance;

pub use format::{ResponseFormatter, VoiceSummarizer};
pub use governance::{
    BroadcastNotifier, GovernanceOrchestrator, GovernanceOrchestratorBuilder, InMemoryAuditSink,
    JsonLinesAuditSink, NoopNotifier, PromptIntent, TracingAuditSink, TracingNotifier,
};
pub use retry::AutoRetryEngine;
pub use security::RegexSecretScanner;
pub use validation::SchemaValidator;
