//! Governance orchestration
//!
//! - **`orchestrator`**: the entry point shared by every channel
//! - **`audit`**: audit sink implementations
//! - **`notifier`**: thinking-step notifiers

pub mod audit;
pub mod notifier;
pub mod orchestrator;

pub use audit::{InMemoryAuditSink, JsonLinesAuditSink, TracingAuditSink};
pub use notifier::{BroadcastNotifier, NoopNotifier, TracingNotifier};
pub use orchestrator::{GovernanceOrchestrator, GovernanceOrchestratorBuilder, PromptIntent};
