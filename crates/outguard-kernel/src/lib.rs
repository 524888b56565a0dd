//! Outguard kernel: types and traits of the output governance pipeline.

// config module
pub mod config;

// error module
pub mod error;

// governance module
pub mod governance;
pub use governance::*;

pub use config::{ConfigError, GovernanceConfig, VoiceBudget};
pub use error::{KernelError, KernelResult};
