//! Contract catalog
//!
//! - **`catalog`**: static contract definitions and instruction prompts
//! - **`intent`**: keyword heuristics selecting a contract for a prompt

pub mod catalog;
pub mod intent;

pub use catalog::{
    INCIDENT_DIRECTIVE, JSON_ONLY_DIRECTIVE, build_contract_prompt, get_contract, numbered_rules,
};
pub use intent::{detect_intent, is_incident, is_json_requested};
