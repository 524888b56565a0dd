//! Response formatting
//!
//! - **`formatter`**: markdown, voice and detail views of a response
//! - **`voice`**: word-budgeted voice scripts

pub mod formatter;
pub mod voice;

pub use formatter::ResponseFormatter;
pub use voice::{
    DETAILS_SUFFIX, FALLBACK_SCRIPT, SECRETS_NOTICE, VoiceSummarizer, enforce_word_cap,
    speakable_lines,
};
