use async_trait::async_trait;
use outguard_kernel::governance::{RegenerationError, Regenerator};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A scripted stand-in for the generation engine.
///
/// Replays queued completions and errors in order and records every
/// correction prompt it receives. Once the script runs out it keeps
/// answering with the fallback, if one is set, or with an error.
#[derive(Clone, Default)]
pub struct ScriptedRegenerator {
    script: Arc<Mutex<VecDeque<Result<String, RegenerationError>>>>,
    fallback: Option<Result<String, RegenerationError>>,
    /// Track all prompts passed to this regenerator
    pub call_history: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRegenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion.
    #[must_use]
    pub fn then_respond(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn then_fail(self, error: RegenerationError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Answer with `text` whenever the script is exhausted.
    #[must_use]
    pub fn always_respond(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(Ok(text.into()));
        self
    }

    /// Fail with `error` whenever the script is exhausted.
    #[must_use]
    pub fn always_fail(mut self, error: RegenerationError) -> Self {
        self.fallback = Some(Err(error));
        self
    }

    /// Prompts received so far, in call order.
    pub fn history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_history.lock().len()
    }
}

#[async_trait]
impl Regenerator for ScriptedRegenerator {
    async fn regenerate(&self, prompt: String) -> Result<String, RegenerationError> {
        self.call_history.lock().push(prompt);
        let next = self.script.lock().pop_front();
        next.or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(RegenerationError::failed("script exhausted")))
    }
}

#[macro_export]
macro_rules! assert_regenerated {
    ($regenerator:expr, $expected_count:expr) => {
        let count = $regenerator.call_count();
        assert_eq!(
            count, $expected_count,
            "Expected {} regeneration call(s), got {}",
            $expected_count, count
        );
    };
}
