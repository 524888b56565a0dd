//! Speakable summaries under a word budget
//!
//! Voice scripts are read aloud, so code, JSON and markdown markup are
//! stripped before whole lines are accumulated into a short summary.

use crate::validation::strip_json_islands;
use once_cell::sync::Lazy;
use outguard_kernel::VoiceBudget;
use outguard_kernel::governance::VoiceStyle;
use regex::Regex;
use serde_json::Value;

/// Prepended when secrets were removed from the answer.
pub const SECRETS_NOTICE: &str = "I removed sensitive data from this answer.";

/// Appended when the summary omits part of the answer.
pub const DETAILS_SUFFIX: &str = "See the chat for details.";

/// Spoken when nothing speakable is left after cleaning.
pub const FALLBACK_SCRIPT: &str = "The full answer is available in the chat.";

// =============================================================================
// Markup patterns
// =============================================================================

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+").unwrap());
static BLOCKQUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:>\s?)+").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+]\s+").unwrap());
static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*_]\s*){3,}$").unwrap());
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\*\*|__)([^*_\s](?:[^*_]*[^*_\s])?)(\*\*|__)").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]*)`").unwrap());

/// Drop fenced code blocks, including an unterminated trailing one.
fn strip_code_fences(text: &str) -> String {
    let mut out = Vec::new();
    let mut in_fence = false;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            out.push(line);
        }
    }
    out.join("\n")
}

/// Remove markdown markup from one line.
fn clean_line(line: &str) -> String {
    let line = line.trim();
    if RULE_RE.is_match(line) {
        return String::new();
    }
    let line = HEADING_RE.replace(line, "");
    let line = BLOCKQUOTE_RE.replace(&line, "");
    let line = BULLET_RE.replace(&line, "");
    let line = IMAGE_RE.replace_all(&line, "$1");
    let line = LINK_RE.replace_all(&line, "$1");
    let line = BOLD_RE.replace_all(&line, "$2");
    let line = CODE_RE.replace_all(&line, "$1");
    let line = line.replace('|', " ");
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Speakable lines of `text`, without code, JSON or markup.
pub fn speakable_lines(text: &str) -> Vec<String> {
    let without_code = strip_code_fences(text);
    strip_json_islands(&without_code)
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate `text` to its first `cap` words.
pub fn enforce_word_cap(text: &str, cap: usize) -> String {
    text.split_whitespace().take(cap).collect::<Vec<_>>().join(" ")
}

/// Number of entries a JSON repair touched: top-level keys or items.
fn changed_fields(json: &Value) -> usize {
    match json {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

// =============================================================================
// VoiceSummarizer
// =============================================================================

/// Builds voice scripts within a [`VoiceBudget`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceSummarizer {
    budget: VoiceBudget,
}

impl VoiceSummarizer {
    pub fn new(budget: VoiceBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> VoiceBudget {
        self.budget
    }

    /// Voice script for an answer spoken in `style`.
    ///
    /// Never exceeds `hard_word_cap` words, notice and suffix included.
    pub fn script(&self, text: &str, style: VoiceStyle, json: Option<&Value>, secrets_detected: bool) -> String {
        let notice_words = if secrets_detected { word_count(SECRETS_NOTICE) } else { 0 };

        let body = match style {
            VoiceStyle::Canned(phrase) => phrase.to_string(),
            VoiceStyle::JsonChangeCount => match json {
                Some(json) => {
                    let count = changed_fields(json);
                    let noun = if count == 1 { "field" } else { "fields" };
                    format!("JSON fixed. {count} {noun} updated. {DETAILS_SUFFIX}")
                }
                None => FALLBACK_SCRIPT.to_string(),
            },
            VoiceStyle::Summarize => self.summarize(text, notice_words),
        };

        let script = if secrets_detected {
            format!("{SECRETS_NOTICE} {body}")
        } else {
            body
        };
        enforce_word_cap(&script, self.budget.hard_word_cap)
    }

    /// Accumulate whole lines up to the soft budget, leaving room for the
    /// notice and the suffix under the hard cap.
    fn summarize(&self, text: &str, reserved_words: usize) -> String {
        let budget = self.budget.soft_word_budget.min(
            self.budget
                .hard_word_cap
                .saturating_sub(reserved_words + word_count(DETAILS_SUFFIX)),
        );

        let lines = speakable_lines(text);
        let mut words: Vec<&str> = Vec::new();
        let mut omitted = false;

        for line in &lines {
            let line_words: Vec<&str> = line.split_whitespace().collect();
            if words.len() + line_words.len() <= budget {
                words.extend(line_words);
            } else {
                if words.is_empty() {
                    words.extend(line_words.into_iter().take(budget));
                }
                omitted = true;
                break;
            }
        }

        if words.is_empty() {
            return FALLBACK_SCRIPT.to_string();
        }
        let summary = words.join(" ");
        if omitted {
            format!("{summary} {DETAILS_SUFFIX}")
        } else {
            summary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn summarizer() -> VoiceSummarizer {
        VoiceSummarizer::default()
    }

    #[test]
    fn short_answer_is_spoken_verbatim() {
        let script = summarizer().script("Paris is the capital of France.", VoiceStyle::Summarize, None, false);
        assert_eq!(script, "Paris is the capital of France.");
    }

    #[test]
    fn markup_code_and_json_are_not_spoken() {
        let text = "## Result\n\n- **Status**: ok\n- see [the docs](https://x.y)\n\n```rust\nfn main() {}\n```\n{\"a\": 1}\nUse `cargo run`.";
        let script = summarizer().script(text, VoiceStyle::Summarize, None, false);
        assert_eq!(script, "Result Status: ok see the docs Use cargo run.");
    }

    #[test]
    fn whole_lines_fit_the_soft_budget() {
        let line = "one two three four five six seven eight nine ten";
        let text = [line; 6].join("\n");
        let script = summarizer().script(&text, VoiceStyle::Summarize, None, false);
        // four lines fit the 45 word budget, the fifth is omitted
        assert_eq!(word_count(&script), 40 + word_count(DETAILS_SUFFIX));
        assert!(script.ends_with(DETAILS_SUFFIX));
    }

    #[test]
    fn long_first_line_is_truncated() {
        let text = "word ".repeat(200);
        let script = summarizer().script(&text, VoiceStyle::Summarize, None, true);
        assert!(script.starts_with(SECRETS_NOTICE));
        assert!(script.ends_with(DETAILS_SUFFIX));
        assert_eq!(word_count(&script), 55);
    }

    #[test]
    fn empty_summary_falls_back() {
        let script = summarizer().script("```\ncode only\n```", VoiceStyle::Summarize, None, false);
        assert_eq!(script, FALLBACK_SCRIPT);
    }

    #[test]
    fn canned_phrase_ignores_text() {
        let script = summarizer().script("anything", VoiceStyle::Canned("Done."), None, false);
        assert_eq!(script, "Done.");
    }

    #[test]
    fn json_change_count_never_reads_json() {
        let json = json!({"name": "x", "age": 3, "tags": []});
        let script = summarizer().script("{...}", VoiceStyle::JsonChangeCount, Some(&json), false);
        assert_eq!(script, "JSON fixed. 3 fields updated. See the chat for details.");

        let single = summarizer().script("", VoiceStyle::JsonChangeCount, Some(&json!(7)), false);
        assert_eq!(single, "JSON fixed. 1 field updated. See the chat for details.");
    }

    #[test]
    fn tiny_cap_is_still_respected() {
        let summarizer = VoiceSummarizer::new(VoiceBudget {
            soft_word_budget: 3,
            hard_word_cap: 4,
        });
        let script = summarizer.script("a b c d e f", VoiceStyle::Summarize, None, true);
        assert_eq!(word_count(&script), 4);
    }

    proptest! {
        #[test]
        fn script_never_exceeds_hard_cap(
            text in "[a-z #*`\\[\\]{}()\n-]{0,600}",
            secrets in any::<bool>(),
            style in 0u8..3,
        ) {
            let style = match style {
                0 => VoiceStyle::Summarize,
                1 => VoiceStyle::Canned("Log analysis complete. The details and likely causes are in the chat."),
                _ => VoiceStyle::JsonChangeCount,
            };
            let script = summarizer().script(&text, style, Some(&json!({"a": 1})), secrets);
            prop_assert!(word_count(&script) <= VoiceBudget::default().hard_word_cap);
            prop_assert!(!script.is_empty());
        }
    }
}
