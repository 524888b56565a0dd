//! Balanced-bracket JSON island scanner
//!
//! Finds JSON values embedded in free text ("Here you go: {...}", fenced
//! code blocks, trailing remarks) by tracking bracket depth together with
//! string-literal and escape state, then handing each balanced candidate to
//! `serde_json`.

use serde_json::Value;
use std::ops::Range;

/// A balanced JSON candidate found in a text.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonIsland {
    /// Byte range of the candidate in the scanned text
    pub span: Range<usize>,
    /// Parsed value, or the parser message
    pub parsed: Result<Value, String>,
}

impl JsonIsland {
    /// The parsed value, if the candidate is valid JSON.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.parsed.as_ref().ok()
    }
}

/// Balanced, non-overlapping candidate spans in one left-to-right pass.
///
/// Every open bracket of a region that hits a mismatched closer or the end
/// of the text fails together, so no opener is ever rescanned. Balanced
/// spans nested in such a region surface as candidates of their own.
/// Brackets inside string literals of a failed region are not revisited.
fn candidates(text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    // (position, expected closer) of every bracket still open
    let mut open: Vec<(usize, u8)> = Vec::new();
    // balanced spans whose enclosing region is unresolved, ordered by start
    let mut nested: Vec<Range<usize>> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (pos, &byte) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push((pos, b'}')),
            b'[' => open.push((pos, b']')),
            b'}' | b']' => match open.pop() {
                Some((start, closer)) if closer == byte => {
                    while nested.last().is_some_and(|inner| inner.start > start) {
                        nested.pop();
                    }
                    if open.is_empty() {
                        found.push(start..pos + 1);
                    } else {
                        nested.push(start..pos + 1);
                    }
                }
                Some(_) => {
                    open.clear();
                    found.append(&mut nested);
                }
                None => {}
            },
            _ => {}
        }
    }
    found.append(&mut nested);
    found
}

fn parse(text: &str, span: &Range<usize>) -> Result<Value, String> {
    serde_json::from_str(&text[span.clone()]).map_err(|e| e.to_string())
}

/// Locate the first JSON value in `text`.
///
/// The first balanced candidate that parses wins. When none parses, the
/// first balanced candidate is returned with its parse error. `None` means
/// the text holds no balanced brackets at all.
#[must_use]
pub fn extract_json(text: &str) -> Option<JsonIsland> {
    let mut first_invalid: Option<JsonIsland> = None;

    for span in candidates(text) {
        match parse(text, &span) {
            Ok(value) => {
                return Some(JsonIsland {
                    span,
                    parsed: Ok(value),
                });
            }
            Err(message) => {
                if first_invalid.is_none() {
                    first_invalid = Some(JsonIsland {
                        span,
                        parsed: Err(message),
                    });
                }
            }
        }
    }
    first_invalid
}

/// Remove every parseable JSON island from `text`.
#[must_use]
pub fn strip_json_islands(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in candidates(text) {
        if parse(text, &span).is_ok() {
            out.push_str(&text[last..span.start]);
            last = span.end;
        }
    }
    out.push_str(&text[last..]);
    out
}
