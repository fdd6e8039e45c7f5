//! JSON recovery from free-form LM output.
//!
//! Models asked for "ONLY valid JSON" still wrap it in prose or markdown.
//! Extraction runs a fixed chain of strategies and returns the first value
//! that parses:
//!
//! 1. the whole text
//! 2. the span from the first `{` to the last `}`
//! 3. each fenced code block, in document order
//!
//! When every strategy fails the caller decides what to substitute; this
//! module never invents content.
use crate::util::truncate_string;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Bytes of the response kept in logs and errors.
const PREVIEW_BYTES: usize = 100;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no parseable JSON after {attempts} strategies (text starts: {preview:?})")]
    NoJson { attempts: usize, preview: String },
}

type Strategy = fn(&str) -> Option<Value>;

const STRATEGIES: [(&str, Strategy); 3] = [
    ("whole_text", whole_text),
    ("brace_span", brace_span),
    ("fenced_blocks", fenced_blocks),
];

/// Extract the first JSON value found in `text`.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(text) {
            tracing::debug!(strategy = name, "extracted JSON from LM response");
            return Ok(value);
        }
        tracing::debug!(
            strategy = name,
            preview = %truncate_string(text, PREVIEW_BYTES),
            "JSON extraction strategy failed"
        );
    }
    Err(ExtractError::NoJson {
        attempts: STRATEGIES.len(),
        preview: truncate_string(text, PREVIEW_BYTES),
    })
}

fn whole_text(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

fn brace_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn fenced_blocks(text: &str) -> Option<Value> {
    fence_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|block| serde_json::from_str(block.as_str().trim()).ok())
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid fenced block regex")
    })
}
