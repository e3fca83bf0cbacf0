//! Lenient recovery of JSON objects from model output.
//!
//! Generation models are instructed to return bare JSON, but in practice
//! responses arrive wrapped in code fences, prefixed with commentary, or
//! with file paths whose backslashes were never escaped. Recovery is a
//! two-step affair: slice out the outermost object, then, if strict
//! parsing fails, escape lone backslashes and try once more.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// How much of the offending text to carry in an error.
const SNIPPET_LEN: usize = 200;

/// Errors from JSON recovery.
#[derive(Debug, Error)]
pub enum RecoverError {
    #[error("no JSON object found in model output: {snippet}")]
    MissingObject { snippet: String },

    #[error("invalid JSON in model output: {message}: {snippet}")]
    Invalid { message: String, snippet: String },
}

/// Parse a JSON object out of raw model text, tolerating fences,
/// surrounding prose, and lone backslashes.
pub fn recover<T: DeserializeOwned>(raw: &str) -> Result<T, RecoverError> {
    let object = extract_object(raw).ok_or_else(|| RecoverError::MissingObject {
        snippet: snippet(raw),
    })?;

    match serde_json::from_str(object) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            let repaired = escape_lone_backslashes(object);
            match serde_json::from_str(&repaired) {
                Ok(value) => {
                    tracing::debug!("model output parsed only after backslash repair");
                    Ok(value)
                }
                Err(_) => Err(RecoverError::Invalid {
                    message: first_error.to_string(),
                    snippet: snippet(object),
                }),
            }
        }
    }
}

/// Slice from the first `{` to the last `}`, inclusive.
///
/// This drops code fences and any commentary the model wrapped around
/// the object. Returns None if no balanced-looking object is present.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Escape backslashes that do not begin a valid JSON escape sequence.
///
/// A backslash followed by one of `\ " / b f n r t u` is left alone
/// (and the pair is consumed, so the second half of `\\` is never
/// re-examined); anything else becomes `\\`.
pub fn escape_lone_backslashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&next) if matches!(next, '\\' | '"' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => {
                out.push('\\');
                out.push(next);
                chars.next();
            }
            _ => out.push_str("\\\\"),
        }
    }

    out
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(SNIPPET_LEN).collect();
        format!("{cut}...")
    }
}
