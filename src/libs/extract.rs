//! Recovery of a JSON object from free-form model output.
//!
//! Language models wrap their answer in code fences, add prose around it,
//! truncate with `...` and use typographic quotes. [`extract_json`] undoes the
//! common cases deterministically and refuses to guess when the object
//! boundaries cannot be found.
//!
//! ```rust
//! use brainclock::libs::extract::extract_json;
//!
//! let object = extract_json("```json\n{\"day_plan\": \"rest\"}\n```").unwrap();
//! assert_eq!(object["day_plan"], "rest");
//!
//! let object = extract_json("Some text {\"a\": 1,} more").unwrap();
//! assert_eq!(object["a"], 1);
//! ```

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// Characters of raw output shown to the user when extraction fails.
pub const EXCERPT_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("malformed output: {0}")]
    MalformedOutput(String),
    #[error("invalid JSON: {message} at line {line} column {column}")]
    Decode { message: String, line: usize, column: usize },
}

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::Decode {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

fn ellipsis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{2,5}").unwrap())
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").unwrap())
}

/// Returns the JSON object contained in `raw`.
///
/// A strict parse is tried first; a failed parse gets one round of textual
/// repairs and a second attempt. The second failure is returned as is.
pub fn extract_json(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let unfenced = strip_fences(raw);

    let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) else {
        return Err(ExtractionError::MalformedOutput("no JSON object found".into()));
    };
    if end < start {
        return Err(ExtractionError::MalformedOutput("no JSON object found".into()));
    }

    let candidate = ellipsis_re().replace_all(&unfenced[start..=end], "").into_owned();

    match serde_json::from_str::<Map<String, Value>>(&candidate) {
        Ok(object) => Ok(object),
        Err(_) => Ok(serde_json::from_str::<Map<String, Value>>(&repair(&candidate))?),
    }
}

/// Strips a leading `` ```json `` or `` ``` `` fence and a trailing `` ``` ``.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn repair(candidate: &str) -> String {
    let without_commas = trailing_comma_re().replace_all(candidate, "$1");
    without_commas
        .replace("\\\"", "\"")
        .replace(['\u{201C}', '\u{201D}', '\u{201E}', '\u{00AB}', '\u{00BB}', '\u{2018}', '\u{2019}'], "\"")
        .replace('\'', "\"")
}

/// First [`EXCERPT_LEN`] characters of `raw`, cut on a character boundary.
pub fn excerpt(raw: &str) -> &str {
    match raw.char_indices().nth(EXCERPT_LEN) {
        Some((index, _)) => &raw[..index],
        None => raw,
    }
}
