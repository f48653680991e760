//! Best-effort field extraction from node output
//!
//! Node output is whatever the remote agent printed: sometimes JSON, often
//! `key: value` lines, sometimes free text. Strategies run in a fixed order
//! and the first one that finds something wins:
//!
//! 1. JSON object key / array index (only when the output looks like JSON)
//! 2. `key: value` or `key=value` line, key compared case-insensitively
//! 3. `lineN` as a 1-based line number (`line` alone means `line1`)
//!
//! JSON goes first so a JSON payload is never read as `key: value` text.

use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::context::text_form;

/// Why a strategy could not run (as opposed to running and finding nothing)
#[derive(Debug, Error)]
pub(crate) enum ExtractError {
    #[error("output looks like JSON but does not parse: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{0}' is not a line number")]
    LineNumber(String),
}

/// `Ok(None)` is "not found", `Err` is "malformed input for this strategy"
type Attempt = Result<Option<String>, ExtractError>;

type Strategy = fn(&str, &str) -> Attempt;

const STRATEGIES: [(&str, Strategy); 3] = [
    ("json", from_json),
    ("key_value", from_key_value),
    ("line_number", from_line_number),
];

/// Extract `field` from `output`, or an empty string when no strategy matches
pub fn extract_field(output: &str, field: &str) -> String {
    for (name, strategy) in STRATEGIES {
        match strategy(output, field) {
            Ok(Some(value)) => return value,
            Ok(None) => {}
            Err(e) => trace!(strategy = name, field, error = %e, "extraction strategy skipped"),
        }
    }
    String::new()
}

/// Number of lines in `output` (0 for empty output)
///
/// Splits on `\n` and `\r\n` only; a lone `\r`, `\x0b`, `\x0c` or `\u{2028}`
/// does not start a new line, so `"a\rb"` counts as one.
pub fn line_count(output: &str) -> usize {
    output.lines().count()
}

/// Length of `output` in characters
pub fn char_count(output: &str) -> usize {
    output.chars().count()
}

fn from_json(output: &str, field: &str) -> Attempt {
    let trimmed = output.trim_start();
    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return Ok(None);
    }

    let data: Value = serde_json::from_str(trimmed)?;
    let found = match &data {
        Value::Object(map) => map.get(field),
        Value::Array(items) if is_index(field) => {
            field.parse::<usize>().ok().and_then(|i| items.get(i))
        }
        _ => None,
    };

    Ok(found.map(text_form))
}

fn is_index(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn from_key_value(output: &str, field: &str) -> Attempt {
    let wanted = field.to_lowercase();

    for line in output.lines() {
        let line = line.trim();
        // ':' first; if that key doesn't match, the same line gets another try with '='
        for separator in [':', '='] {
            if let Some((key, value)) = line.split_once(separator) {
                if key.trim().to_lowercase() == wanted {
                    return Ok(Some(value.trim().to_string()));
                }
            }
        }
    }

    Ok(None)
}

fn from_line_number(output: &str, field: &str) -> Attempt {
    let Some(rest) = field.strip_prefix("line") else {
        return Ok(None);
    };

    let rest = rest.trim();
    let number: i64 = if rest.is_empty() {
        1
    } else {
        rest.parse()
            .map_err(|_| ExtractError::LineNumber(rest.to_string()))?
    };

    if number < 1 {
        return Ok(None);
    }

    let index = usize::try_from(number - 1).map_err(|_| ExtractError::LineNumber(rest.to_string()))?;
    Ok(output.lines().nth(index).map(str::to_string))
}
