//! `{{...}}` span matching
//!
//! Spans are non-greedy and do not nest: the first `}}` after a `{{` closes
//! it. Interiors may cross line breaks and are trimmed before use.

use std::borrow::Cow;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").unwrap());

/// One `{{...}}` occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    /// Byte range of the whole span, delimiters included
    pub range: Range<usize>,
    /// Trimmed interior
    pub expr: &'a str,
}

/// All spans in `text`, left to right
pub fn spans(text: &str) -> impl Iterator<Item = Span<'_>> {
    SPAN_RE.captures_iter(text).map(|cap| {
        let whole = cap.get(0).unwrap();
        let inner = cap.get(1).map_or("", |m| m.as_str());
        Span {
            range: whole.range(),
            expr: inner.trim(),
        }
    })
}

/// Trimmed interiors of all spans in `text`
///
/// Example: `"{{ a }} and {{b}}"` → `["a", "b"]`
pub fn extract_expressions(text: &str) -> Vec<&str> {
    spans(text).map(|s| s.expr).collect()
}

/// Replace every span with `replace(expr)` in a single pass
///
/// Replacement text is inserted as-is and never scanned again, so a
/// resolved value that itself contains `{{...}}` stays literal.
/// Returns `Cow::Borrowed` when `text` has no spans.
pub(crate) fn replace_spans<'t, F>(text: &'t str, mut replace: F) -> Cow<'t, str>
where
    F: FnMut(&str) -> String,
{
    if !text.contains("{{") {
        return Cow::Borrowed(text);
    }

    SPAN_RE.replace_all(text, |cap: &Captures<'_>| {
        let inner = cap.get(1).map_or("", |m| m.as_str());
        replace(inner.trim())
    })
}
