//! Authoring-time template validation
//!
//! Stricter than run-time resolution: a typo that would silently pass
//! through at run time is rejected here. Only four shapes are accepted:
//!
//! - `previous_output`
//! - `node_<identifier>.output`
//! - `variables.<identifier>`
//! - `input.<identifier>`
//!
//! where an identifier is one or more letters, digits or underscores.
//! A span with nothing between its braces (`{{}}`) is not an expression and
//! is skipped; one holding only whitespace (`{{ }}`) is rejected as empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::matcher::spans;
use crate::error::ParamflowError;

/// `{{` plus `}}`
const DELIMITERS_LEN: usize = 4;

static EXPR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:previous_output|node_\w+\.output|variables\.\w+|input\.\w+)$").unwrap()
});

/// Check every `{{...}}` in `template`, stopping at the first bad one
///
/// `Ok(())` for text with no templates at all. The error's `Display` is the
/// message shown to the author.
pub fn validate_template(template: &str) -> Result<(), ParamflowError> {
    for expr in spans(template)
        .filter(|span| span.range.len() > DELIMITERS_LEN)
        .map(|span| span.expr)
    {
        if expr.is_empty() {
            return Err(ParamflowError::EmptyVariable);
        }
        if !EXPR_RE.is_match(expr) {
            return Err(ParamflowError::InvalidPattern {
                expr: expr.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate every string leaf of a parameter value, depth first
pub fn validate_value(value: &Value) -> Result<(), ParamflowError> {
    match value {
        Value::String(text) => validate_template(text),
        Value::Array(items) => items.iter().try_for_each(validate_value),
        Value::Object(map) => map.values().try_for_each(validate_value),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(template: &str) -> String {
        validate_template(template).unwrap_err().to_string()
    }

    // ═══════════════════════════════════════════════════════════════
    // Accepted
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn plain_text_is_valid() {
        assert!(validate_template("plain text, no templates").is_ok());
        assert!(validate_template("").is_ok());
    }

    #[test]
    fn all_four_families() {
        assert!(validate_template("{{previous_output}}").is_ok());
        assert!(validate_template("{{node_n1.output}}").is_ok());
        assert!(validate_template("{{node_step_2.output}}").is_ok());
        assert!(validate_template("{{variables.target_host}}").is_ok());
        assert!(validate_template("{{input.line2}}").is_ok());
        assert!(validate_template("{{ input.raw }} and {{variables.x}}").is_ok());
    }

    // ═══════════════════════════════════════════════════════════════
    // Rejected
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn whitespace_only_is_empty_variable() {
        assert_eq!(message("a {{ }} b"), "Empty template variable found");
        assert_eq!(message("a {{   }} b"), "Empty template variable found");
        assert_eq!(message("a {{\n}} b"), "Empty template variable found");
    }

    #[test]
    fn bare_braces_are_not_an_expression() {
        assert!(validate_template("x {{}} y").is_ok());
        assert!(validate_template("{{}}{{previous_output}}").is_ok());
    }

    #[test]
    fn invalid_pattern_reports_first() {
        assert_eq!(
            message("{{variables.x}} and {{bogus}}"),
            "Invalid template variable pattern: bogus"
        );
        assert_eq!(
            message("{{one.two}} {{three}}"),
            "Invalid template variable pattern: one.two"
        );
    }

    #[test]
    fn stops_at_first_failure() {
        assert_eq!(message("{{bad}} {{ }}"), "Invalid template variable pattern: bad");
        assert_eq!(message("{{ }} {{bad}}"), "Empty template variable found");
        // Bare braces are skipped, so the later pattern error is reported
        assert_eq!(message("{{}} {{bad}}"), "Invalid template variable pattern: bad");
    }

    #[test]
    fn stricter_than_runtime() {
        // Resolvable at run time, but not valid identifiers
        assert!(validate_template("{{node_a-1.output}}").is_err());
        assert!(validate_template("{{node_a.b.output}}").is_err());
        assert!(validate_template("{{variables.}}").is_err());
        assert!(validate_template("{{input.line 2}}").is_err());
        assert!(validate_template("{{node_.output}}").is_err());
    }

    #[test]
    fn whole_expression_must_match() {
        assert!(validate_template("{{previous_output_x}}").is_err());
        assert!(validate_template("{{xprevious_output}}").is_err());
        assert!(validate_template("{{variables.a\nb}}").is_err());
    }

    #[test]
    fn validate_nested_value() {
        let ok = json!({"a": ["{{previous_output}}", 1], "b": {"c": "{{variables.x}}"}});
        assert!(validate_value(&ok).is_ok());

        let bad = json!({"a": [1, {"deep": "{{nope}}"}]});
        assert_eq!(
            validate_value(&bad).unwrap_err().to_string(),
            "Invalid template variable pattern: nope"
        );
    }
}
