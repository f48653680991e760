//! Expression classification
//!
//! Every trimmed `{{...}}` interior maps to exactly one variant. The
//! classification is total: anything unrecognized is `Unknown`.

use std::fmt;

use super::vars::VariableKind;

/// A classified template expression, borrowing from the template text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateExpression<'a> {
    /// `previous_output`
    PreviousOutput,
    /// `node_<id>.output`
    NodeOutput(&'a str),
    /// `variables.<name>`
    Variable(&'a str),
    /// `input.<field>`
    InputField(InputField<'a>),
    /// Anything else, kept verbatim
    Unknown(&'a str),
}

/// Sub-field of `input.<field>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField<'a> {
    Raw,
    Length,
    Lines,
    /// Extracted from the predecessor output (`status`, `line2`, `0`, ...)
    Named(&'a str),
}

impl<'a> InputField<'a> {
    pub fn parse(field: &'a str) -> Self {
        match field {
            "raw" => Self::Raw,
            "length" => Self::Length,
            "lines" => Self::Lines,
            other => Self::Named(other),
        }
    }

    pub fn as_str(&self) -> &'a str {
        match *self {
            Self::Raw => "raw",
            Self::Length => "length",
            Self::Lines => "lines",
            Self::Named(name) => name,
        }
    }
}

impl<'a> TemplateExpression<'a> {
    /// Classify a trimmed expression
    pub fn parse(expr: &'a str) -> Self {
        if expr == "previous_output" {
            return Self::PreviousOutput;
        }

        if let Some(id) = expr
            .strip_prefix("node_")
            .and_then(|rest| rest.strip_suffix(".output"))
        {
            return Self::NodeOutput(id);
        }

        if let Some(name) = expr.strip_prefix("variables.") {
            return Self::Variable(name);
        }

        if let Some(field) = expr.strip_prefix("input.") {
            return Self::InputField(InputField::parse(field));
        }

        Self::Unknown(expr)
    }

    /// Namespace of the expression, `None` for `Unknown`
    pub fn kind(&self) -> Option<VariableKind> {
        match self {
            Self::PreviousOutput => Some(VariableKind::PreviousOutput),
            Self::NodeOutput(_) => Some(VariableKind::NodeOutput),
            Self::Variable(_) => Some(VariableKind::Variable),
            Self::InputField(_) => Some(VariableKind::Input),
            Self::Unknown(_) => None,
        }
    }

    /// Whether this expression depends on the current node's predecessor
    pub fn needs_predecessor(&self) -> bool {
        matches!(self, Self::PreviousOutput | Self::InputField(_))
    }
}

/// Writes the expression text (without delimiters)
impl fmt::Display for TemplateExpression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreviousOutput => f.write_str("previous_output"),
            Self::NodeOutput(id) => write!(f, "node_{id}.output"),
            Self::Variable(name) => write!(f, "variables.{name}"),
            Self::InputField(field) => write!(f, "input.{}", field.as_str()),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}
