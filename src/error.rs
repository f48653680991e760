//! Error types with fix suggestions
//!
//! `ParamflowError` covers everything that can surface to a caller: loading a
//! run document, looking up a node in it, and authoring-time template
//! validation. Run-time resolution never returns an error (see `template::resolve`).

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum ParamflowError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Template validation (messages are shown verbatim to operators)
    // ─────────────────────────────────────────────────────────────

    #[error("Empty template variable found")]
    EmptyVariable,

    #[error("Invalid template variable pattern: {expr}")]
    InvalidPattern { expr: String },

    // ─────────────────────────────────────────────────────────────
    // Run documents (PF-010 to PF-012)
    // ─────────────────────────────────────────────────────────────

    #[error("PF-010: Node '{node_id}' not found in workflow")]
    NodeNotFound { node_id: String },

    #[error("PF-011: Duplicate node id '{node_id}' in workflow")]
    DuplicateNode { node_id: String },

    #[error("PF-012: Connection {source_id} -> {target_id} references unknown node '{missing}'")]
    DanglingConnection {
        source_id: String,
        target_id: String,
        missing: String,
    },
}

impl ParamflowError {
    /// True for errors produced by `validate_template`
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ParamflowError::EmptyVariable | ParamflowError::InvalidPattern { .. }
        )
    }
}

impl FixSuggestion for ParamflowError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ParamflowError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            ParamflowError::Json(_) => Some("Check that the document is valid JSON"),
            ParamflowError::Io(_) => Some("Check file path and permissions"),
            ParamflowError::EmptyVariable => {
                Some("Remove the empty {{ }} or put an expression inside it")
            }
            ParamflowError::InvalidPattern { .. } => Some(
                "Use {{previous_output}}, {{node_<id>.output}}, {{variables.<name>}} or {{input.<field>}}",
            ),
            ParamflowError::NodeNotFound { .. } => Some("Verify the node id exists in nodes:"),
            ParamflowError::DuplicateNode { .. } => Some("Give every node a unique node_id"),
            ParamflowError::DanglingConnection { .. } => {
                Some("Declare both ends of the connection in nodes:")
            }
        }
    }
}
