//! Execution context: completed node results and workflow variables
//!
//! The workflow executor owns the context and grows it as nodes complete.
//! The template engine only ever reads it, through `ContextReader`.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// CONTEXT TRAIT
// ============================================================================

/// A read of the execution context failed (backend-specific)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("context read failed: {0}")]
pub struct ContextFault(pub String);

/// Read-only view of a run's state, as seen by the template engine
///
/// `ExecutionContext` is the in-memory implementation. Hosts that keep node
/// results elsewhere (a database, a shared map behind a lock) implement this
/// and report backend failures as `ContextFault`; the engine turns those into
/// an unresolved template instead of failing the node.
pub trait ContextReader {
    /// Text output of a completed node, `None` if the node has no result
    fn output_of(&self, node_id: &str) -> Result<Option<Cow<'_, str>>, ContextFault>;

    /// Text form of a workflow variable, `None` if unset
    fn variable_text(&self, name: &str) -> Result<Option<Cow<'_, str>>, ContextFault>;

    /// Ids of nodes with a recorded result, in recording order
    fn node_ids(&self) -> Vec<&str>;

    /// Variable names, in definition order
    fn variable_names(&self) -> Vec<&str>;
}

// ============================================================================
// NODE RESULTS
// ============================================================================

/// Node execution status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Success,
    Failed { error: String },
}

/// Result recorded for a completed node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    /// Raw node output (usually the agent's text, sometimes structured)
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl NodeResult {
    /// Create a successful result
    pub fn success(output: impl Into<Value>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Create a successful result from text
    pub fn success_str(output: impl Into<String>) -> Self {
        Self::success(Value::String(output.into()))
    }

    /// Create a failed result
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: Value::Null,
            status: NodeStatus::Failed {
                error: error.into(),
            },
            duration_ms: None,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, NodeStatus::Success)
    }

    /// Get error message if failed
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            NodeStatus::Failed { error } => Some(error),
            NodeStatus::Success => None,
        }
    }

    /// Output in text form (null output is empty)
    pub fn output_text(&self) -> String {
        text_form(&self.output)
    }
}

/// Borrowing variant of `text_form`
fn text_cow(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(text_form(other)),
    }
}

/// Text form of a JSON value as it appears inside a resolved template
///
/// Strings are verbatim, null is empty, scalars are their JSON literal and
/// containers are compact JSON.
pub fn text_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// EXECUTION CONTEXT
// ============================================================================

/// Per-run state: node results plus workflow-scoped variables
///
/// Both maps keep insertion order, which is the order variables are listed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(default)]
    pub node_results: IndexMap<String, NodeResult>,
    #[serde(default)]
    pub variables: IndexMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the result of a completed node
    pub fn record_result(&mut self, node_id: impl Into<String>, result: NodeResult) {
        self.node_results.insert(node_id.into(), result);
    }

    /// Set a workflow variable
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn node_result(&self, node_id: &str) -> Option<&NodeResult> {
        self.node_results.get(node_id)
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

impl ContextReader for ExecutionContext {
    fn output_of(&self, node_id: &str) -> Result<Option<Cow<'_, str>>, ContextFault> {
        Ok(self.node_results.get(node_id).map(|r| text_cow(&r.output)))
    }

    fn variable_text(&self, name: &str) -> Result<Option<Cow<'_, str>>, ContextFault> {
        Ok(self.variables.get(name).map(text_cow))
    }

    fn node_ids(&self) -> Vec<&str> {
        self.node_results.keys().map(String::as_str).collect()
    }

    fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }
}
