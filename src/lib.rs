//! Paramflow - parameter templates for workflow nodes
//!
//! Resolves `{{...}}` expressions in a node's parameters against the state of
//! a running workflow (completed node outputs and workflow variables), lists
//! what a node can reference, and validates templates at authoring time.
//!
//! ```
//! use paramflow::{substitute_parameters, ExecutionContext, NodeResult, WorkflowConnection, WorkflowNode};
//! use serde_json::json;
//!
//! let mut ctx = ExecutionContext::new();
//! ctx.record_result("probe", NodeResult::success_str("status: ok"));
//! ctx.set_variable("host", "10.0.0.5");
//!
//! let node = WorkflowNode::new("check", "condition");
//! let conns = [WorkflowConnection::new("probe", "check")];
//! let params = json!({"expr": "{{input.status}} @ {{variables.host}}"});
//!
//! let out = substitute_parameters(params.as_object().unwrap(), &ctx, &node, &conns);
//! assert_eq!(out["expr"], "ok @ 10.0.0.5");
//! ```

pub mod context;
pub mod error;
pub mod extract;
pub mod graph;
pub mod template;
pub mod workflow;

pub use context::{ContextFault, ContextReader, ExecutionContext, NodeResult, NodeStatus};
pub use error::{FixSuggestion, ParamflowError};
pub use extract::extract_field;
pub use graph::predecessor_of;
pub use template::{
    available_variables, extract_expressions, resolve_expression, substitute_parameters,
    validate_template, validate_value, Resolver, TemplateExpression, TemplateVariable,
    VariableKind,
};
pub use workflow::{WorkflowConnection, WorkflowNode, WorkflowRun};
