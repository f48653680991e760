//! Parameter Template Engine
//!
//! Resolves `{{...}}` expressions in node parameters at execution time:
//!
//! - `{{previous_output}}`: output of the node's predecessor
//! - `{{node_<id>.output}}`: output of a specific node
//! - `{{variables.<name>}}`: workflow variable
//! - `{{input.<field>}}`: field of the predecessor output (`raw`, `length`,
//!   `lines`, or extracted: `status`, `line2`, `0`, ...)
//!
//! Data flow:
//! ```text
//! parameters ──► substitute ──► (per string leaf) matcher ──► resolve
//!                                                             │
//!                                     graph::predecessor_of ◄─┤
//!                                     extract::extract_field ◄┘
//! ```
//!
//! `vars` and `validate` are authoring aids and are never used during execution.

mod expr;
mod matcher;
mod resolve;
mod substitute;
mod validate;
mod vars;

pub use expr::{InputField, TemplateExpression};
pub use matcher::{extract_expressions, spans, Span};
pub use resolve::{resolve_expression, Resolver};
pub use substitute::substitute_parameters;
pub use validate::{validate_template, validate_value};
pub use vars::{available_variables, TemplateVariable, VariableKind};
