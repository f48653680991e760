//! Variable enumeration for authoring surfaces
//!
//! Lists what a node could reference right now. Purely descriptive: nothing
//! here feeds back into resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::ContextReader;
use crate::graph::predecessor_of;
use crate::workflow::{WorkflowConnection, WorkflowNode};

/// Namespace a template variable belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    PreviousOutput,
    NodeOutput,
    Variable,
    Input,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreviousOutput => "previous_output",
            Self::NodeOutput => "node_output",
            Self::Variable => "variable",
            Self::Input => "input",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One referenceable variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    /// Expression text, e.g. `node_n1.output`
    pub name: String,
    pub kind: VariableKind,
    /// Literal form to paste into a parameter, e.g. `{{node_n1.output}}`
    pub value: String,
    pub description: String,
}

impl TemplateVariable {
    fn new(name: String, kind: VariableKind, description: String) -> Self {
        let value = format!("{{{{{name}}}}}");
        Self {
            name,
            kind,
            value,
            description,
        }
    }
}

/// Input fields offered to condition nodes
const CONDITION_INPUT_FIELDS: [(&str, &str); 5] = [
    ("input.raw", "Raw input text"),
    ("input.length", "Input text length"),
    ("input.lines", "Number of lines in input"),
    ("input.line1", "First line of input"),
    ("input.line2", "Second line of input"),
];

/// Variables available to `node`, in display order
///
/// Order: `previous_output` (only when the node has a predecessor), other
/// nodes' outputs, workflow variables, then the `input.*` fields for
/// condition nodes.
pub fn available_variables<C>(
    ctx: &C,
    node: &WorkflowNode,
    connections: &[WorkflowConnection],
) -> Vec<TemplateVariable>
where
    C: ContextReader + ?Sized,
{
    let mut vars = Vec::new();

    if predecessor_of(node, connections).is_some() {
        vars.push(TemplateVariable::new(
            "previous_output".to_string(),
            VariableKind::PreviousOutput,
            "Output from the previous node".to_string(),
        ));
    }

    for node_id in ctx.node_ids() {
        if node_id == node.node_id {
            continue;
        }
        vars.push(TemplateVariable::new(
            format!("node_{node_id}.output"),
            VariableKind::NodeOutput,
            format!("Output from node {node_id}"),
        ));
    }

    for name in ctx.variable_names() {
        vars.push(TemplateVariable::new(
            format!("variables.{name}"),
            VariableKind::Variable,
            format!("Workflow variable: {name}"),
        ));
    }

    if node.is_condition() {
        for (name, description) in CONDITION_INPUT_FIELDS {
            vars.push(TemplateVariable::new(
                name.to_string(),
                VariableKind::Input,
                description.to_string(),
            ));
        }
    }

    vars
}
