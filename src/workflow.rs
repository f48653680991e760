//! Workflow graph structures and run documents

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::ExecutionContext;
use crate::error::ParamflowError;
use crate::template::{self, TemplateVariable};

/// A step in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub node_id: String,
    /// Type tag, e.g. `command`, `condition`, `condition_regex`
    pub node_type: String,
    /// Parameters as authored (may contain `{{...}}` templates)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl WorkflowNode {
    pub fn new(node_id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            node_type: node_type.into(),
            parameters: Map::new(),
        }
    }

    /// `condition` or any `condition_*` variant
    pub fn is_condition(&self) -> bool {
        self.node_type == "condition" || self.node_type.starts_with("condition_")
    }
}

/// Directed edge `source_node_id -> target_node_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConnection {
    pub source_node_id: String,
    pub target_node_id: String,
}

impl WorkflowConnection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_node_id: source.into(),
            target_node_id: target.into(),
        }
    }
}

/// Snapshot of a workflow run: graph plus accumulated context
///
/// This is what the CLI loads from YAML/JSON; hosts embedding the engine
/// usually call the `template` functions directly instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowRun {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Vec<WorkflowConnection>,
    #[serde(default)]
    pub context: ExecutionContext,
}

impl WorkflowRun {
    /// Parse a run document (YAML, which also accepts JSON)
    pub fn from_yaml(source: &str) -> Result<Self, ParamflowError> {
        let run: WorkflowRun = serde_yaml::from_str(source)?;
        run.check()?;
        Ok(run)
    }

    /// Reject duplicate node ids and connections to undeclared nodes
    pub fn check(&self) -> Result<(), ParamflowError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.node_id.as_str()) {
                return Err(ParamflowError::DuplicateNode {
                    node_id: node.node_id.clone(),
                });
            }
        }

        for conn in &self.connections {
            for end in [&conn.source_node_id, &conn.target_node_id] {
                if !seen.contains(end.as_str()) {
                    return Err(ParamflowError::DanglingConnection {
                        source_id: conn.source_node_id.clone(),
                        target_id: conn.target_node_id.clone(),
                        missing: end.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn node(&self, node_id: &str) -> Result<&WorkflowNode, ParamflowError> {
        self.nodes
            .iter()
            .find(|n| n.node_id == node_id)
            .ok_or_else(|| ParamflowError::NodeNotFound {
                node_id: node_id.to_string(),
            })
    }

    /// Resolve the templates in a node's parameters against this run's context
    pub fn substitute_node(&self, node_id: &str) -> Result<Map<String, Value>, ParamflowError> {
        let node = self.node(node_id)?;
        Ok(template::substitute_parameters(
            &node.parameters,
            &self.context,
            node,
            &self.connections,
        ))
    }

    /// Variables an author could reference from the given node
    pub fn variables_for(&self, node_id: &str) -> Result<Vec<TemplateVariable>, ParamflowError> {
        let node = self.node(node_id)?;
        Ok(template::available_variables(
            &self.context,
            node,
            &self.connections,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RUN: &str = r#"
nodes:
  - node_id: probe
    node_type: command
    parameters:
      command: uptime
  - node_id: check
    node_type: condition
    parameters:
      expression: "{{input.line1}} on {{variables.host}}"
connections:
  - source_node_id: probe
    target_node_id: check
context:
  node_results:
    probe:
      output: "up 3 days\nload 0.1"
  variables:
    host: web-1
"#;

    #[test]
    fn condition_type_tags() {
        assert!(WorkflowNode::new("a", "condition").is_condition());
        assert!(WorkflowNode::new("a", "condition_regex").is_condition());
        assert!(!WorkflowNode::new("a", "conditional").is_condition());
        assert!(!WorkflowNode::new("a", "command").is_condition());
    }

    #[test]
    fn parse_and_substitute() {
        let run = WorkflowRun::from_yaml(RUN).unwrap();
        let params = run.substitute_node("check").unwrap();
        assert_eq!(params["expression"], json!("up 3 days on web-1"));
    }

    #[test]
    fn variables_for_condition_node() {
        let run = WorkflowRun::from_yaml(RUN).unwrap();
        let names: Vec<String> = run
            .variables_for("check")
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(
            names,
            [
                "previous_output",
                "node_probe.output",
                "variables.host",
                "input.raw",
                "input.length",
                "input.lines",
                "input.line1",
                "input.line2",
            ]
        );
    }

    #[test]
    fn unknown_node_is_an_error() {
        let run = WorkflowRun::from_yaml(RUN).unwrap();
        let err = run.substitute_node("missing").unwrap_err();
        assert!(matches!(err, ParamflowError::NodeNotFound { .. }));
    }

    #[test]
    fn duplicate_nodes_rejected() {
        let yaml = r#"
nodes:
  - {node_id: a, node_type: command}
  - {node_id: a, node_type: command}
"#;
        let err = WorkflowRun::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ParamflowError::DuplicateNode { .. }));
    }

    #[test]
    fn dangling_connection_rejected() {
        let yaml = r#"
nodes:
  - {node_id: a, node_type: command}
connections:
  - {source_node_id: ghost, target_node_id: a}
"#;
        let err = WorkflowRun::from_yaml(yaml).unwrap_err();
        match err {
            ParamflowError::DanglingConnection { missing, .. } => assert_eq!(missing, "ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
