//! Structural substitution over node parameters
//!
//! Walks the parameter tree and rewrites string leaves only. Mapping keys,
//! key order and sequence length never change; numbers, booleans and null
//! are copied through.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::matcher::replace_spans;
use super::resolve::Resolver;
use crate::context::ContextReader;
use crate::workflow::{WorkflowConnection, WorkflowNode};

impl<'a, C> Resolver<'a, C>
where
    C: ContextReader + ?Sized,
{
    /// Resolve every `{{...}}` span in `text` (single pass)
    pub fn substitute_str<'t>(&self, text: &'t str) -> Cow<'t, str> {
        replace_spans(text, |expr| self.resolve(expr))
    }

    pub fn substitute_value(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.substitute_str(text).into_owned()),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.substitute_value(item)).collect())
            }
            Value::Object(map) => Value::Object(self.substitute_map(map)),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }

    pub fn substitute_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| (key.clone(), self.substitute_value(value)))
            .collect()
    }
}

/// Resolve templates in a node's parameters, returning a new mapping
///
/// Entry point used by the workflow executor right before a node runs.
/// Never fails: the worst case is a literal `{{...}}` left in a value.
pub fn substitute_parameters<C>(
    parameters: &Map<String, Value>,
    ctx: &C,
    node: &WorkflowNode,
    connections: &[WorkflowConnection],
) -> Map<String, Value>
where
    C: ContextReader + ?Sized,
{
    let substituted = Resolver::new(ctx, node, connections).substitute_map(parameters);
    tracing::debug!(node_id = %node.node_id, keys = substituted.len(), "parameters substituted");
    substituted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ExecutionContext, NodeResult};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> (ExecutionContext, WorkflowNode, Vec<WorkflowConnection>) {
        let mut ctx = ExecutionContext::new();
        ctx.record_result("scan", NodeResult::success_str("status: ok\ncode=2"));
        ctx.set_variable("target", "10.0.0.5");
        let node = WorkflowNode::new("act", "command");
        let conns = vec![WorkflowConnection::new("scan", "act")];
        (ctx, node, conns)
    }

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn string_leaves_resolved() {
        let (ctx, node, conns) = fixture();
        let input = params(json!({
            "command": "ping -c 1 {{variables.target}}",
            "note": "code {{input.code}} / {{ input.status }}",
        }));

        let out = substitute_parameters(&input, &ctx, &node, &conns);
        assert_eq!(
            Value::Object(out),
            json!({
                "command": "ping -c 1 10.0.0.5",
                "note": "code 2 / ok",
            })
        );
    }

    #[test]
    fn nested_containers_keep_shape() {
        let (ctx, node, conns) = fixture();
        let input = params(json!({
            "retries": 3,
            "enabled": true,
            "nothing": null,
            "args": ["{{variables.target}}", 80, ["{{previous_output}}"]],
            "env": {"HOST": "{{variables.target}}", "DEPTH": {"x": "{{bogus}}"}},
        }));

        let out = substitute_parameters(&input, &ctx, &node, &conns);
        assert_eq!(
            Value::Object(out.clone()),
            json!({
                "retries": 3,
                "enabled": true,
                "nothing": null,
                "args": ["10.0.0.5", 80, ["status: ok\ncode=2"]],
                "env": {"HOST": "10.0.0.5", "DEPTH": {"x": "{{bogus}}"}},
            })
        );
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, ["retries", "enabled", "nothing", "args", "env"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let (ctx, node, conns) = fixture();
        let input = params(json!({"a": "{{variables.target}}"}));
        let before = input.clone();
        let _ = substitute_parameters(&input, &ctx, &node, &conns);
        assert_eq!(input, before);
    }

    #[test]
    fn single_pass_only() {
        let mut ctx = ExecutionContext::new();
        ctx.set_variable("inner", "secret");
        ctx.set_variable("outer", "{{variables.inner}}");
        let node = WorkflowNode::new("n", "command");

        let input = params(json!({"v": "{{variables.outer}}"}));
        let out = substitute_parameters(&input, &ctx, &node, &[]);
        assert_eq!(out["v"], json!("{{variables.inner}}"));
    }

    #[test]
    fn text_without_templates_is_borrowed() {
        let (ctx, node, conns) = fixture();
        let resolver = Resolver::new(&ctx, &node, &conns);
        assert!(matches!(resolver.substitute_str("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn empty_parameters() {
        let (ctx, node, conns) = fixture();
        assert!(substitute_parameters(&Map::new(), &ctx, &node, &conns).is_empty());
    }
}
