//! Expression resolution against a run's state
//!
//! Never fails toward the caller:
//! - a reference to something that isn't there resolves to `""`
//! - an unrecognized expression, or a fault while reading the context,
//!   leaves the original `{{expr}}` in place so the operator can see it

use std::borrow::Cow;

use thiserror::Error;
use tracing::{debug, trace, warn};

use super::expr::{InputField, TemplateExpression};
use crate::context::{ContextFault, ContextReader};
use crate::extract::{char_count, extract_field, line_count};
use crate::graph::predecessor_of;
use crate::workflow::{WorkflowConnection, WorkflowNode};

/// Internal resolution outcome, collapsed at `Resolver::resolve`
#[derive(Debug, Error)]
pub(crate) enum ResolveError {
    #[error("node '{0}' has no inbound connection")]
    NoPredecessor(String),

    #[error("node '{0}' has no recorded result")]
    NoResult(String),

    #[error("variable '{0}' is not set")]
    NoVariable(String),

    #[error("unrecognized expression")]
    Unrecognized,

    #[error(transparent)]
    Fault(#[from] ContextFault),
}

impl ResolveError {
    /// Missing data, as opposed to bad syntax or a broken context
    fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoPredecessor(_) | Self::NoResult(_) | Self::NoVariable(_)
        )
    }
}

/// Everything needed to resolve expressions for one node
///
/// Cheap to build (three borrows); holds no state between calls.
pub struct Resolver<'a, C: ?Sized> {
    ctx: &'a C,
    node: &'a WorkflowNode,
    connections: &'a [WorkflowConnection],
}

impl<C: ?Sized> Clone for Resolver<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Resolver<'_, C> {}

impl<'a, C> Resolver<'a, C>
where
    C: ContextReader + ?Sized,
{
    pub fn new(ctx: &'a C, node: &'a WorkflowNode, connections: &'a [WorkflowConnection]) -> Self {
        Self {
            ctx,
            node,
            connections,
        }
    }

    /// Resolve one trimmed expression to text
    pub fn resolve(&self, expr: &str) -> String {
        let parsed = TemplateExpression::parse(expr);

        match self.try_resolve(&parsed) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                trace!(expr, node_id = %self.node.node_id, reason = %e, "template reference resolved empty");
                String::new()
            }
            Err(ResolveError::Unrecognized) => {
                debug!(expr, node_id = %self.node.node_id, "unrecognized template expression left as-is");
                passthrough(expr)
            }
            Err(e) => {
                warn!(expr, node_id = %self.node.node_id, error = %e, "template resolution failed, left as-is");
                passthrough(expr)
            }
        }
    }

    fn try_resolve(&self, expr: &TemplateExpression<'_>) -> Result<String, ResolveError> {
        match *expr {
            TemplateExpression::PreviousOutput => Ok(self.predecessor_output()?.into_owned()),
            TemplateExpression::NodeOutput(id) => Ok(self.output_of(id)?.into_owned()),
            TemplateExpression::Variable(name) => self
                .ctx
                .variable_text(name)?
                .map(Cow::into_owned)
                .ok_or_else(|| ResolveError::NoVariable(name.to_string())),
            TemplateExpression::InputField(field) => {
                let output = self.predecessor_output()?;
                Ok(match field {
                    InputField::Raw => output.into_owned(),
                    InputField::Length => char_count(&output).to_string(),
                    InputField::Lines => line_count(&output).to_string(),
                    InputField::Named(name) => extract_field(&output, name),
                })
            }
            TemplateExpression::Unknown(_) => Err(ResolveError::Unrecognized),
        }
    }

    fn predecessor_output(&self) -> Result<Cow<'a, str>, ResolveError> {
        let previous = predecessor_of(self.node, self.connections)
            .ok_or_else(|| ResolveError::NoPredecessor(self.node.node_id.clone()))?;
        self.output_of(previous)
    }

    fn output_of(&self, node_id: &str) -> Result<Cow<'a, str>, ResolveError> {
        self.ctx
            .output_of(node_id)?
            .ok_or_else(|| ResolveError::NoResult(node_id.to_string()))
    }
}

/// `{{expr}}`, the unresolved form left in the parameter
fn passthrough(expr: &str) -> String {
    format!("{{{{{expr}}}}}")
}

/// Resolve a single expression (without delimiters) for `node`
pub fn resolve_expression<C>(
    expr: &str,
    ctx: &C,
    node: &WorkflowNode,
    connections: &[WorkflowConnection],
) -> String
where
    C: ContextReader + ?Sized,
{
    Resolver::new(ctx, node, connections).resolve(expr.trim())
}
