//! Predecessor lookup over workflow connections
//!
//! "Previous node" is the source of the first inbound connection, in list
//! order. Fan-in nodes therefore see only their first-declared upstream.

use crate::workflow::{WorkflowConnection, WorkflowNode};

/// Source node id of the first connection targeting `node`
#[inline]
pub fn predecessor_of<'a>(
    node: &WorkflowNode,
    connections: &'a [WorkflowConnection],
) -> Option<&'a str> {
    connections
        .iter()
        .find(|c| c.target_node_id == node.node_id)
        .map(|c| c.source_node_id.as_str())
}

/// All inbound sources of `node`, in connection order
pub fn inbound_sources<'a>(
    node: &'a WorkflowNode,
    connections: &'a [WorkflowConnection],
) -> impl Iterator<Item = &'a str> + 'a {
    connections
        .iter()
        .filter(move |c| c.target_node_id == node.node_id)
        .map(|c| c.source_node_id.as_str())
}
