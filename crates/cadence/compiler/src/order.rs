//! Topological ordering with a positional fallback
//!
//! Storage does not guarantee an acyclic graph, but ordering must always
//! terminate and produce a total order. Kahn's algorithm handles the
//! well-formed case; anything it cannot fully resolve falls back to the
//! authored `position_y`. Ties break on node id everywhere so the output
//! is a pure function of the input: compiling twice yields identical
//! order.

use cadence_types::{NodeId, WorkflowEdge, WorkflowNode};
use std::collections::{HashMap, HashSet};

/// The result of ordering a workflow's nodes.
#[derive(Clone, Debug)]
pub struct NodeOrdering {
    /// All nodes, in execution order
    pub nodes: Vec<WorkflowNode>,
    /// Whether the positional fallback fired (cycle or unresolvable graph)
    pub used_fallback: bool,
}

fn positional_key(node: &WorkflowNode) -> (f64, &NodeId) {
    (node.position_y, &node.id)
}

fn positional_cmp(a: &WorkflowNode, b: &WorkflowNode) -> std::cmp::Ordering {
    let (ay, aid) = positional_key(a);
    let (by, bid) = positional_key(b);
    ay.partial_cmp(&by)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| aid.cmp(bid))
}

/// Order nodes with Kahn's algorithm, falling back to positional order
/// when the graph cannot be fully resolved.
///
/// Edges referencing nodes outside the node set do not count toward
/// ordering.
pub fn order_nodes(nodes: &[WorkflowNode], edges: &[WorkflowEdge]) -> NodeOrdering {
    let index_of: HashMap<&NodeId, usize> =
        nodes.iter().enumerate().map(|(i, n)| (&n.id, i)).collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        let (Some(&src), Some(&dst)) = (index_of.get(&edge.source), index_of.get(&edge.target))
        else {
            continue;
        };
        adjacency[src].push(dst);
        in_degree[dst] += 1;
    }

    let mut ready: Vec<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut ordered: Vec<usize> = Vec::with_capacity(nodes.len());

    while !ready.is_empty() {
        // Deterministic pop: lowest (position_y, id) among the ready set.
        let pick = ready
            .iter()
            .enumerate()
            .min_by(|(_, &a), (_, &b)| positional_cmp(&nodes[a], &nodes[b]))
            .map(|(slot, _)| slot)
            .unwrap_or(0);
        let current = ready.swap_remove(pick);
        ordered.push(current);

        for &next in &adjacency[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(next);
            }
        }
    }

    if ordered.len() < nodes.len() {
        // Cycle or unresolvable structure: total order from authored
        // vertical position instead.
        let mut fallback: Vec<WorkflowNode> = nodes.to_vec();
        fallback.sort_by(positional_cmp);
        return NodeOrdering {
            nodes: fallback,
            used_fallback: true,
        };
    }

    NodeOrdering {
        nodes: ordered.into_iter().map(|i| nodes[i].clone()).collect(),
        used_fallback: false,
    }
}

/// Find the entry node: the unique node with no incoming (valid) edges,
/// tie-broken by lowest `position_y`. `None` when every node has an
/// incoming edge (a fully cyclic graph has no entry).
pub fn entry_node<'a>(
    nodes: &'a [WorkflowNode],
    edges: &[WorkflowEdge],
) -> Option<&'a WorkflowNode> {
    let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
    let targets: HashSet<&NodeId> = edges
        .iter()
        .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
        .map(|e| &e.target)
        .collect();

    nodes
        .iter()
        .filter(|n| !targets.contains(&n.id))
        .min_by(|a, b| positional_cmp(a, b))
}
