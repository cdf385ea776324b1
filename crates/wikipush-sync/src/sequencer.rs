//! Topological sequencer: parents before children.
//!
//! Builds an explicit dependency graph (adjacency lists plus in-degree
//! counters) from the node list and orders it with Kahn's algorithm.
//! A parent→child edge exists only when the parent is itself present in
//! the input; a `parent_path` that resolves to nothing is no dependency.
//!
//! A filesystem tree cannot form a cycle, but the sequencer handles one
//! defensively: it warns and falls back to a stable sort by path depth.

use std::collections::{HashMap, VecDeque};

use tracing::warn;

use crate::node::Node;

/// Reorder nodes so every present parent precedes its children.
///
/// Ties among simultaneously-ready nodes break in input order (FIFO).
/// The output always contains exactly the input nodes; on a cycle the
/// nodes are instead sorted by depth, preserving relative order among
/// equal depths.
#[must_use]
pub fn sequence(nodes: Vec<Node>) -> Vec<Node> {
    match topological_order(&nodes) {
        Some(order) => apply_order(nodes, &order),
        None => {
            warn!("cycle detected in node hierarchy, falling back to depth ordering");
            depth_order(nodes)
        }
    }
}

/// Kahn's algorithm over the parent→child graph.
///
/// Returns the processing order as input indices, or `None` when a cycle
/// prevents a complete ordering.
fn topological_order(nodes: &[Node]) -> Option<Vec<usize>> {
    let index_by_path: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.relative_path.as_str(), index))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];

    for (index, node) in nodes.iter().enumerate() {
        if let Some(parent) = &node.parent_path
            && let Some(&parent_index) = index_by_path.get(parent.as_str())
        {
            children[parent_index].push(index);
            in_degree[index] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(index) = queue.pop_front() {
        order.push(index);
        for &child in &children[index] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    (order.len() == nodes.len()).then_some(order)
}

/// Reorder `nodes` by the given permutation of input indices.
fn apply_order(nodes: Vec<Node>, order: &[usize]) -> Vec<Node> {
    let mut rank = vec![0usize; nodes.len()];
    for (position, &index) in order.iter().enumerate() {
        rank[index] = position;
    }

    let mut indexed: Vec<_> = nodes.into_iter().enumerate().collect();
    indexed.sort_by_key(|(index, _)| rank[*index]);
    indexed.into_iter().map(|(_, node)| node).collect()
}

/// Stable sort by path depth, shallowest first.
fn depth_order(mut nodes: Vec<Node>) -> Vec<Node> {
    nodes.sort_by_key(Node::depth);
    nodes
}
