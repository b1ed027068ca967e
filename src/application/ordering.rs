//! Tree-position ordering for node collections.
//!
//! Nodes sort by ancestral position: each node's index path lists its
//! zero-based position among same-type siblings at every ancestor level, and
//! two paths compare root-to-leaf until the first difference.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::application::repos::{ContentSubgraph, NodeTypeFilter};
use crate::domain::nodes::{Node, NodeAggregateId};

/// Sort order accepted by [`sort_by_tree_position`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse a direction argument. Anything but `ASC`/`DESC` falls back to
    /// ascending.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "DESC" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// Sort `nodes` by their position in the node tree of `subgraph`.
///
/// Index paths are computed once per node before sorting. Nodes with
/// identical paths compare equal and keep their relative input order (the
/// underlying sort is stable).
pub fn sort_by_tree_position(
    subgraph: &dyn ContentSubgraph,
    nodes: &mut [Node],
    direction: SortDirection,
) {
    let mut index_paths: HashMap<NodeAggregateId, Vec<usize>> =
        HashMap::with_capacity(nodes.len());
    for node in nodes.iter() {
        index_paths
            .entry(node.aggregate_id.clone())
            .or_insert_with(|| index_path(subgraph, node));
    }

    nodes.sort_by(|a, b| {
        let ordering = compare_index_paths(
            &index_paths[&a.aggregate_id],
            &index_paths[&b.aggregate_id],
        );
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Sibling positions from the node itself up to (but not including) the root,
/// nearest ancestor first.
///
/// Position at each level is taken among siblings sharing the current node's
/// concrete type.
fn index_path(subgraph: &dyn ContentSubgraph, node: &Node) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node.clone();

    while let Some(parent) = subgraph.find_parent_node(&current.aggregate_id) {
        let filter = NodeTypeFilter::of([current.node_type_name.clone()]);
        let siblings = subgraph.find_child_nodes(&parent.aggregate_id, Some(&filter));
        path.push(sibling_index(&siblings, &current.aggregate_id));
        current = parent;
    }

    path
}

/// Zero-based position of `id` within `siblings`, defaulting to 0 when the
/// node is absent from its own enumeration.
fn sibling_index(siblings: &[Node], id: &NodeAggregateId) -> usize {
    siblings
        .iter()
        .position(|sibling| &sibling.aggregate_id == id)
        .unwrap_or(0)
}

/// Compare two index paths from the most distant ancestor downward. A path
/// exhausted before any difference compares equal.
fn compare_index_paths(a: &[usize], b: &[usize]) -> Ordering {
    for (own, other) in a.iter().rev().zip(b.iter().rev()) {
        match own.cmp(other) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    Ordering::Equal
}
