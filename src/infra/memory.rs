//! In-memory content graph and node type registry.
//!
//! Reference implementations of the collaborator contracts: enough graph to
//! run the invalidation engine and the data source without a content
//! repository backend. Backs the test-suite and host embeddings that bring
//! their own content.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::application::repos::{ContentGraph, ContentSubgraph, NodeTypeFilter, NodeTypeRegistry};
use crate::cache::lock::{rw_read, rw_write};
use crate::domain::dimensions::DimensionSpacePoint;
use crate::domain::node_types::{NodeType, NodeTypeName};
use crate::domain::nodes::{Node, NodeAggregate, NodeAggregateId, WorkspaceName};

const SOURCE: &str = "infra::memory";

/// Node type registry backed by a map.
#[derive(Clone, Debug, Default)]
pub struct MemoryNodeTypeRegistry {
    types: BTreeMap<NodeTypeName, NodeType>,
}

impl MemoryNodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.types.insert(node_type.name.clone(), node_type);
        self
    }
}

impl NodeTypeRegistry for MemoryNodeTypeRegistry {
    fn get_node_type(&self, name: &NodeTypeName) -> Option<NodeType> {
        self.types.get(name).cloned()
    }

    fn node_types(&self) -> Vec<NodeType> {
        self.types.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct DimensionTree {
    nodes: BTreeMap<NodeAggregateId, Node>,
    parents: HashMap<NodeAggregateId, NodeAggregateId>,
    /// Child ids per parent, in insertion order.
    children: HashMap<NodeAggregateId, Vec<NodeAggregateId>>,
}

#[derive(Debug, Default)]
struct GraphState {
    trees: BTreeMap<(WorkspaceName, DimensionSpacePoint), DimensionTree>,
}

/// Mutable in-memory content graph: one ordered tree per workspace and
/// dimension coordinate.
#[derive(Clone, Default)]
pub struct MemoryContentGraph {
    state: Arc<RwLock<GraphState>>,
}

impl MemoryContentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a root when `None`) in the node's
    /// own workspace and dimension coordinate. Children keep insertion order.
    pub fn insert_node(&self, parent: Option<&NodeAggregateId>, node: Node) {
        let mut state = rw_write(&self.state, SOURCE, "insert_node");
        let tree = state
            .trees
            .entry((
                node.workspace_name.clone(),
                node.dimension_space_point.clone(),
            ))
            .or_default();

        if let Some(parent_id) = parent {
            tree.parents
                .insert(node.aggregate_id.clone(), parent_id.clone());
            tree.children
                .entry(parent_id.clone())
                .or_default()
                .push(node.aggregate_id.clone());
        }
        tree.nodes.insert(node.aggregate_id.clone(), node);
    }

    /// Remove an aggregate from every dimension coordinate of `workspace_name`,
    /// simulating a discard or removal.
    pub fn remove_node_aggregate(&self, workspace_name: &WorkspaceName, id: &NodeAggregateId) {
        let mut state = rw_write(&self.state, SOURCE, "remove_node_aggregate");
        for ((workspace, _), tree) in state.trees.iter_mut() {
            if workspace != workspace_name {
                continue;
            }
            tree.nodes.remove(id);
            tree.parents.remove(id);
            tree.children.remove(id);
            for child_ids in tree.children.values_mut() {
                child_ids.retain(|child_id| child_id != id);
            }
        }
    }
}

impl ContentGraph for MemoryContentGraph {
    fn find_node_aggregate_by_id(
        &self,
        workspace_name: &WorkspaceName,
        id: &NodeAggregateId,
    ) -> Option<NodeAggregate> {
        let state = rw_read(&self.state, SOURCE, "find_node_aggregate_by_id");
        let mut covered = Vec::new();
        let mut node_type_name = None;

        for ((workspace, dimension_space_point), tree) in state.trees.iter() {
            if workspace != workspace_name {
                continue;
            }
            if let Some(node) = tree.nodes.get(id) {
                covered.push(dimension_space_point.clone());
                node_type_name.get_or_insert_with(|| node.node_type_name.clone());
            }
        }

        Some(NodeAggregate {
            id: id.clone(),
            node_type_name: node_type_name?,
            covered_dimension_space_points: covered,
        })
    }

    fn subgraph(
        &self,
        workspace_name: &WorkspaceName,
        dimension_space_point: &DimensionSpacePoint,
    ) -> Arc<dyn ContentSubgraph> {
        Arc::new(MemorySubgraph {
            state: Arc::clone(&self.state),
            workspace_name: workspace_name.clone(),
            dimension_space_point: dimension_space_point.clone(),
        })
    }
}

/// Dimension-scoped view into a [`MemoryContentGraph`].
struct MemorySubgraph {
    state: Arc<RwLock<GraphState>>,
    workspace_name: WorkspaceName,
    dimension_space_point: DimensionSpacePoint,
}

impl MemorySubgraph {
    fn with_tree<R>(&self, f: impl FnOnce(&DimensionTree) -> R) -> Option<R> {
        let state = rw_read(&self.state, SOURCE, "with_tree");
        state
            .trees
            .get(&(
                self.workspace_name.clone(),
                self.dimension_space_point.clone(),
            ))
            .map(f)
    }
}

impl ContentSubgraph for MemorySubgraph {
    fn workspace_name(&self) -> &WorkspaceName {
        &self.workspace_name
    }

    fn dimension_space_point(&self) -> &DimensionSpacePoint {
        &self.dimension_space_point
    }

    fn find_node_by_id(&self, id: &NodeAggregateId) -> Option<Node> {
        self.with_tree(|tree| tree.nodes.get(id).cloned()).flatten()
    }

    fn find_parent_node(&self, id: &NodeAggregateId) -> Option<Node> {
        self.with_tree(|tree| {
            tree.parents
                .get(id)
                .and_then(|parent_id| tree.nodes.get(parent_id))
                .cloned()
        })
        .flatten()
    }

    fn find_child_nodes(
        &self,
        parent_id: &NodeAggregateId,
        filter: Option<&NodeTypeFilter>,
    ) -> Vec<Node> {
        self.with_tree(|tree| {
            tree.children
                .get(parent_id)
                .map(|child_ids| {
                    child_ids
                        .iter()
                        .filter_map(|child_id| tree.nodes.get(child_id))
                        .filter(|node| {
                            filter.map_or(true, |filter| filter.matches(&node.node_type_name))
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    fn find_ancestor_nodes(
        &self,
        id: &NodeAggregateId,
        filter: Option<&NodeTypeFilter>,
    ) -> Vec<Node> {
        self.with_tree(|tree| {
            let mut ancestors = Vec::new();
            let mut current = id.clone();
            while let Some(parent_id) = tree.parents.get(&current) {
                if let Some(parent) = tree.nodes.get(parent_id) {
                    if filter.map_or(true, |filter| filter.matches(&parent.node_type_name)) {
                        ancestors.push(parent.clone());
                    }
                }
                current = parent_id.clone();
            }
            ancestors
        })
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> WorkspaceName {
        WorkspaceName::new("live")
    }

    fn dimension() -> DimensionSpacePoint {
        DimensionSpacePoint::new([("language", "en")])
    }

    fn node(id: &str, type_name: &str) -> Node {
        Node::new(
            NodeAggregateId::new(id),
            NodeTypeName::new(type_name),
            id.to_string(),
            workspace(),
            dimension(),
        )
    }

    #[test]
    fn insert_and_find_roundtrip() {
        let graph = MemoryContentGraph::new();
        graph.insert_node(None, node("root", "Vendor.Site:Site"));

        let subgraph = graph.subgraph(&workspace(), &dimension());
        let found = subgraph
            .find_node_by_id(&NodeAggregateId::new("root"))
            .expect("inserted node resolves");
        assert_eq!(found.name, "root");

        assert!(
            subgraph
                .find_node_by_id(&NodeAggregateId::new("missing"))
                .is_none()
        );
    }

    #[test]
    fn aggregate_covers_every_dimension_it_exists_in() {
        let graph = MemoryContentGraph::new();
        let en = node("n1", "Vendor.Site:Article");
        let mut fr = node("n1", "Vendor.Site:Article");
        fr.dimension_space_point = DimensionSpacePoint::new([("language", "fr")]);
        graph.insert_node(None, en);
        graph.insert_node(None, fr);

        let aggregate = graph
            .find_node_aggregate_by_id(&workspace(), &NodeAggregateId::new("n1"))
            .expect("aggregate resolves");

        assert_eq!(aggregate.covered_dimension_space_points.len(), 2);
        assert_eq!(
            aggregate.node_type_name,
            NodeTypeName::new("Vendor.Site:Article")
        );
    }

    #[test]
    fn removed_aggregate_no_longer_resolves() {
        let graph = MemoryContentGraph::new();
        graph.insert_node(None, node("root", "Vendor.Site:Site"));
        graph.insert_node(
            Some(&NodeAggregateId::new("root")),
            node("child", "Vendor.Site:Article"),
        );

        graph.remove_node_aggregate(&workspace(), &NodeAggregateId::new("child"));

        assert!(
            graph
                .find_node_aggregate_by_id(&workspace(), &NodeAggregateId::new("child"))
                .is_none()
        );
        let subgraph = graph.subgraph(&workspace(), &dimension());
        assert!(
            subgraph
                .find_child_nodes(&NodeAggregateId::new("root"), None)
                .is_empty()
        );
    }

    #[test]
    fn children_keep_insertion_order_and_filter_by_type() {
        let graph = MemoryContentGraph::new();
        let root_id = NodeAggregateId::new("root");
        graph.insert_node(None, node("root", "Vendor.Site:Site"));
        graph.insert_node(Some(&root_id), node("a", "Vendor.Site:Article"));
        graph.insert_node(Some(&root_id), node("p", "Vendor.Site:Page"));
        graph.insert_node(Some(&root_id), node("b", "Vendor.Site:Article"));

        let subgraph = graph.subgraph(&workspace(), &dimension());

        let all = subgraph.find_child_nodes(&root_id, None);
        assert_eq!(
            all.iter().map(|n| n.aggregate_id.as_str()).collect::<Vec<_>>(),
            vec!["a", "p", "b"]
        );

        let filter = NodeTypeFilter::of([NodeTypeName::new("Vendor.Site:Article")]);
        let articles = subgraph.find_child_nodes(&root_id, Some(&filter));
        assert_eq!(
            articles
                .iter()
                .map(|n| n.aggregate_id.as_str())
                .collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn ancestors_walk_nearest_first_with_filter() {
        let graph = MemoryContentGraph::new();
        graph.insert_node(None, node("site", "Vendor.Site:Site"));
        graph.insert_node(
            Some(&NodeAggregateId::new("site")),
            node("section", "Vendor.Site:Page"),
        );
        graph.insert_node(
            Some(&NodeAggregateId::new("section")),
            node("leaf", "Vendor.Site:Article"),
        );

        let subgraph = graph.subgraph(&workspace(), &dimension());

        let ancestors = subgraph.find_ancestor_nodes(&NodeAggregateId::new("leaf"), None);
        assert_eq!(
            ancestors
                .iter()
                .map(|n| n.aggregate_id.as_str())
                .collect::<Vec<_>>(),
            vec!["section", "site"]
        );

        let filter = NodeTypeFilter::of([NodeTypeName::new("Vendor.Site:Site")]);
        let sites = subgraph.find_ancestor_nodes(&NodeAggregateId::new("leaf"), Some(&filter));
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].aggregate_id.as_str(), "site");
    }
}
