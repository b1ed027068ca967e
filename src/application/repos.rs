//! Collaborator contracts consumed from the host content repository.
//!
//! The engine never owns graph or taxonomy state; it reads both through the
//! traits here. Hosts with a fallible backend adapt at this boundary, where
//! their own error policy applies.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::dimensions::DimensionSpacePoint;
use crate::domain::node_types::{NodeType, NodeTypeName};
use crate::domain::nodes::{Node, NodeAggregate, NodeAggregateId, WorkspaceName};

/// Exact-name node type filter for child and ancestor enumeration.
///
/// The graph has no registry knowledge: abstract types must be expanded to
/// concrete names before filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeTypeFilter {
    names: BTreeSet<NodeTypeName>,
}

impl NodeTypeFilter {
    pub fn of(names: impl IntoIterator<Item = NodeTypeName>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn matches(&self, name: &NodeTypeName) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Workspace-level view over the content graph.
pub trait ContentGraph: Send + Sync {
    /// Look up a node aggregate by id, or `None` if the workspace does not
    /// contain it.
    fn find_node_aggregate_by_id(
        &self,
        workspace_name: &WorkspaceName,
        id: &NodeAggregateId,
    ) -> Option<NodeAggregate>;

    /// A queryable view scoped to one workspace and dimension coordinate.
    fn subgraph(
        &self,
        workspace_name: &WorkspaceName,
        dimension_space_point: &DimensionSpacePoint,
    ) -> Arc<dyn ContentSubgraph>;
}

/// Dimension-scoped tree navigation, visibility-filtered by the host.
pub trait ContentSubgraph: Send + Sync {
    fn workspace_name(&self) -> &WorkspaceName;

    fn dimension_space_point(&self) -> &DimensionSpacePoint;

    fn find_node_by_id(&self, id: &NodeAggregateId) -> Option<Node>;

    fn find_parent_node(&self, id: &NodeAggregateId) -> Option<Node>;

    /// Ordered child enumeration, optionally restricted by type filter.
    fn find_child_nodes(
        &self,
        parent_id: &NodeAggregateId,
        filter: Option<&NodeTypeFilter>,
    ) -> Vec<Node>;

    /// Ancestors from nearest to most distant, optionally restricted by type
    /// filter.
    fn find_ancestor_nodes(
        &self,
        id: &NodeAggregateId,
        filter: Option<&NodeTypeFilter>,
    ) -> Vec<Node>;
}

/// Taxonomy access supplied by the host's node type registry.
pub trait NodeTypeRegistry: Send + Sync {
    fn get_node_type(&self, name: &NodeTypeName) -> Option<NodeType>;

    fn node_types(&self) -> Vec<NodeType>;
}
