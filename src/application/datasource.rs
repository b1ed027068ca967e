//! Select-options data source.
//!
//! Builds the flat option list backing select editors: descendants of a root
//! node matching the requested types, tree-position ordered, optionally
//! grouped under parent nodes of a grouping type.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::application::ordering::{SortDirection, sort_by_tree_position};
use crate::application::repos::{ContentSubgraph, NodeTypeFilter, NodeTypeRegistry};
use crate::domain::node_types::NodeTypeName;
use crate::domain::nodes::{Node, NodeAggregateId};

/// One entry of a select data source response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: NodeAggregateId,
    pub label: String,
    pub group: Option<String>,
    pub icon: Option<String>,
}

/// Query arguments for [`NodeDataSource::options`].
#[derive(Clone, Debug, Default)]
pub struct SelectOptionsQuery {
    /// Requested node types; abstract names expand through the registry.
    pub node_types: Vec<NodeTypeName>,
    /// Group matching nodes under enumerated parents of this type.
    pub group_by: Option<NodeTypeName>,
    /// Property to read labels from, falling back to the node name.
    pub label_property: Option<String>,
    /// Explicit root aggregate; otherwise the nearest site-type ancestor of
    /// the current node is used.
    pub starting_point: Option<NodeAggregateId>,
}

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("no node found for starting point `{0}`")]
    StartingPointNotFound(NodeAggregateId),
    #[error("could not determine site node from current node upward")]
    SiteNotResolved,
}

/// Builds select options from the content tree.
pub struct NodeDataSource {
    registry: Arc<dyn NodeTypeRegistry>,
    site_type: NodeTypeName,
}

impl NodeDataSource {
    pub fn new(registry: Arc<dyn NodeTypeRegistry>, site_type: NodeTypeName) -> Self {
        Self {
            registry,
            site_type,
        }
    }

    /// Build the option list for `query`, resolved from `current`'s subgraph.
    ///
    /// An empty type list yields an empty result.
    pub fn options(
        &self,
        subgraph: &dyn ContentSubgraph,
        current: &Node,
        query: &SelectOptionsQuery,
    ) -> Result<Vec<SelectOption>, DataSourceError> {
        if query.node_types.is_empty() {
            return Ok(Vec::new());
        }

        let root = self.resolve_root(subgraph, current, query)?;
        let filter = NodeTypeFilter::of(self.expand_concrete(&query.node_types));

        let options = if let Some(group_type) = &query.group_by {
            let group_filter =
                NodeTypeFilter::of(self.expand_concrete(std::slice::from_ref(group_type)));
            let mut parents = descendants(subgraph, &root.aggregate_id, &group_filter);
            sort_by_tree_position(subgraph, &mut parents, SortDirection::Ascending);

            let mut merged = Vec::new();
            for parent in &parents {
                let group_label = self.node_label(parent, query);
                merged.extend(self.collect(subgraph, parent, &filter, query, Some(&group_label)));
            }
            merged
        } else {
            self.collect(subgraph, &root, &filter, query, None)
        };

        debug!(
            workspace = %subgraph.workspace_name(),
            dimensions = %subgraph.dimension_space_point(),
            root = %root.aggregate_id,
            options = options.len(),
            "built select data source"
        );

        Ok(options)
    }

    fn resolve_root(
        &self,
        subgraph: &dyn ContentSubgraph,
        current: &Node,
        query: &SelectOptionsQuery,
    ) -> Result<Node, DataSourceError> {
        match &query.starting_point {
            Some(id) => subgraph
                .find_node_by_id(id)
                .ok_or_else(|| DataSourceError::StartingPointNotFound(id.clone())),
            None => {
                let filter = NodeTypeFilter::of([self.site_type.clone()]);
                subgraph
                    .find_ancestor_nodes(&current.aggregate_id, Some(&filter))
                    .into_iter()
                    .next()
                    .ok_or(DataSourceError::SiteNotResolved)
            }
        }
    }

    fn collect(
        &self,
        subgraph: &dyn ContentSubgraph,
        parent: &Node,
        filter: &NodeTypeFilter,
        query: &SelectOptionsQuery,
        group: Option<&str>,
    ) -> Vec<SelectOption> {
        let mut nodes = descendants(subgraph, &parent.aggregate_id, filter);
        sort_by_tree_position(subgraph, &mut nodes, SortDirection::Ascending);

        nodes
            .iter()
            .map(|node| SelectOption {
                value: node.aggregate_id.clone(),
                label: self.node_label(node, query),
                group: group.map(str::to_string),
                icon: self
                    .registry
                    .get_node_type(&node.node_type_name)
                    .and_then(|node_type| node_type.icon),
            })
            .collect()
    }

    fn node_label(&self, node: &Node, query: &SelectOptionsQuery) -> String {
        query
            .label_property
            .as_deref()
            .and_then(|property| node.string_property(property))
            .unwrap_or(&node.name)
            .to_string()
    }

    /// Expand requested type names to the concrete names the graph filter
    /// understands. Unregistered names are skipped.
    fn expand_concrete(&self, names: &[NodeTypeName]) -> BTreeSet<NodeTypeName> {
        let mut concrete = BTreeSet::new();
        for name in names {
            self.expand_into(name, &mut concrete);
        }
        concrete
    }

    fn expand_into(&self, name: &NodeTypeName, out: &mut BTreeSet<NodeTypeName>) {
        let Some(node_type) = self.registry.get_node_type(name) else {
            debug!(node_type = %name, "requested node type is not registered");
            return;
        };

        if node_type.is_abstract {
            for candidate in self.registry.node_types() {
                if candidate.declares_supertype(&node_type.name) {
                    self.expand_into(&candidate.name, out);
                }
            }
        } else {
            out.insert(node_type.name);
        }
    }
}

/// All descendants of `root` matching `filter`. Enumeration order is
/// irrelevant here; callers establish order with the tree-position sort.
fn descendants(
    subgraph: &dyn ContentSubgraph,
    root: &NodeAggregateId,
    filter: &NodeTypeFilter,
) -> Vec<Node> {
    let mut matched = Vec::new();
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(parent_id) = queue.pop_front() {
        for child in subgraph.find_child_nodes(&parent_id, None) {
            queue.push_back(child.aggregate_id.clone());
            if filter.matches(&child.node_type_name) {
                matched.push(child);
            }
        }
    }

    matched
}
