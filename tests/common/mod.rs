//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use selva::domain::dimensions::DimensionSpacePoint;
use selva::domain::node_types::{NodeType, NodeTypeName};
use selva::domain::nodes::{Node, NodeAggregateId, WorkspaceName};
use selva::infra::memory::MemoryNodeTypeRegistry;

/// A small site taxonomy: a site root, groupable categories, an abstract
/// listable mixin with two concrete subtypes, and a workspace-invariant
/// taxonomy type.
pub fn registry() -> MemoryNodeTypeRegistry {
    MemoryNodeTypeRegistry::new()
        .with_type(NodeType::new("Vendor.Site:Site"))
        .with_type(NodeType::new("Vendor.Site:Category").with_icon("icon-folder"))
        .with_type(NodeType::abstract_type("Vendor.Site:Listable"))
        .with_type(
            NodeType::new("Vendor.Site:Article")
                .with_supertype("Vendor.Site:Listable")
                .with_icon("icon-file"),
        )
        .with_type(NodeType::new("Vendor.Site:Event").with_supertype("Vendor.Site:Listable"))
        .with_type(NodeType::new("Sitegeist.Taxonomy:Taxonomy"))
}

pub fn node(
    id: &str,
    type_name: &str,
    workspace_name: &WorkspaceName,
    dimension_space_point: DimensionSpacePoint,
) -> Node {
    Node::new(
        NodeAggregateId::new(id),
        NodeTypeName::new(type_name),
        id.to_string(),
        workspace_name.clone(),
        dimension_space_point,
    )
}

pub fn english() -> DimensionSpacePoint {
    DimensionSpacePoint::new([("language", "en")])
}

pub fn french() -> DimensionSpacePoint {
    DimensionSpacePoint::new([("language", "fr")])
}
