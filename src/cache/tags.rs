//! Cache tag derivation.
//!
//! Derives the invalidation tags covering a node type, optionally scoped to a
//! workspace and dimension context:
//!
//! - abstract types expand to the registered types declaring them as a
//!   supertype
//! - context-invariant types omit the workspace fingerprint
//! - type names are sanitized to the tag-safe character set

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::application::repos::NodeTypeRegistry;
use crate::cache::config::CacheConfig;
use crate::domain::dimensions::DimensionSpacePoint;
use crate::domain::node_types::{NodeType, NodeTypeName};
use crate::domain::nodes::{Node, WorkspaceName};

const TAG_PREFIX: &str = "NodeType_";
const FINGERPRINT_BYTES: usize = 16;

/// An invalidation key covering every cached artifact that depends on one
/// (type, workspace, dimension) combination. Computed per request, never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheTag(String);

impl CacheTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workspace and dimension scope for tag derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct TagContext {
    pub workspace_name: WorkspaceName,
    pub dimension_space_point: DimensionSpacePoint,
}

impl TagContext {
    pub fn new(workspace_name: WorkspaceName, dimension_space_point: DimensionSpacePoint) -> Self {
        Self {
            workspace_name,
            dimension_space_point,
        }
    }

    /// The context a node resolves in.
    pub fn for_node(node: &Node) -> Self {
        Self::new(
            node.workspace_name.clone(),
            node.dimension_space_point.clone(),
        )
    }
}

/// Derives cache tags from node types through the host's type registry.
///
/// Derivation is pure: every call returns a fresh set, and recursive
/// expansion unions sub-results instead of appending to shared state.
pub struct TagDeriver {
    registry: Arc<dyn NodeTypeRegistry>,
    context_invariant_types: BTreeSet<NodeTypeName>,
}

impl TagDeriver {
    pub fn new(registry: Arc<dyn NodeTypeRegistry>, config: &CacheConfig) -> Self {
        Self {
            registry,
            context_invariant_types: config.context_invariant_types.iter().cloned().collect(),
        }
    }

    /// Tags for a collection of type names: the union of the per-type
    /// derivations, duplicates collapsed.
    pub fn node_type_tags<'a>(
        &self,
        names: impl IntoIterator<Item = &'a NodeTypeName>,
        context: Option<&TagContext>,
    ) -> BTreeSet<CacheTag> {
        let mut tags = BTreeSet::new();
        for name in names {
            tags.extend(self.tags_for_name(name, context));
        }
        tags
    }

    /// Tags for a single type name. An unregistered name yields no tags.
    pub fn tags_for_name(
        &self,
        name: &NodeTypeName,
        context: Option<&TagContext>,
    ) -> BTreeSet<CacheTag> {
        match self.registry.get_node_type(name) {
            Some(node_type) => self.tags_for_type(&node_type, context),
            None => {
                debug!(node_type = %name, "node type not registered, deriving no tags");
                BTreeSet::new()
            }
        }
    }

    fn tags_for_type(
        &self,
        node_type: &NodeType,
        context: Option<&TagContext>,
    ) -> BTreeSet<CacheTag> {
        if node_type.is_abstract {
            return self.expand_abstract(node_type, context);
        }

        let mut tags = BTreeSet::new();
        if let Some(tag) = self.concrete_tag(node_type, context) {
            tags.insert(tag);
        }
        tags
    }

    /// Union of the derivations of every registered type directly declaring
    /// `node_type` as a supertype. No qualifying subtypes, no tags.
    fn expand_abstract(
        &self,
        node_type: &NodeType,
        context: Option<&TagContext>,
    ) -> BTreeSet<CacheTag> {
        let mut tags = BTreeSet::new();
        let mut subtype_names = Vec::new();

        for candidate in self.registry.node_types() {
            if candidate.declares_supertype(&node_type.name) {
                subtype_names.push(candidate.name.clone());
                tags.extend(self.tags_for_type(&candidate, context));
            }
        }

        debug!(
            node_type = %node_type.name,
            subtypes = ?subtype_names,
            "expanded abstract node type"
        );
        tags
    }

    fn concrete_tag(&self, node_type: &NodeType, context: Option<&TagContext>) -> Option<CacheTag> {
        let type_name = node_type.name.as_str();
        if type_name.is_empty() {
            return None;
        }

        let mut workspace_segment = String::new();
        let mut dimension_segment = String::new();
        if let Some(context) = context {
            if !self.context_invariant_types.contains(&node_type.name) {
                workspace_segment = fingerprint_segment(context.workspace_name.as_str());
            }
            dimension_segment = fingerprint_segment(&context.dimension_space_point.to_json());
        }

        Some(CacheTag(format!(
            "{TAG_PREFIX}{workspace_segment}{dimension_segment}{}",
            sanitize_tag(type_name)
        )))
    }
}

/// Replace structural separators with tag-safe characters: `.` becomes `_`,
/// `:` becomes `-`. All other characters pass through unchanged.
pub fn sanitize_tag(tag: &str) -> String {
    tag.chars()
        .map(|c| match c {
            '.' => '_',
            ':' => '-',
            other => other,
        })
        .collect()
}

/// `%<hash>%_` fingerprint segment over a canonical input string.
fn fingerprint_segment(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    format!("%{}%_", hex::encode(&digest[..FINGERPRINT_BYTES]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infra::memory::MemoryNodeTypeRegistry;

    fn deriver(registry: MemoryNodeTypeRegistry) -> TagDeriver {
        TagDeriver::new(Arc::new(registry), &CacheConfig::default())
    }

    fn context() -> TagContext {
        TagContext::new(
            WorkspaceName::new("review"),
            DimensionSpacePoint::new([("language", "en")]),
        )
    }

    #[test]
    fn sanitize_maps_separators_and_is_idempotent() {
        assert_eq!(sanitize_tag("Vendor.Site:Article"), "Vendor_Site-Article");
        assert_eq!(
            sanitize_tag(&sanitize_tag("Vendor.Site:Article")),
            sanitize_tag("Vendor.Site:Article")
        );
        assert_eq!(sanitize_tag("plain"), "plain");
    }

    #[test]
    fn context_free_concrete_type_yields_plain_tag() {
        let registry =
            MemoryNodeTypeRegistry::new().with_type(NodeType::new("Vendor.Site:Article"));
        let tags = deriver(registry).tags_for_name(&NodeTypeName::new("Vendor.Site:Article"), None);

        assert_eq!(
            tags.iter().map(CacheTag::as_str).collect::<Vec<_>>(),
            vec!["NodeType_Vendor_Site-Article"]
        );
    }

    #[test]
    fn contextual_tag_is_deterministic() {
        let registry =
            MemoryNodeTypeRegistry::new().with_type(NodeType::new("Vendor.Site:Article"));
        let deriver = deriver(registry);
        let name = NodeTypeName::new("Vendor.Site:Article");

        let first = deriver.tags_for_name(&name, Some(&context()));
        let second = deriver.tags_for_name(&name, Some(&context()));

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn contextual_tag_carries_workspace_and_dimension_segments() {
        let registry =
            MemoryNodeTypeRegistry::new().with_type(NodeType::new("Vendor.Site:Article"));
        let tags =
            deriver(registry).tags_for_name(&NodeTypeName::new("Vendor.Site:Article"), Some(&context()));

        let tag = tags.iter().next().expect("one tag").as_str();
        assert!(tag.starts_with("NodeType_%"));
        assert!(tag.ends_with("Vendor_Site-Article"));
        // Two fingerprint segments: workspace and dimension.
        assert_eq!(tag.matches('%').count(), 4);
    }

    #[test]
    fn distinct_contexts_yield_distinct_tags() {
        let registry =
            MemoryNodeTypeRegistry::new().with_type(NodeType::new("Vendor.Site:Article"));
        let deriver = deriver(registry);
        let name = NodeTypeName::new("Vendor.Site:Article");

        let en = deriver.tags_for_name(&name, Some(&context()));
        let fr = deriver.tags_for_name(
            &name,
            Some(&TagContext::new(
                WorkspaceName::new("review"),
                DimensionSpacePoint::new([("language", "fr")]),
            )),
        );

        assert_ne!(en, fr);
    }

    #[test]
    fn context_invariant_type_omits_workspace_segment() {
        let registry = MemoryNodeTypeRegistry::new()
            .with_type(NodeType::new("Sitegeist.Taxonomy:Taxonomy"))
            .with_type(NodeType::new("Vendor.Site:Article"));
        let deriver = deriver(registry);

        let taxonomy_tags =
            deriver.tags_for_name(&NodeTypeName::new("Sitegeist.Taxonomy:Taxonomy"), Some(&context()));
        let article_tags =
            deriver.tags_for_name(&NodeTypeName::new("Vendor.Site:Article"), Some(&context()));

        let taxonomy = taxonomy_tags.iter().next().expect("one tag").as_str();
        let article = article_tags.iter().next().expect("one tag").as_str();

        // One fingerprint segment (dimension only) versus two.
        assert_eq!(taxonomy.matches('%').count(), 2);
        assert_eq!(article.matches('%').count(), 4);

        // Same workspace-invariant tag from any workspace.
        let other_workspace = deriver.tags_for_name(
            &NodeTypeName::new("Sitegeist.Taxonomy:Taxonomy"),
            Some(&TagContext::new(
                WorkspaceName::new("live"),
                DimensionSpacePoint::new([("language", "en")]),
            )),
        );
        assert_eq!(taxonomy_tags, other_workspace);
    }

    #[test]
    fn abstract_type_expands_to_declared_subtypes() {
        let registry = MemoryNodeTypeRegistry::new()
            .with_type(NodeType::abstract_type("Vendor.Site:Listable"))
            .with_type(NodeType::new("Vendor.Site:Article").with_supertype("Vendor.Site:Listable"))
            .with_type(NodeType::new("Vendor.Site:Event").with_supertype("Vendor.Site:Listable"))
            .with_type(NodeType::new("Vendor.Site:Page"));
        let tags = deriver(registry).tags_for_name(&NodeTypeName::new("Vendor.Site:Listable"), None);

        assert_eq!(
            tags.iter().map(CacheTag::as_str).collect::<Vec<_>>(),
            vec![
                "NodeType_Vendor_Site-Article",
                "NodeType_Vendor_Site-Event"
            ]
        );
    }

    #[test]
    fn abstract_expansion_crosses_abstract_subtypes() {
        let registry = MemoryNodeTypeRegistry::new()
            .with_type(NodeType::abstract_type("Vendor.Site:Content"))
            .with_type(
                NodeType::abstract_type("Vendor.Site:Listable")
                    .with_supertype("Vendor.Site:Content"),
            )
            .with_type(NodeType::new("Vendor.Site:Article").with_supertype("Vendor.Site:Listable"));
        let tags = deriver(registry).tags_for_name(&NodeTypeName::new("Vendor.Site:Content"), None);

        assert_eq!(
            tags.iter().map(CacheTag::as_str).collect::<Vec<_>>(),
            vec!["NodeType_Vendor_Site-Article"]
        );
    }

    #[test]
    fn abstract_type_without_subtypes_contributes_nothing() {
        let registry = MemoryNodeTypeRegistry::new()
            .with_type(NodeType::abstract_type("Vendor.Site:Listable"))
            .with_type(
                NodeType::new("Vendor.Site:Special")
                    .with_disabled_supertype("Vendor.Site:Listable"),
            );
        let tags = deriver(registry).tags_for_name(&NodeTypeName::new("Vendor.Site:Listable"), None);

        assert!(tags.is_empty());
    }

    #[test]
    fn unregistered_type_contributes_nothing() {
        let registry = MemoryNodeTypeRegistry::new();
        let tags = deriver(registry).tags_for_name(&NodeTypeName::new("Vendor.Site:Gone"), None);

        assert!(tags.is_empty());
    }

    #[test]
    fn empty_type_name_contributes_nothing() {
        let registry = MemoryNodeTypeRegistry::new().with_type(NodeType::new(""));
        let tags = deriver(registry).tags_for_name(&NodeTypeName::new(""), None);

        assert!(tags.is_empty());
    }

    #[test]
    fn collection_input_unions_and_deduplicates() {
        let registry = MemoryNodeTypeRegistry::new()
            .with_type(NodeType::abstract_type("Vendor.Site:Listable"))
            .with_type(NodeType::new("Vendor.Site:Article").with_supertype("Vendor.Site:Listable"));
        let deriver = deriver(registry);

        let names = [
            NodeTypeName::new("Vendor.Site:Article"),
            NodeTypeName::new("Vendor.Site:Listable"),
        ];
        let tags = deriver.node_type_tags(names.iter(), None);

        assert_eq!(
            tags.iter().map(CacheTag::as_str).collect::<Vec<_>>(),
            vec!["NodeType_Vendor_Site-Article"]
        );
    }
}
