//! Node type taxonomy as supplied by the host's type registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical name of a node type, e.g. `Vendor.Site:Article`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTypeName(String);

impl NodeTypeName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node type definition.
///
/// The supertype relation must form a DAG; cycles are prevented upstream and
/// not validated here.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeType {
    pub name: NodeTypeName,
    pub is_abstract: bool,
    /// Direct supertype declarations. A `false` value disables an inherited
    /// declaration, so only `true` entries count.
    pub supertypes: BTreeMap<NodeTypeName, bool>,
    /// Icon identifier from the type's UI configuration, if any.
    pub icon: Option<String>,
}

impl NodeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: NodeTypeName::new(name),
            is_abstract: false,
            supertypes: BTreeMap::new(),
            icon: None,
        }
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self {
            is_abstract: true,
            ..Self::new(name)
        }
    }

    pub fn with_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.insert(NodeTypeName::new(name), true);
        self
    }

    pub fn with_disabled_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.insert(NodeTypeName::new(name), false);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Whether this type directly declares `name` as an enabled supertype.
    pub fn declares_supertype(&self, name: &NodeTypeName) -> bool {
        self.supertypes.get(name).copied().unwrap_or(false)
    }
}
