//! Read-only node views over the host's content graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dimensions::DimensionSpacePoint;
use super::node_types::NodeTypeName;

/// Stable identity of a node aggregate, shared by all of its
/// dimension-specific materializations.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAggregateId(String);

impl NodeAggregateId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeAggregateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an isolated content branch.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceName(String);

impl WorkspaceName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One materialization of a node aggregate: the node as it exists in a single
/// workspace and dimension coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub aggregate_id: NodeAggregateId,
    pub node_type_name: NodeTypeName,
    /// The node's name within its parent, used as the label fallback.
    pub name: String,
    pub workspace_name: WorkspaceName,
    pub dimension_space_point: DimensionSpacePoint,
    pub properties: BTreeMap<String, Value>,
}

impl Node {
    pub fn new(
        aggregate_id: NodeAggregateId,
        node_type_name: NodeTypeName,
        name: impl Into<String>,
        workspace_name: WorkspaceName,
        dimension_space_point: DimensionSpacePoint,
    ) -> Self {
        Self {
            aggregate_id,
            node_type_name,
            name: name.into(),
            workspace_name,
            dimension_space_point,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }
}

/// The identity-bearing unit of content: one id, realized per covered
/// dimension coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAggregate {
    pub id: NodeAggregateId,
    pub node_type_name: NodeTypeName,
    pub covered_dimension_space_points: Vec<DimensionSpacePoint>,
}
