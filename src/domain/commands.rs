//! Content-repository mutation commands observed by command hooks.

use super::node_types::NodeTypeName;
use super::nodes::{NodeAggregateId, WorkspaceName};

/// The command kinds relevant to cache invalidation. Every variant carries
/// the workspace it targets.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CreateNodeAggregate {
        workspace_name: WorkspaceName,
        node_aggregate_id: NodeAggregateId,
        node_type_name: NodeTypeName,
    },
    SetNodeProperties {
        workspace_name: WorkspaceName,
        node_aggregate_id: NodeAggregateId,
    },
    TagSubtree {
        workspace_name: WorkspaceName,
        node_aggregate_id: NodeAggregateId,
        tag: String,
    },
    PublishWorkspace {
        workspace_name: WorkspaceName,
    },
    PublishIndividualNodes {
        workspace_name: WorkspaceName,
        node_aggregate_ids: Vec<NodeAggregateId>,
    },
    DiscardIndividualNodes {
        workspace_name: WorkspaceName,
        node_aggregate_ids: Vec<NodeAggregateId>,
    },
    DiscardWorkspace {
        workspace_name: WorkspaceName,
    },
}

impl Command {
    /// The workspace this command mutates.
    pub fn workspace_name(&self) -> &WorkspaceName {
        match self {
            Command::CreateNodeAggregate { workspace_name, .. }
            | Command::SetNodeProperties { workspace_name, .. }
            | Command::TagSubtree { workspace_name, .. }
            | Command::PublishWorkspace { workspace_name }
            | Command::PublishIndividualNodes { workspace_name, .. }
            | Command::DiscardIndividualNodes { workspace_name, .. }
            | Command::DiscardWorkspace { workspace_name } => workspace_name,
        }
    }
}
