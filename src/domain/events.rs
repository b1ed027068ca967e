//! Events published by the command pipeline after a command was handled.

use time::OffsetDateTime;
use uuid::Uuid;

use super::node_types::NodeTypeName;
use super::nodes::{NodeAggregateId, WorkspaceName};

/// One event from the published stream of a handled command.
#[derive(Clone, Debug)]
pub struct PublishedEvent {
    /// Unique identifier for idempotency.
    pub id: Uuid,
    /// When the event was recorded.
    pub recorded_at: OffsetDateTime,
    pub kind: EventKind,
}

impl PublishedEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: OffsetDateTime::now_utc(),
            kind,
        }
    }

    /// The node aggregate this event affects, when it names one.
    pub fn node_aggregate_id(&self) -> Option<&NodeAggregateId> {
        self.kind.node_aggregate_id()
    }
}

/// Typed event variants. Workspace-level events carry no aggregate id;
/// consumers use [`EventKind::node_aggregate_id`] instead of probing fields.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    NodeAggregateWithNodeWasCreated {
        node_aggregate_id: NodeAggregateId,
        node_type_name: NodeTypeName,
    },
    NodePropertiesWereSet {
        node_aggregate_id: NodeAggregateId,
    },
    SubtreeWasTagged {
        node_aggregate_id: NodeAggregateId,
        tag: String,
    },
    NodeAggregateWasPublished {
        node_aggregate_id: NodeAggregateId,
    },
    NodeAggregateWasDiscarded {
        node_aggregate_id: NodeAggregateId,
    },
    WorkspaceWasPublished {
        target_workspace_name: WorkspaceName,
    },
    WorkspaceWasRebased {
        workspace_name: WorkspaceName,
    },
}

impl EventKind {
    pub fn node_aggregate_id(&self) -> Option<&NodeAggregateId> {
        match self {
            EventKind::NodeAggregateWithNodeWasCreated {
                node_aggregate_id, ..
            }
            | EventKind::NodePropertiesWereSet { node_aggregate_id }
            | EventKind::SubtreeWasTagged {
                node_aggregate_id, ..
            }
            | EventKind::NodeAggregateWasPublished { node_aggregate_id }
            | EventKind::NodeAggregateWasDiscarded { node_aggregate_id } => {
                Some(node_aggregate_id)
            }
            EventKind::WorkspaceWasPublished { .. } | EventKind::WorkspaceWasRebased { .. } => None,
        }
    }
}
