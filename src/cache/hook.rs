//! Command-driven cache flushing.
//!
//! [`FlushCacheHook`] watches the host's command pipeline. Discards flush
//! against the pre-command graph state (a node being discarded still resolves
//! there); publishes and edits flush against the post-command state (a newly
//! published node only resolves there). Using the wrong state would silently
//! skip invalidation.

use std::collections::BTreeSet;
use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use crate::application::hooks::CommandHook;
use crate::application::repos::{ContentGraph, NodeTypeRegistry};
use crate::cache::config::CacheConfig;
use crate::cache::store::TagCache;
use crate::cache::tags::{CacheTag, TagContext, TagDeriver};
use crate::domain::commands::Command;
use crate::domain::events::PublishedEvent;
use crate::domain::nodes::{NodeAggregateId, WorkspaceName};

const METRIC_FLUSHED_ENTRIES: &str = "selva_cache_flushed_entries";
const METRIC_FULL_FLUSHES: &str = "selva_cache_full_flushes";

/// Flushes tagged cache entries for the node aggregates a command affects.
pub struct FlushCacheHook {
    config: CacheConfig,
    graph: Arc<dyn ContentGraph>,
    deriver: TagDeriver,
    cache: Arc<dyn TagCache>,
}

impl FlushCacheHook {
    pub fn new(
        config: CacheConfig,
        graph: Arc<dyn ContentGraph>,
        registry: Arc<dyn NodeTypeRegistry>,
        cache: Arc<dyn TagCache>,
    ) -> Self {
        let deriver = TagDeriver::new(registry, &config);
        Self {
            config,
            graph,
            deriver,
            cache,
        }
    }

    /// Flush the tags of every materialization of `id` as currently resolvable
    /// in `workspace_name`. A missing aggregate is a benign no-op.
    fn flush_for_node_aggregate(&self, workspace_name: &WorkspaceName, id: &NodeAggregateId) {
        let Some(aggregate) = self.graph.find_node_aggregate_by_id(workspace_name, id) else {
            debug!(
                node_aggregate = %id,
                workspace = %workspace_name,
                "node aggregate not found (before removal/discard)"
            );
            return;
        };

        for dimension_space_point in &aggregate.covered_dimension_space_points {
            let subgraph = self.graph.subgraph(workspace_name, dimension_space_point);
            let Some(node) = subgraph.find_node_by_id(id) else {
                continue;
            };

            let context = TagContext::for_node(&node);
            let tags = self.deriver.tags_for_name(&node.node_type_name, Some(&context));
            self.flush_tags(&tags);
        }
    }

    fn flush_tags(&self, tags: &BTreeSet<CacheTag>) {
        for tag in tags {
            let flushed = self.cache.flush_by_tag(tag);
            counter!(METRIC_FLUSHED_ENTRIES).increment(flushed as u64);
            if flushed > 0 {
                debug!(flushed, tag = %tag, "flushed cache entries by tag");
            }
        }
    }
}

impl CommandHook for FlushCacheHook {
    fn on_before_handle(&self, command: Command) -> Command {
        if !self.config.enabled {
            debug!("cache invalidation skipped: cache disabled");
            return command;
        }

        match &command {
            Command::DiscardIndividualNodes {
                workspace_name,
                node_aggregate_ids,
            } => {
                for id in node_aggregate_ids {
                    self.flush_for_node_aggregate(workspace_name, id);
                }
            }
            Command::DiscardWorkspace { workspace_name } => {
                // A whole-workspace discard can touch an unbounded tag set;
                // wholesale invalidation is cheaper than enumerating it.
                debug!(
                    workspace = %workspace_name,
                    "flushing all cache entries for workspace discard"
                );
                counter!(METRIC_FULL_FLUSHES).increment(1);
                self.cache.flush();
            }
            _ => {}
        }

        command
    }

    fn on_after_handle(&self, command: &Command, events: &[PublishedEvent]) -> Vec<Command> {
        if !self.config.enabled {
            return Vec::new();
        }

        let observed = matches!(
            command,
            Command::PublishWorkspace { .. }
                | Command::PublishIndividualNodes { .. }
                | Command::CreateNodeAggregate { .. }
                | Command::SetNodeProperties { .. }
                | Command::TagSubtree { .. }
        );

        if observed {
            for event in events {
                if let Some(id) = event.node_aggregate_id() {
                    self.flush_for_node_aggregate(command.workspace_name(), id);
                }
            }
        }

        Vec::new()
    }
}
