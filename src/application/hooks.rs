//! Command pipeline hook contract.

use crate::domain::commands::Command;
use crate::domain::events::PublishedEvent;

/// Hook invoked by the host's command pipeline around command handling.
pub trait CommandHook: Send + Sync {
    /// Observe a command before it is handled. The command is passed through;
    /// implementations return it unchanged unless they deliberately rewrite
    /// it.
    fn on_before_handle(&self, command: Command) -> Command;

    /// Observe a handled command together with its published events. Returns
    /// follow-up commands for the pipeline to enqueue.
    fn on_after_handle(&self, command: &Command, events: &[PublishedEvent]) -> Vec<Command>;
}
