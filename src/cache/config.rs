//! Cache configuration.

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::domain::node_types::NodeTypeName;

const DEFAULT_ENTRY_LIMIT: usize = 500;
// Taxonomy terms exist identically in every workspace, so their tags carry no
// workspace fingerprint.
const DEFAULT_CONTEXT_INVARIANT_TYPES: &[&str] = &["Sitegeist.Taxonomy:Taxonomy"];

/// Cache configuration, embeddable in the host's layered settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable command-driven cache invalidation.
    pub enabled: bool,
    /// Maximum entries held by the in-memory tag cache.
    pub entry_limit: usize,
    /// Node types whose tags never carry a workspace fingerprint.
    pub context_invariant_types: Vec<NodeTypeName>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entry_limit: DEFAULT_ENTRY_LIMIT,
            context_invariant_types: DEFAULT_CONTEXT_INVARIANT_TYPES
                .iter()
                .map(|name| NodeTypeName::new(*name))
                .collect(),
        }
    }
}

impl CacheConfig {
    /// Returns the entry limit as `NonZeroUsize`, clamping to 1 if zero.
    pub fn entry_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.entry_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
