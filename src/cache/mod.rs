//! Selva cache subsystem.
//!
//! Derives invalidation tags from the node type taxonomy and flushes the
//! tagged data source cache in reaction to content-tree mutation commands:
//!
//! - [`TagDeriver`] expands node types (abstract ones through their declared
//!   subtypes) into canonical cache tags, scoped by workspace and dimension
//!   context
//! - [`FlushCacheHook`] plugs into the host's command pipeline and maps
//!   affected node aggregates to tag flushes
//! - [`MemoryTagCache`] is the bounded in-memory [`TagCache`] implementation
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! entry_limit = 500
//! context_invariant_types = ["Sitegeist.Taxonomy:Taxonomy"]
//! ```

mod config;
mod hook;
pub(crate) mod lock;
mod store;
mod tags;

pub use config::CacheConfig;
pub use hook::FlushCacheHook;
pub use store::{MemoryTagCache, TagCache, TaggedEntry};
pub use tags::{CacheTag, TagContext, TagDeriver, sanitize_tag};
