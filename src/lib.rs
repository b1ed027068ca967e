//! Content-repository select data sources with tag-scoped cache invalidation.
//!
//! Selva is a plugin library for content-repository hosts. It watches the
//! host's command pipeline and flushes exactly the cached data source
//! artifacts a mutation affects, using cache tags derived from the node type
//! taxonomy and scoped by workspace and dimension context. A deterministic
//! tree-position ordering keeps generated select lists stable across calls.
//!
//! The host supplies the content graph, the node type registry, and the
//! command pipeline through the traits in [`application::repos`] and
//! [`application::hooks`]. [`infra::memory`] ships in-memory reference
//! implementations of the graph contracts for embedding and testing.

pub mod application;
pub mod cache;
pub mod domain;
pub mod infra;
