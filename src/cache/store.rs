//! Tagged cache storage.
//!
//! [`TagCache`] is the invalidation contract the flush hook drives;
//! [`MemoryTagCache`] is the bounded in-memory implementation backing data
//! source responses.

use std::collections::BTreeSet;
use std::sync::RwLock;

use bytes::Bytes;
use lru::LruCache;
use tracing::debug;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};
use super::tags::CacheTag;

const SOURCE: &str = "cache::store";

/// Invalidation primitives of a tagged key-value store.
pub trait TagCache: Send + Sync {
    /// Evict every entry tagged with `tag`, returning how many were evicted.
    fn flush_by_tag(&self, tag: &CacheTag) -> usize;

    /// Evict every entry unconditionally.
    fn flush(&self);
}

/// A cached payload together with the tags that invalidate it.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedEntry {
    pub body: Bytes,
    pub tags: BTreeSet<CacheTag>,
}

/// Bounded in-memory tagged cache with LRU eviction.
pub struct MemoryTagCache {
    entries: RwLock<LruCache<String, TaggedEntry>>,
}

impl MemoryTagCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.entry_limit_non_zero())),
        }
    }

    pub fn get(&self, key: &str) -> Option<TaggedEntry> {
        rw_write(&self.entries, SOURCE, "get").get(key).cloned()
    }

    pub fn put(
        &self,
        key: impl Into<String>,
        body: Bytes,
        tags: impl IntoIterator<Item = CacheTag>,
    ) {
        let entry = TaggedEntry {
            body,
            tags: tags.into_iter().collect(),
        };
        rw_write(&self.entries, SOURCE, "put").put(key.into(), entry);
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TagCache for MemoryTagCache {
    fn flush_by_tag(&self, tag: &CacheTag) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "flush_by_tag");
        let tagged: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.tags.contains(tag))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &tagged {
            entries.pop(key);
        }
        tagged.len()
    }

    fn flush(&self) {
        let mut entries = rw_write(&self.entries, SOURCE, "flush");
        let evicted = entries.len();
        entries.clear();
        debug!(evicted, "flushed entire cache");
    }
}
