use std::collections::HashMap;
use std::sync::RwLock;

/// Process-scoped id → source-URL store.
///
/// Written by the catalog pass and read back by detail/stream resolution so
/// lookups do not have to re-crawl a listing to find the page an id came
/// from. A miss is never fatal; callers fall back to deterministic URL
/// reconstruction from the id's slug. Kept behind a trait so a bounded or
/// persisted implementation can be swapped in without touching resolver
/// logic.
pub trait UrlStore: Send + Sync {
    /// Record the source URL an id was derived from. Last write wins.
    fn put(&self, id: &str, url: &str);

    /// Look up the source URL for an id, if one was ever recorded.
    fn get(&self, id: &str) -> Option<String>;
}

/// In-memory implementation: no expiry, no size bound, lives for the
/// process's lifetime. Concurrent reads do not block each other.
#[derive(Debug, Default)]
pub struct MemoryUrlCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryUrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UrlStore for MemoryUrlCache {
    fn put(&self, id: &str, url: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(id.to_string(), url.to_string());
    }

    fn get(&self, id: &str) -> Option<String> {
        self.entries.read().unwrap().get(id).cloned()
    }
}
