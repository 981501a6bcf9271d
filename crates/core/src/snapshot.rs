//! In-memory record of the last-mirrored state.

use std::collections::{HashMap, HashSet};

use crate::hash::ContentHash;

/// Mapping from top-level source filename to the content hash observed on
/// the most recent pass.
///
/// Lives only as long as the process. A fresh run starts empty, so the
/// first pass reports every source file as created. After a completed pass
/// the key set equals the source directory's filename set at the start of
/// that pass.
#[derive(Debug, Default)]
pub struct Snapshot {
    files: HashMap<String, ContentHash>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash recorded for `name`, if the file is tracked.
    pub fn hash_of(&self, name: &str) -> Option<ContentHash> {
        self.files.get(name).copied()
    }

    /// Record (or replace) the hash for `name`.
    pub fn insert(&mut self, name: String, hash: ContentHash) {
        self.files.insert(name, hash);
    }

    /// Stop tracking `name`.
    pub fn remove(&mut self, name: &str) {
        self.files.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Tracked names missing from `current`, sorted for a stable
    /// deletion order.
    pub fn stale_names(&self, current: &HashSet<String>) -> Vec<String> {
        let mut stale: Vec<String> = self
            .files
            .keys()
            .filter(|name| !current.contains(name.as_str()))
            .cloned()
            .collect();
        stale.sort();
        stale
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
