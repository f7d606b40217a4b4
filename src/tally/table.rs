//! Concurrent word count table shared by all workers of one run

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Concurrent mapping from normalized word to occurrence count.
///
/// Increments of one word are serialized by the lock of the `DashMap` shard
/// holding it. The seal flag is read while that lock is held, so once
/// `seal` returns no increment can land behind a snapshot.
#[derive(Debug, Default)]
pub struct WordTable {
    counts: DashMap<String, u64>,
    sealed: AtomicBool,
}

impl WordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `word`, inserting it at 1 when absent.
    ///
    /// Returns `false` when the table is sealed and the increment was refused.
    pub fn increment(&self, word: &str) -> bool {
        if let Some(mut count) = self.counts.get_mut(word) {
            if self.is_sealed() {
                return false;
            }
            *count += 1;
            return true;
        }

        let entry = self.counts.entry(word.to_owned());
        if self.is_sealed() {
            return false;
        }
        *entry.or_insert(0) += 1;
        true
    }

    /// Refuse all further increments
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::SeqCst);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }

    /// Copy every entry into an owned map
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
