// Ingredient vocabulary: a prefix tree of known names behind a shared service

pub mod canonical;
pub mod trie;

pub use canonical::{canonicalize, title_case};
pub use trie::VocabularyIndex;

use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Process-wide vocabulary of ingredient names.
///
/// Readers load the current [`VocabularyIndex`] snapshot without locking.
/// Writers take a single lock, build the next snapshot off to the side and
/// publish it in one atomic store, so a reader only ever sees fully built
/// nodes. Construct one at startup and share it behind an `Arc`.
///
/// Every publication copies the whole index, so a write costs time and memory
/// proportional to the vocabulary size. Load in bulk with
/// [`insert_many`](Self::insert_many), which publishes once per batch; a
/// batch of names that are all known already publishes nothing.
#[derive(Debug)]
pub struct Vocabulary {
    snapshot: ArcSwap<VocabularyIndex>,
    writer: Mutex<()>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(VocabularyIndex::new()),
            writer: Mutex::new(()),
        }
    }

    /// Register one name after canonicalization. Returns `true` if it was new.
    pub fn insert(&self, name: &str) -> bool {
        self.insert_many(std::iter::once(name)) == 1
    }

    /// Register a batch of names under one lock and one publication.
    /// Returns how many of them were new.
    pub fn insert_many<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // The lock guards no data of its own, a poisoned lock is still usable
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.snapshot.load_full();
        let pending: Vec<String> = names
            .into_iter()
            .map(|name| canonicalize(name.as_ref()))
            .filter(|name| !current.contains_exact(name))
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let mut next = (*current).clone();
        let mut added = 0;
        for name in &pending {
            if next.insert(name) {
                added += 1;
            }
        }

        if added > 0 {
            debug!(
                "Publishing vocabulary snapshot: {} new names, {} total",
                added,
                next.len()
            );
            self.snapshot.store(Arc::new(next));
        }

        added
    }

    /// True iff the canonical form of `name` is registered
    pub fn contains_exact(&self, name: &str) -> bool {
        self.snapshot.load().contains_exact(&canonicalize(name))
    }

    /// True iff the canonical form of `name` starts at least one registered name
    pub fn contains_prefix(&self, name: &str) -> bool {
        self.snapshot.load().contains_prefix(&title_case(name.trim_start()))
    }

    /// Registered names starting with `prefix`, at most `limit` of them
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.snapshot
            .load()
            .completions(&title_case(prefix.trim_start()), limit)
    }

    /// Current snapshot, stable for as long as the caller holds it
    pub fn snapshot(&self) -> Arc<VocabularyIndex> {
        self.snapshot.load_full()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
