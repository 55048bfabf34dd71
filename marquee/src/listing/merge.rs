//! Merge policies for appending a fetched page into an item list.
//!
//! The server does not promise that adjacent pages never overlap, so the
//! merge step is a seam: [`AppendMerge`] keeps the raw append behavior,
//! [`DedupMerge`] makes merging idempotent for sources that repeat items.

use std::collections::HashSet;
use std::hash::Hash;

/// Folds a page of incoming items into the accumulated list.
pub trait MergePolicy<T>: Send + Sync {
    fn merge(&self, existing: &mut Vec<T>, incoming: Vec<T>);
}

/// Appends incoming items in order, without looking at them.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppendMerge;

impl<T> MergePolicy<T> for AppendMerge {
    fn merge(&self, existing: &mut Vec<T>, incoming: Vec<T>) {
        existing.extend(incoming);
    }
}

/// Appends only items whose key has not been seen, preserving order.
pub struct DedupMerge<F> {
    key: F,
}

impl<F> DedupMerge<F> {
    /// Deduplicate by the key the extractor derives from each item.
    pub fn by_key(key: F) -> Self {
        Self { key }
    }
}

impl<T, K, F> MergePolicy<T> for DedupMerge<F>
where
    F: Fn(&T) -> K + Send + Sync,
    K: Eq + Hash,
{
    fn merge(&self, existing: &mut Vec<T>, incoming: Vec<T>) {
        let mut seen: HashSet<K> = existing.iter().map(&self.key).collect();
        for item in incoming {
            if seen.insert((self.key)(&item)) {
                existing.push(item);
            }
        }
    }
}
