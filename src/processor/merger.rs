use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::processor::{PartialAggregate, Stats};

/// Run-wide aggregate shared by every chunk task.
///
/// The map is sharded; merging a key takes the write lock of that key's shard
/// for the single update only, so tasks folding disjoint keys rarely contend.
#[derive(Debug)]
pub struct GlobalAggregate<'a> {
    map: DashMap<&'a [u8], Stats, FxBuildHasher>,
    chunks: AtomicUsize,
    records: AtomicU64,
    skipped: AtomicU64,
}

impl<'a> GlobalAggregate<'a> {
    pub fn new() -> Self {
        GlobalAggregate {
            map: DashMap::with_capacity_and_hasher(1024, FxBuildHasher),
            chunks: AtomicUsize::new(0),
            records: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    /// Folds one chunk's partial aggregate in. Safe to call concurrently.
    pub fn merge(&self, partial: PartialAggregate<'a>) {
        for (key, stats) in partial.stats {
            self.map
                .entry(key)
                .and_modify(|existing| existing.merge(&stats))
                .or_insert(stats);
        }
        self.records.fetch_add(partial.records, Ordering::Relaxed);
        self.skipped.fetch_add(partial.skipped, Ordering::Relaxed);
        self.chunks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, key: &[u8]) -> Option<Stats> {
        self.map.get(key).map(|entry| *entry.value())
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of partial aggregates merged so far
    pub fn chunks(&self) -> usize {
        self.chunks.load(Ordering::Relaxed)
    }

    pub fn records(&self) -> u64 {
        self.records.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Consumes the aggregate, returning entries in ascending byte order of key
    pub fn into_sorted(self) -> Vec<(&'a [u8], Stats)> {
        let mut entries: Vec<(&'a [u8], Stats)> = self.map.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for GlobalAggregate<'_> {
    fn default() -> Self {
        Self::new()
    }
}
