use std::fmt;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use thiserror::Error;

pub mod chunk_planner;
pub mod chunk_processor;
pub mod merger;
pub mod orchestrator;
pub mod output;

/// Error type used across the crate
///
/// Only run-aborting conditions live here. A malformed record is never an
/// error: the chunk scanner skips it and counts it in [`PartialAggregate`].
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("cannot read input {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Running min/max/sum/count for one key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Stats {
    /// Tuple for the first observation of a key
    pub fn new(value: f64) -> Self {
        let value = positive_zero(value);
        Stats {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    pub fn add(&mut self, value: f64) {
        let value = positive_zero(value);
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum += value;
        self.count += 1;
    }

    /// Folds another tuple for the same key into this one
    pub fn merge(&mut self, other: &Stats) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Folds `-0.0` into `0.0`. The two compare equal, so without this the
/// rendered sign of a zero extreme would depend on arrival order.
#[inline]
pub(crate) fn positive_zero(value: f64) -> f64 {
    value + 0.0
}

/// Renders `min/mean/max` with one fractional digit each
impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/{:.1}/{:.1}", self.min, self.mean(), self.max)
    }
}

/// Half-open byte interval `[start, end)` of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: usize,
    pub end: usize,
}

impl ChunkRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        ChunkRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Per-chunk result of the scanner
///
/// Keys borrow from the scanned view. Built by one task, handed to the
/// merger by value and dropped there.
#[derive(Debug, Default)]
pub struct PartialAggregate<'a> {
    pub stats: FxHashMap<&'a [u8], Stats>,
    /// Records that updated a key
    pub records: u64,
    /// Non-empty lines that were malformed and ignored
    pub skipped: u64,
}

impl<'a> PartialAggregate<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one parsed observation
    pub fn observe(&mut self, key: &'a [u8], value: f64) {
        self.records += 1;
        self.stats
            .entry(key)
            .and_modify(|stats| stats.add(value))
            .or_insert_with(|| Stats::new(value));
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Why a run did not fan out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequentialReason {
    /// Input below the parallel threshold
    SmallInput,
    /// Mapping disabled or failed, working from a buffered read
    BufferedInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential(SequentialReason),
    Parallel { workers: usize },
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential(SequentialReason::SmallInput) => {
                write!(f, "sequential (small input)")
            }
            ExecutionMode::Sequential(SequentialReason::BufferedInput) => {
                write!(f, "sequential (buffered input)")
            }
            ExecutionMode::Parallel { workers } => write!(f, "parallel ({workers} workers)"),
        }
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub mode: ExecutionMode,
    pub input_bytes: u64,
    pub chunks: usize,
    pub records: u64,
    pub skipped: u64,
    pub keys: usize,
}
