//! # chunk_aggregator
//!
//! Per-key minimum, mean and maximum over very large `key;value` text files,
//! computed with bounded memory and all available cores.
//!
//! - Memory-mapped input (zero-copy), with a buffered read as fallback
//! - Record-aligned chunk planning, so no line is split or counted twice
//! - Raw-byte scanning that takes the value after the rightmost `;`
//! - Parallel chunk scans on a Rayon pool, merged into a sharded map as each
//!   chunk completes
//! - Malformed records skipped and counted, never fatal
//!
//! Output is one `key=min/mean/max` line per key, sorted byte-wise, each
//! number with one fractional digit.
//!
//! # Example
//!
//! ```rust,no_run
//! use chunk_aggregator::{Orchestrator, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::new("measurements.txt", "output.txt");
//!     let report = Orchestrator::new(config).run()?;
//!     println!("{} keys, {} records, {} skipped", report.keys, report.records, report.skipped);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod generator;
mod helpers;
pub mod logging;
pub mod processor;

pub use config::PipelineConfig;
pub use helpers::file_view::FileView;
pub use processor::{
    ChunkRange, ExecutionMode, PartialAggregate, ProcessorError, RunReport, SequentialReason,
    Stats, merger::GlobalAggregate, orchestrator::Orchestrator,
};
