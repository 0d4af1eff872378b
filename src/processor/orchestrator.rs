use std::{num::NonZeroUsize, thread::available_parallelism, time::Instant};

use rayon::{
    ThreadPoolBuilder,
    iter::{IntoParallelRefIterator, ParallelIterator},
};
use tracing::{debug, info, trace};

use crate::{
    config::PipelineConfig,
    helpers::file_view::FileView,
    processor::{
        ChunkRange, ExecutionMode, ProcessorError, RunReport, SequentialReason,
        chunk_planner::plan_chunks,
        chunk_processor::process_chunk,
        merger::GlobalAggregate,
        output::{render, write_output},
    },
};

/// Inputs at or above this size get the larger worker band
const LARGE_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Drives one run: read the input, scan it, merge, render, write.
///
/// # Examples
///
/// ```no_run
/// use chunk_aggregator::{Orchestrator, PipelineConfig};
///
/// let report = Orchestrator::new(PipelineConfig::new("measurements.txt", "out.txt"))
///     .run()
///     .unwrap();
/// println!("{} keys from {} records", report.keys, report.records);
/// ```
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Orchestrator { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline and writes the report to the configured output.
    ///
    /// # Errors
    /// Returns a [`ProcessorError`] if the input cannot be read, the worker
    /// pool cannot be built or the output cannot be written. Nothing is
    /// written to the output path in any of these cases.
    pub fn run(&self) -> Result<RunReport, ProcessorError> {
        let (rendered, report) = self.render()?;
        write_output(&self.config.output, &rendered)?;
        info!(output = %self.config.output.display(), bytes = rendered.len(), "report written");
        Ok(report)
    }

    /// Same as [`Orchestrator::run`] but returns the rendered report instead
    /// of writing it.
    pub fn render(&self) -> Result<(Vec<u8>, RunReport), ProcessorError> {
        let started = Instant::now();
        let input = &self.config.input;

        let input_bytes = std::fs::metadata(input)
            .map_err(|source| ProcessorError::Input {
                path: input.clone(),
                source,
            })?
            .len();
        let small = input_bytes < self.config.sequential_threshold;
        info!(input = %input.display(), bytes = input_bytes, "starting run");

        let view = FileView::open(input, self.config.use_mmap && !small)?;
        let mode = if small {
            ExecutionMode::Sequential(SequentialReason::SmallInput)
        } else if !view.is_mapped() {
            ExecutionMode::Sequential(SequentialReason::BufferedInput)
        } else {
            ExecutionMode::Parallel {
                workers: self.worker_count(input_bytes),
            }
        };
        info!(%mode, "execution mode chosen");

        let global = match mode {
            ExecutionMode::Sequential(_) => aggregate_sequential(&view),
            ExecutionMode::Parallel { workers } => {
                aggregate_parallel(&view, workers, self.config.min_chunk_size)?
            }
        };

        let report = RunReport {
            mode,
            input_bytes,
            chunks: global.chunks(),
            records: global.records(),
            skipped: global.skipped(),
            keys: global.len(),
        };
        let rendered = render(global);

        info!(
            records = report.records,
            skipped = report.skipped,
            keys = report.keys,
            chunks = report.chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation finished"
        );
        Ok((rendered, report))
    }

    /// Explicit setting, or the size heuristic over the machine's hardware
    /// threads. Those are read from the OS rather than from rayon's global
    /// pool, which `RAYON_NUM_THREADS` or an embedding application may have
    /// resized.
    fn worker_count(&self, input_bytes: u64) -> usize {
        self.config.workers.unwrap_or_else(|| {
            let available = available_parallelism().map_or(1, NonZeroUsize::get);
            default_worker_count(input_bytes, available)
        })
    }
}

/// Worker pool size for an input of `file_size` bytes on a machine with
/// `available` hardware threads.
pub fn default_worker_count(file_size: u64, available: usize) -> usize {
    if file_size < LARGE_INPUT_BYTES {
        available.clamp(2, 4)
    } else {
        available.clamp(4, 8)
    }
}

/// Scans the whole input as one range on the calling thread.
pub fn aggregate_sequential(data: &[u8]) -> GlobalAggregate<'_> {
    let global = GlobalAggregate::new();
    if !data.is_empty() {
        global.merge(process_chunk(data, ChunkRange::new(0, data.len())));
    }
    global
}

/// Plans record-aligned ranges and scans them on a pool of `workers` threads.
///
/// Each task merges its partial aggregate as soon as it finishes, in
/// whatever order the pool completes them. Returns once every range has been
/// merged.
pub fn aggregate_parallel(
    data: &[u8],
    workers: usize,
    min_chunk_size: usize,
) -> Result<GlobalAggregate<'_>, ProcessorError> {
    let workers = workers.max(1);
    let ranges = plan_chunks(data, workers, min_chunk_size);
    debug!(workers, chunks = ranges.len(), "planned chunks");

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("chunk-worker-{i}"))
        .build()?;

    let global = GlobalAggregate::new();
    pool.install(|| {
        ranges.par_iter().for_each(|range| {
            let partial = process_chunk(data, *range);
            trace!(
                start = range.start,
                end = range.end,
                keys = partial.len(),
                "chunk scanned"
            );
            global.merge(partial);
        });
    });

    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &[u8] = b"Oslo;-3.0\nLima;19.5\nOslo;1.0\nCairo;30.25\nLima;20.5\nbad line\nOslo;2.0";

    fn temp_with(contents: &[u8]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(contents).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn test_default_worker_count() {
        assert_eq!(default_worker_count(10, 1), 2);
        assert_eq!(default_worker_count(10, 3), 3);
        assert_eq!(default_worker_count(10, 64), 4);
        assert_eq!(default_worker_count(LARGE_INPUT_BYTES, 2), 4);
        assert_eq!(default_worker_count(LARGE_INPUT_BYTES, 6), 6);
        assert_eq!(default_worker_count(LARGE_INPUT_BYTES, 64), 8);
    }

    #[test]
    fn test_default_workers_stay_in_small_band() {
        let tmp = temp_with(SAMPLE);
        let config = PipelineConfig::new(tmp.path(), "unused.txt").with_sequential_threshold(0);
        let (_, report) = Orchestrator::new(config).render().unwrap();
        let ExecutionMode::Parallel { workers } = report.mode else {
            panic!("expected a parallel run, got {}", report.mode);
        };
        let available = available_parallelism().map_or(1, NonZeroUsize::get);
        assert_eq!(workers, available.clamp(2, 4));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let expected = render(aggregate_sequential(SAMPLE));
        for workers in 1..=5 {
            for min_chunk in [1, 4, 16, 1024] {
                let global = aggregate_parallel(SAMPLE, workers, min_chunk).unwrap();
                assert_eq!(global.records(), 6);
                assert_eq!(global.skipped(), 1);
                assert_eq!(render(global), expected, "workers={workers} min_chunk={min_chunk}");
            }
        }
    }

    #[test]
    fn test_empty_input_merges_nothing() {
        assert!(aggregate_sequential(b"").is_empty());
        let global = aggregate_parallel(b"", 4, 1).unwrap();
        assert!(global.is_empty());
        assert_eq!(global.chunks(), 0);
    }

    #[test]
    fn test_small_input_runs_sequential() {
        let tmp = temp_with(SAMPLE);
        let config = PipelineConfig::new(tmp.path(), "unused.txt");
        let (_, report) = Orchestrator::new(config).render().unwrap();
        assert_eq!(
            report.mode,
            ExecutionMode::Sequential(SequentialReason::SmallInput)
        );
        assert_eq!(report.chunks, 1);
        assert_eq!(report.keys, 3);
    }

    #[test]
    fn test_forced_parallel_and_buffered_modes() {
        let tmp = temp_with(SAMPLE);
        let base = PipelineConfig::new(tmp.path(), "unused.txt")
            .with_sequential_threshold(0)
            .with_min_chunk_size(8);

        let (parallel, report) = Orchestrator::new(base.clone().with_workers(3))
            .render()
            .unwrap();
        assert_eq!(report.mode, ExecutionMode::Parallel { workers: 3 });
        assert!(report.chunks > 1);

        let (buffered, report) = Orchestrator::new(base.with_mmap(false)).render().unwrap();
        assert_eq!(
            report.mode,
            ExecutionMode::Sequential(SequentialReason::BufferedInput)
        );
        assert_eq!(parallel, buffered);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let config = PipelineConfig::new(dir.path().join("nope.txt"), &output);
        let err = Orchestrator::new(config).run().unwrap_err();
        assert!(matches!(err, ProcessorError::Input { .. }));
        assert!(!output.exists());
    }
}
