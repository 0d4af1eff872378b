use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "testcase.txt";
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Smallest range handed to one worker
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 1024 * 1024;

/// Inputs smaller than this are scanned on the calling thread
pub const DEFAULT_SEQUENTIAL_THRESHOLD: u64 = 1024 * 1024;

/// Settings for one pipeline run
///
/// Only `input` and `output` are surfaced on the command line; the tuning
/// knobs exist for library callers, tests and benches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Worker pool size, `None` picks from input size and available cores
    pub workers: Option<usize>,
    pub min_chunk_size: usize,
    pub sequential_threshold: u64,
    /// Memory-map the input; when false the run reads it into memory
    pub use_mmap: bool,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    pub fn with_min_chunk_size(mut self, bytes: usize) -> Self {
        self.min_chunk_size = bytes.max(1);
        self
    }

    pub fn with_sequential_threshold(mut self, bytes: u64) -> Self {
        self.sequential_threshold = bytes;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            workers: None,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            sequential_threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
            use_mmap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.input, PathBuf::from("testcase.txt"));
        assert_eq!(config.output, PathBuf::from("output.txt"));
        assert_eq!(config.workers, None);
        assert!(config.use_mmap);
    }

    #[test]
    fn test_builder_clamps_zero() {
        let config = PipelineConfig::new("in.txt", "out.txt")
            .with_workers(0)
            .with_min_chunk_size(0);
        assert_eq!(config.workers, Some(1));
        assert_eq!(config.min_chunk_size, 1);
        assert_eq!(config.input, PathBuf::from("in.txt"));
    }
}
