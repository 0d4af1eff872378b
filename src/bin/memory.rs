use std::path::PathBuf;
use std::process::ExitCode;

use chunk_aggregator::{Orchestrator, PipelineConfig};
use clap::Parser;

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Runs one aggregation under the dhat heap profiler
#[derive(Parser, Debug)]
struct Args {
    /// Input file
    #[arg(default_value = "measurements.txt")]
    input: PathBuf,

    /// Where the report goes
    #[arg(default_value = "memory-output.txt")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _profiler = dhat::Profiler::new_heap();

    match Orchestrator::new(PipelineConfig::new(args.input, args.output)).run() {
        Ok(report) => {
            println!(
                "{} records over {} keys ({}). See dhat-heap.json for details",
                report.records, report.keys, report.mode
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
