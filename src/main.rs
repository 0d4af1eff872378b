use std::{path::PathBuf, process::ExitCode};

use chunk_aggregator::{
    Orchestrator, PipelineConfig,
    config::{DEFAULT_INPUT, DEFAULT_OUTPUT},
    logging::init_tracing,
};
use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Per-key min/mean/max over a large `key;value` file", long_about = None)]
struct Cli {
    /// Input file, one `key;value` record per line
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the sorted `key=min/mean/max` report
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PipelineConfig::new(cli.input, cli.output);
    match Orchestrator::new(config).run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
