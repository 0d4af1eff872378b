use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chunk_aggregator::generator::write_measurements;
use clap::Parser;

/// Writes a synthetic `station;temperature` file
#[derive(Parser, Debug)]
struct Args {
    /// Destination file
    #[arg(default_value = "measurements.txt")]
    path: PathBuf,

    /// Number of records
    #[arg(default_value_t = 10_000_000)]
    rows: u64,

    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let file = File::create(&args.path)?;
    let mut writer = BufWriter::new(file);

    write_measurements(&mut writer, args.rows, args.seed)?;
    writer.flush()?;

    println!("Wrote {} records to {}", args.rows, args.path.display());
    Ok(())
}
