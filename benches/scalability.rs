use std::{fs::File, io::BufWriter, io::Write};

use chunk_aggregator::{Orchestrator, PipelineConfig, generator::write_measurements};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tempfile::NamedTempFile;

const ROWS: u64 = 4_000_000;

fn bench_scalability(c: &mut Criterion) {
    let input = NamedTempFile::new().unwrap();
    let mut writer = BufWriter::new(File::create(input.path()).unwrap());
    write_measurements(&mut writer, ROWS, 7).unwrap();
    writer.flush().unwrap();
    drop(writer);

    let mut group = c.benchmark_group("workers");
    group.sample_size(10);
    group.throughput(Throughput::Elements(ROWS));

    for workers in [1, 2, 4, 8] {
        let config = PipelineConfig::new(input.path(), "unused.txt")
            .with_sequential_threshold(0)
            .with_workers(workers);
        let orchestrator = Orchestrator::new(config);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| orchestrator.render().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scalability);
criterion_main!(benches);
