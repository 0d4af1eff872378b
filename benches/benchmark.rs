use std::{fs::File, io::BufWriter, io::Write};

use chunk_aggregator::{Orchestrator, PipelineConfig, generator::write_measurements};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use tempfile::NamedTempFile;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

const ROWS: u64 = 2_000_000;

fn sample_input() -> NamedTempFile {
    let tmp = NamedTempFile::new().unwrap();
    let mut writer = BufWriter::new(File::create(tmp.path()).unwrap());
    write_measurements(&mut writer, ROWS, 1).unwrap();
    writer.flush().unwrap();
    tmp
}

fn end_to_end(c: &mut Criterion) {
    let input = sample_input();
    let base = PipelineConfig::new(input.path(), "unused.txt");

    let mut group = c.benchmark_group("Orchestrator");
    group.sample_size(10);
    group.throughput(Throughput::Elements(ROWS));

    group.bench_function("sequential_buffered", |b| {
        let orchestrator = Orchestrator::new(base.clone().with_mmap(false));
        b.iter(|| orchestrator.render().unwrap())
    });

    group.bench_function("parallel_mmap", |b| {
        let orchestrator = Orchestrator::new(base.clone().with_sequential_threshold(0));
        b.iter(|| orchestrator.render().unwrap())
    });

    group.finish();
}

criterion_group!(benches, end_to_end);
criterion_main!(benches);
