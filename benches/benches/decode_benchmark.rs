//! Decoding benchmarks for mstock.
//!
//! Run with: `cargo bench --package mstock-bench`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mstock_bench::{ArchiveConfig, mbf_words};
use mstock_lib::prelude::*;
use mstock_lib::mbf;

fn mbf_benchmark(c: &mut Criterion) {
    let words = mbf_words(4096);

    let mut group = c.benchmark_group("mbf");
    group.throughput(Throughput::Elements(words.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            words
                .iter()
                .map(|w| mbf::decode(black_box(*w)).unwrap_or(0.0))
                .sum::<f32>()
        });
    });
    group.finish();
}

fn data_file_benchmark(c: &mut Criterion) {
    let config = ArchiveConfig {
        standard: 1,
        extended: 0,
        bars: 10_000,
    };
    let archive = config.build().unwrap();
    let symbol = SymbolDescriptor::new("STD001", 1, 5, FormatVariant::Standard);
    let file = DataFile::open(archive.path(), &symbol).unwrap();

    let mut group = c.benchmark_group("data_file");
    group.throughput(Throughput::Elements(config.bars as u64));
    group.bench_function("records", |b| {
        b.iter(|| black_box(&file).records().count());
    });
    group.finish();
}

fn assemble_benchmark(c: &mut Criterion) {
    let config = ArchiveConfig {
        standard: 48,
        extended: 16,
        bars: 2_000,
    };
    let archive = config.build().unwrap();

    let mut group = c.benchmark_group("assemble");
    group.sample_size(20);
    group.throughput(Throughput::Elements(config.rows()));

    for parallel in [false, true] {
        let name = if parallel { "parallel" } else { "sequential" };
        let assembler = Assembler::new(AssembleOptions::default().with_parallel(parallel));
        group.bench_with_input(BenchmarkId::new("archive", name), &assembler, |b, assembler| {
            b.iter(|| assembler.assemble(archive.path()).unwrap().len());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    mbf_benchmark,
    data_file_benchmark,
    assemble_benchmark
);
criterion_main!(benches);
