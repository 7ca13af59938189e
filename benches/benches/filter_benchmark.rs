//! Parsing and classification throughput.
//!
//! Run with: `cargo bench --package chatgrep-bench`

use chatgrep_bench::{busy_config, day_of_lines};
use chatgrep_lib::{Classifier, Record};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

const SIZES: [usize; 2] = [1_000, 50_000];

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in SIZES {
        let lines = day_of_lines(size);
        let bytes: usize = lines.iter().map(String::len).sum();
        group.throughput(Throughput::Bytes(bytes as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(Record::parse(line.as_str()));
                }
            });
        });
    }

    group.finish();
}

fn classify_benchmark(c: &mut Criterion) {
    let config = Arc::new(busy_config().expect("benchmark config is valid"));
    let mut group = c.benchmark_group("classify");

    for size in SIZES {
        let records: Vec<Record> = day_of_lines(size).into_iter().map(Record::parse).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let mut classifier = Classifier::new(Arc::clone(&config), 0);
                for record in records {
                    black_box(classifier.evaluate(record));
                }
                classifier.accepted()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, parse_benchmark, classify_benchmark);
criterion_main!(benches);
