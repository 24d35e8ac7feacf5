use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idshard::{
    DigitGroup, IdBuffer, MemorySink, ShardLayout, ShardWriter, Shuffler, synthesize,
    synthesize_parallel, total_ids,
};
use std::path::Path;

// A slice of the real ID space: every leading value, only 1..100 for the rest.
fn groups() -> (DigitGroup, DigitGroup) {
    (DigitGroup::first(), DigitGroup::from_range(1..100))
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    group.bench_function("rest", |b| b.iter(|| black_box(DigitGroup::rest())));
    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let (first, rest) = groups();
    let total = total_ids(&first, &rest).unwrap();

    let mut group = c.benchmark_group("fill");
    group.throughput(Throughput::Elements(total as u64));
    group.sample_size(20);

    group.bench_function(format!("sequential/{total}"), |b| {
        b.iter(|| black_box(synthesize(&first, &rest).unwrap()))
    });

    let threads = num_cpus::get();
    group.bench_function(format!("parallel-{threads}/{total}"), |b| {
        b.iter(|| black_box(synthesize_parallel(&first, &rest, threads).unwrap()))
    });

    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    let (first, rest) = groups();
    let buffer = synthesize(&first, &rest).unwrap();

    let mut group = c.benchmark_group("shuffle");
    group.throughput(Throughput::Elements(buffer.len() as u64));
    group.sample_size(20);

    let mut shuffler = Shuffler::from_seed(0);
    group.bench_function(format!("fisher-yates/{}", buffer.len()), |b| {
        b.iter_batched(
            || buffer.clone(),
            |buffer| black_box(shuffler.shuffle(buffer)),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let buffer = IdBuffer::from((0..2_000_000u32).collect::<Vec<_>>());

    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Elements(buffer.len() as u64));
    group.sample_size(20);

    group.bench_function("memory/200000-per-file", |b| {
        b.iter(|| {
            let mut sink = MemorySink::new();
            ShardWriter::new(ShardLayout::default())
                .write(&mut sink, Path::new("ids"), &buffer)
                .unwrap();
            black_box(sink)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_filter, bench_fill, bench_shuffle, bench_write);
criterion_main!(benches);
