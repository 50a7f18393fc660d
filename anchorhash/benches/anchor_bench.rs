use anchorhash::{Anchor, BucketId, CompactAnchor, WideAnchor};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

/// Keys looked up per benchmark iteration
const BATCH: u64 = 1000;

fn lookup_loop<T: BucketId>(anchor: &Anchor<T>, start: u64) -> usize {
    let mut sum = 0;
    for key in start..start + BATCH {
        sum += anchor.get_bucket(black_box(key)).index();
    }
    sum
}

fn get_bucket(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_bucket");
    group.throughput(Throughput::Elements(BATCH));

    for (working, capacity) in [(9, 10), (5, 10)] {
        let anchor = CompactAnchor::new(capacity, working).unwrap();
        group.bench_with_input(
            BenchmarkId::new("compact", format!("{working}_{capacity}")),
            &anchor,
            |b, anchor| b.iter(|| lookup_loop(anchor, 0)),
        );
    }

    for (working, capacity) in [(900_000, 1_000_000), (500_000, 1_000_000)] {
        let anchor = WideAnchor::new(capacity, working).unwrap();
        group.bench_with_input(
            BenchmarkId::new("wide", format!("{}k_{}m", working / 1000, capacity / 1_000_000)),
            &anchor,
            |b, anchor| b.iter(|| lookup_loop(anchor, 0)),
        );
    }
    group.finish();
}

fn get_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_path");
    group.throughput(Throughput::Elements(BATCH));

    let anchor = WideAnchor::new(1_000_000, 500_000).unwrap();
    group.bench_function("wide/500k_1m", |b| {
        let mut path = Vec::with_capacity(64);
        b.iter(|| {
            for key in 0..BATCH {
                path.clear();
                path = anchor.get_path(black_box(key), std::mem::take(&mut path));
            }
            path.len()
        })
    });
    group.finish();
}

fn mutation(c: &mut Criterion) {
    let mut anchor = WideAnchor::new(1_000_000, 1_000_000).unwrap();
    c.bench_function("remove_add/wide_1m", |b| {
        b.iter(|| {
            anchor.remove_bucket(black_box(123_456)).unwrap();
            anchor.add_bucket().unwrap()
        })
    });
}

criterion_group!(benches, get_bucket, get_path, mutation);
criterion_main!(benches);
