//! Benchmarks for the trace classifier
//!
//! Compares the firing hot path across matching outcomes: clean in-order
//! matches, unordered matches, and firings the trace never declared.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tracekit::{Trace, TraceItem, Tracer};

fn declared_items(count: usize) -> Vec<TraceItem> {
    (0..count)
        .map(|index| TraceItem::new("event", format!("event_{index}")))
        .collect()
}

fn run_trace(items: &[TraceItem], enforce_order: bool, firings: &[TraceItem]) {
    let mut tracer = Tracer::new();
    tracer.register(
        Trace::new("bench", items.to_vec()).with_enforce_order(enforce_order),
    );
    tracer.start_trace_named("bench").expect("trace starts");
    for item in firings {
        tracer.log(item.clone());
    }
    black_box(tracer.stop());
}

fn bench_in_order_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_order_matching");
    for size in [10usize, 100, 500] {
        let items = declared_items(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| run_trace(items, true, items));
        });
    }
    group.finish();
}

fn bench_unordered_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("unordered_matching");
    for size in [10usize, 100, 500] {
        let items = declared_items(size);
        let reversed: Vec<TraceItem> = items.iter().rev().cloned().collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| run_trace(&items, false, &reversed));
        });
    }
    group.finish();
}

fn bench_ignored_firings(c: &mut Criterion) {
    let items = declared_items(50);
    let strays: Vec<TraceItem> = (0..200)
        .map(|index| TraceItem::new("event", format!("stray_{index}")))
        .collect();
    c.bench_function("ignored_firings", |b| {
        b.iter(|| run_trace(&items, true, &strays));
    });
}

criterion_group!(
    benches,
    bench_in_order_matching,
    bench_unordered_matching,
    bench_ignored_firings
);
criterion_main!(benches);
