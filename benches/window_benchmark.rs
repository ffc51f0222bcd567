//! Window computation benchmarks.
//!
//! Measures the recompute paths that run on every append and scroll, for
//! chunk sizes up to the retention ceiling and beyond.
//!
//! Run with: cargo bench --bench window_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use exlv::model::LogEntry;
use exlv::store::RetentionPolicy;
use exlv::viewer::{Viewer, ViewerOptions};
use exlv::virtual_list::{FenwickRangeProvider, ItemSizeEstimator, ViewportState};

const SIZES: [u64; 4] = [1_000, 10_000, 50_000, 100_000];

fn entries(n: u64) -> Vec<LogEntry> {
    (1..=n)
        .map(|i| {
            let text = if i % 7 == 0 {
                format!("step {i}: {}", "payload ".repeat(20))
            } else {
                format!("step {i}: ok")
            };
            LogEntry::new(i, text).with_node(if i % 2 == 0 { "build" } else { "test" })
        })
        .collect()
}

fn options(n: u64) -> ViewerOptions {
    ViewerOptions::new(entries(n))
        .with_retention(RetentionPolicy::Unbounded)
        .with_viewport(ViewportState::new(0, 60))
        .with_estimator(ItemSizeEstimator::Wrapped { width: 100 })
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");
    for n in SIZES {
        let mut viewer = Viewer::new(options(n));
        let mut offset = 0usize;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                offset = (offset + 997) % viewer.total_rows().max(1);
                viewer.on_scroll(black_box(offset));
                black_box(viewer.window())
            })
        });
    }
    group.finish();
}

fn bench_append_following(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_following");
    for n in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || Viewer::new(options(n).with_follow(true)),
                |mut viewer| {
                    viewer.append(vec![LogEntry::new(n + 1, "tail")]);
                    black_box(viewer.window())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_page_mode_clamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_mode_clamp");
    for n in SIZES {
        let provider = FenwickRangeProvider::new(3).with_page_mode(true);
        let mut viewer = Viewer::with_provider(options(n), Box::new(provider));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                viewer.on_scroll(black_box(viewer.total_rows() / 2));
                black_box(viewer.materialized().len())
            })
        });
    }
    group.finish();
}

fn bench_jump(c: &mut Criterion) {
    let mut group = c.benchmark_group("jump");
    for n in SIZES {
        let mut viewer = Viewer::new(options(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let ticket = viewer.jump_to(black_box(n / 2));
                viewer.tick();
                black_box(ticket)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scroll,
    bench_append_following,
    bench_page_mode_clamp,
    bench_jump
);
criterion_main!(benches);
