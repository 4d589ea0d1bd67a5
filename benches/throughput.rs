//! Benchmark harness using Criterion.
//!
//! Measures:
//! - Submit into a deep single-ticker book (insert traversal cost)
//! - Sweep of a fully crossed book (match + retire cost)
//! - Mixed submit workload spread over many tickers

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::sync::Arc;

use atomic_lob::{MatchingEngine, OrderBook, Side, TICKER_SLOTS};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Benchmark: submit into one side with increasing resting depth
fn bench_submit_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_depth");

    for depth in [10u64, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let book = OrderBook::new();
            for i in 0..depth {
                book.submit(Side::Buy, "TICK0", 10, 1 + i % 500).unwrap();
            }

            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| {
                let price = rng.gen_range(1..=500);
                black_box(book.submit(Side::Buy, "TICK0", 10, price).unwrap())
            })
        });
    }
    group.finish();
}

/// Benchmark: sweep a ticker whose book is fully crossed
fn bench_sweep_crossed(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_crossed");

    for pairs in [10u64, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(pairs), pairs, |b, &pairs| {
            b.iter_batched(
                || {
                    let book = Arc::new(OrderBook::new());
                    for _ in 0..pairs {
                        book.submit(Side::Buy, "TICK0", 10, 100).unwrap();
                        book.submit(Side::Sell, "TICK0", 10, 90).unwrap();
                    }
                    MatchingEngine::new(book)
                },
                |engine| {
                    let ticker = engine.book().registry().resolve("TICK0").unwrap();
                    black_box(engine.sweep_ticker(ticker))
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

/// Benchmark: random submissions spread over all 1024 tickers
fn bench_submit_spread(c: &mut Criterion) {
    let book = OrderBook::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("submit_spread", |b| {
        b.iter(|| {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let slot = rng.gen_range(0..TICKER_SLOTS);
            let symbol = format!("TICK{}", slot);
            let price = rng.gen_range(1..=500);
            black_box(book.submit(side, &symbol, 10, price).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_submit_depth,
    bench_sweep_crossed,
    bench_submit_spread
);
criterion_main!(benches);
