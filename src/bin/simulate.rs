//! Random-order driver: producer thread pool plus a periodic sweep thread.
//!
//! Thin glue around the core's `submit` and `sweep_all`; all matching logic
//! lives in the library.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use atomic_lob::{MatchingEngine, OrderBook, Side, TICKER_SLOTS};
use clap::Parser;
use rand::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Drive the matching core with random orders")]
struct Args {
    /// Number of concurrent producer threads
    #[arg(long, default_value_t = 4)]
    producers: usize,

    /// Orders each producer submits
    #[arg(long, default_value_t = 1000)]
    orders_per_producer: usize,

    /// Milliseconds between matching sweeps
    #[arg(long, default_value_t = 250)]
    sweep_interval_ms: u64,

    /// Pin the sweep thread to the last CPU core
    #[arg(long)]
    pin_sweeper: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let book = Arc::new(OrderBook::new());
    let stop = Arc::new(AtomicBool::new(false));
    let started = Instant::now();

    let sweeper = {
        let book = Arc::clone(&book);
        let stop = Arc::clone(&stop);
        let interval = Duration::from_millis(args.sweep_interval_ms);
        let pin = args.pin_sweeper;
        thread::spawn(move || {
            if pin {
                pin_to_last_core();
            }
            let engine = MatchingEngine::new(book);
            let mut matches = 0u64;
            let mut volume = 0u64;
            while !stop.load(Ordering::Acquire) {
                let events = engine.sweep_all();
                matches += events.len() as u64;
                volume += events.iter().map(|e| e.quantity).sum::<u64>();
                thread::sleep(interval);
            }
            // Final pass over whatever the producers got in last
            let events = engine.sweep_all();
            matches += events.len() as u64;
            volume += events.iter().map(|e| e.quantity).sum::<u64>();
            (matches, volume)
        })
    };

    let producers: Vec<_> = (0..args.producers)
        .map(|id| {
            let book = Arc::clone(&book);
            let orders = args.orders_per_producer;
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let mut submitted = 0u64;
                for _ in 0..orders {
                    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                    let symbol = format!("TICK{}", rng.gen_range(0..TICKER_SLOTS));
                    let quantity = rng.gen_range(1..=100);
                    let price = rng.gen_range(1..=50_000);
                    book.submit(side, &symbol, quantity, price)
                        .expect("generated order is always valid");
                    submitted += 1;
                }
                info!(producer = id, submitted, "producer finished");
                submitted
            })
        })
        .collect();

    let total_submitted: u64 = producers
        .into_iter()
        .map(|h| h.join().expect("producer thread panicked"))
        .sum();

    stop.store(true, Ordering::Release);
    let (matches, volume) = sweeper.join().expect("sweep thread panicked");

    info!(
        total_submitted,
        matches,
        volume,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation complete"
    );
}

/// The last core is typically the quietest; same trick the engine thread of a
/// single-writer book uses.
fn pin_to_last_core() {
    if let Some(core_ids) = core_affinity::get_core_ids() {
        if let Some(last) = core_ids.last() {
            core_affinity::set_for_current(*last);
        }
    }
}
