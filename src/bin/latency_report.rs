//! Latency report for `match_order`, split by whether the order traded.

use bitmap_lob::{Engine, Order, OrderId, Side, ARENA_CAPACITY, MAX_PRICE};
use clap::Parser;
use hdrhistogram::Histogram;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(name = "latency-report", about = "Measure match_order latency percentiles")]
struct Args {
    /// Orders to submit (at most the arena capacity)
    #[arg(long, default_value_t = 1_000_000)]
    orders: OrderId,

    /// Width of each side's price band in ticks
    #[arg(long, default_value_t = 40)]
    band: u16,

    /// Ticks by which the buy and sell bands overlap
    #[arg(long, default_value_t = 10)]
    overlap: u16,

    /// Skip pre-faulting the arena
    #[arg(long)]
    cold: bool,
}

fn report(label: &str, histogram: &Histogram<u64>) {
    println!("\n--- {label} ({} samples) ---", histogram.len());
    if histogram.is_empty() {
        return;
    }
    for (name, quantile) in [("P50", 0.50), ("P90", 0.90), ("P99", 0.99), ("P99.9", 0.999)] {
        println!("{name:<7} {:6} ns", histogram.value_at_quantile(quantile));
    }
    println!("{:<7} {:6} ns", "Max", histogram.max());
}

fn main() {
    let args = Args::parse();
    let orders = args.orders.min(ARENA_CAPACITY);

    let mut engine = Engine::new(ARENA_CAPACITY);
    if !args.cold {
        engine.warm_up();
    }

    // Bounds are constants, so construction cannot fail
    let new_histogram = || Histogram::<u64>::new_with_bounds(1, 1_000_000, 3).unwrap();
    let mut resting = new_histogram();
    let mut crossing = new_histogram();

    let buy_floor: u16 = 500;
    let sell_floor = buy_floor.saturating_add(args.band.saturating_sub(args.overlap));
    let band = OrderId::from(args.band.max(1));
    if u32::from(sell_floor) + band > u32::from(MAX_PRICE) + 1 {
        eprintln!("bands end past the top of the price domain ({MAX_PRICE})");
        std::process::exit(2);
    }

    println!("Submitting {orders} orders (buys {buy_floor}+, sells {sell_floor}+, band {band})...");

    let mut busy = Duration::ZERO;
    let mut fills = 0u64;

    for id in 0..orders {
        let offset = (id / 2 % band) as u16;
        let order = if id % 2 == 0 {
            Order::new(id, Side::Buy, buy_floor + offset, 10)
        } else {
            Order::new(id, Side::Sell, sell_floor + offset, 10)
        };

        let start = Instant::now();
        let matches = std::hint::black_box(engine.book.match_order(order));
        let elapsed = start.elapsed();

        busy += elapsed;
        fills += u64::from(matches);
        let nanos = elapsed.as_nanos() as u64;
        let target = if matches > 0 { &mut crossing } else { &mut resting };
        target.saturating_record(nanos.max(1));
    }

    println!("\n=== match_order latency ===");
    println!("Throughput: {:.2} orders/sec", f64::from(orders) / busy.as_secs_f64());
    println!("Fills:      {fills}");
    println!("Resting:    {} orders", engine.book.order_count());
    report("no cross (rest only)", &resting);
    report("crossing", &crossing);
}
