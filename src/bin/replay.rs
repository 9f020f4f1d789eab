//! Replay a CSV command file through the engine and print the resulting book.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use bitmap_lob::replay::{read_commands, ReplayError};
use bitmap_lob::{CommandOutcome, Engine, Side, ARENA_CAPACITY};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "replay", about = "Replay order commands through the matching core")]
struct Args {
    /// CSV file with header `action,id,side,price,qty`
    input: PathBuf,

    /// Arena capacity (order ids must be below this)
    #[arg(long, default_value_t = ARENA_CAPACITY)]
    capacity: u32,

    /// Price levels per side to print at the end
    #[arg(long, default_value_t = 10)]
    depth: usize,

    /// Abort on the first rejected command
    #[arg(long)]
    strict: bool,

    /// Pin the replay thread to the last CPU core
    #[arg(long)]
    pin_core: bool,

    /// Pre-fault arena memory before replaying
    #[arg(long)]
    warm_up: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(&args) {
        error!(%err, "replay failed");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ReplayError> {
    let file = File::open(&args.input)?;
    let commands = read_commands(BufReader::new(file))?;
    info!(path = %args.input.display(), commands = commands.len(), "loaded replay file");

    let mut engine = Engine::new(args.capacity);
    if args.pin_core {
        engine.pin_to_core();
    }
    if args.warm_up {
        engine.warm_up();
    }

    let start = Instant::now();
    for cmd in commands {
        if let CommandOutcome::Rejected(err) = engine.process_command(cmd) {
            if args.strict {
                return Err(err.into());
            }
        }
    }
    let elapsed = start.elapsed();

    let stats = engine.stats();
    info!(
        commands = stats.commands,
        matches = stats.matches,
        rejected = stats.rejected,
        elapsed_us = elapsed.as_micros() as u64,
        "replay finished"
    );

    print_book(&engine, args.depth);
    Ok(())
}

fn print_book(engine: &Engine, depth: usize) {
    let asks = engine.book.depth(Side::Sell, depth);
    let bids = engine.book.depth(Side::Buy, depth);

    println!("\n=== Book (top {depth}) ===");
    println!("{:>8} {:>10}", "ASK", "VOLUME");
    for (price, volume) in asks.iter().rev() {
        println!("{:>8} {:>10}", price, volume);
    }
    println!("---------------------");
    for (price, volume) in &bids {
        println!("{:>8} {:>10}", price, volume);
    }
    println!("{:>8} {:>10}", "BID", "VOLUME");

    match engine.book.spread() {
        Some(spread) => println!("\nSpread: {spread}"),
        None => println!("\nSpread: n/a"),
    }
    println!("State hash: {:016x}", engine.state_hash());
}
