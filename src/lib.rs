//! # Bitmap-LOB
//!
//! The matching core of a limit order book over a fixed, bounded price domain.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: One thread owns the order book exclusively (no locks)
//! - **Dense Arrays**: Orders addressed by id, levels addressed by transformed price
//! - **Bitmap Index**: Best occupied level found with a hardware bit-scan
//! - **Lazy Deletion**: Filled and cancelled orders are skipped by a per-level cursor
//!
//! ## Architecture
//!
//! ```text
//! incoming Order --> [match_order] --sweep--> opposite BookSide (bitmap -> levels -> arena)
//!                          |
//!                          +--rest--> own BookSide + arena
//! ```

pub mod config;
pub mod error;
pub mod arena;
pub mod bitmap;
pub mod command;
pub mod price_level;
pub mod book_side;
pub mod order_book;
pub mod matching;
pub mod engine;
pub mod replay;

// Re-exports for convenience
pub use arena::OrderArena;
pub use bitmap::OccupancyBitmap;
pub use book_side::{ActiveWindow, BookSide};
pub use command::{Command, CommandOutcome, Order, OrderId, Price, Quantity, Side};
pub use config::{ARENA_CAPACITY, MAX_PRICE, MIN_PRICE, NUM_LEVELS, PRICE_RANGE};
pub use engine::Engine;
pub use error::{BookError, BookResult};
pub use order_book::{create_orderbook, OrderBook};
pub use price_level::PriceLevel;
