//! Compile-time book configuration.
//!
//! The price domain and arena size are fixed when the crate is built. Every
//! array in the book is sized from these constants, so nothing is resized
//! while a session is running.

use crate::command::{OrderId, Price};

/// Lowest price the book accepts.
pub const MIN_PRICE: Price = 0;

/// Width of the price domain. Valid prices are `MIN_PRICE..=MIN_PRICE + PRICE_RANGE`.
pub const PRICE_RANGE: Price = 1023;

/// Highest price the book accepts.
pub const MAX_PRICE: Price = MIN_PRICE + PRICE_RANGE;

/// Number of discrete price levels per side.
pub const NUM_LEVELS: usize = PRICE_RANGE as usize + 1;

/// Number of 64-bit words in an occupancy bitmap.
pub const NUM_WORDS: usize = (NUM_LEVELS + 63) / 64;

/// Default arena capacity: order ids must lie in `0..ARENA_CAPACITY`.
pub const ARENA_CAPACITY: OrderId = 1 << 20;

/// Ids reserved up front in every level FIFO.
pub const LEVEL_QUEUE_HINT: usize = 16;

/// Dead ids a level tolerates before an insert compacts its queue.
pub const LEVEL_COMPACT_THRESHOLD: usize = 64;

const _: () = assert!(NUM_WORDS * 64 >= NUM_LEVELS);
const _: () = assert!(
    (MIN_PRICE as u32) + (PRICE_RANGE as u32) <= Price::MAX as u32,
    "price domain must fit in Price"
);
