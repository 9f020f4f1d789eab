//! Order, command and outcome types for the matching core.
//!
//! Commands are what a sequencer feeds the engine.
//! Outcomes are what the engine reports back for each command.

use crate::config::{MIN_PRICE, PRICE_RANGE};
use crate::error::BookError;

/// Caller-assigned dense order id. Doubles as the arena slot.
pub type OrderId = u32;

/// Integer price inside `MIN_PRICE..=MAX_PRICE`.
pub type Price = u16;

/// Remaining unfilled quantity. Zero means the order is inactive.
pub type Quantity = u16;

/// Order side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    #[default]
    Buy = 0,
    /// Sell side (asks)
    Sell = 1,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Transformed level index for `price` on this side.
    ///
    /// Index 0 is always the best price for the side: the lowest ask, or the
    /// highest bid. Ascending index walks away from the touch on both sides,
    /// so one forward bit-scan serves bids and asks alike.
    #[inline]
    pub const fn level_index(self, price: Price) -> usize {
        match self {
            Side::Sell => (price - MIN_PRICE) as usize,
            Side::Buy => (PRICE_RANGE - (price - MIN_PRICE)) as usize,
        }
    }

    /// Inverse of [`Side::level_index`].
    #[inline]
    pub const fn level_price(self, index: usize) -> Price {
        match self {
            Side::Sell => MIN_PRICE + index as Price,
            Side::Buy => MIN_PRICE + PRICE_RANGE - index as Price,
        }
    }

    /// Whether an incoming order on this side with limit `limit` may trade
    /// against a resting order priced at `resting`.
    #[inline]
    pub const fn crosses(self, limit: Price, resting: Price) -> bool {
        match self {
            // Buyer pays up to its limit
            Side::Buy => resting <= limit,
            // Seller accepts down to its limit
            Side::Sell => resting >= limit,
        }
    }
}

/// A plain limit order.
///
/// The same record is used for incoming orders and for resting state in the
/// arena; `quantity` is the remaining unfilled amount.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Order {
    pub id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
}

// 4 + 2 + 2 + 1, padded to the u32 alignment
const _: () = assert!(std::mem::size_of::<Order>() == 12);

impl Order {
    #[inline]
    pub const fn new(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        Self { id, price, quantity, side }
    }

    /// Shorthand for a buy order
    #[inline]
    pub const fn buy(id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self::new(id, Side::Buy, price, quantity)
    }

    /// Shorthand for a sell order
    #[inline]
    pub const fn sell(id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self::new(id, Side::Sell, price, quantity)
    }

    /// An order is active while it still has quantity to fill.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.quantity > 0
    }
}

// ============================================================================
// Input Commands
// ============================================================================

/// Input commands from the sequencer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Match an incoming limit order, resting any remainder
    Match(Order),
    /// Set the remaining quantity of a resting order (0 cancels it)
    Modify { id: OrderId, quantity: Quantity },
}

// ============================================================================
// Output
// ============================================================================

/// What the engine did with a command
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandOutcome {
    /// Order matched against `matches` resting orders; `rested` is the
    /// quantity left on the book under the incoming id
    Matched { matches: u32, rested: Quantity },
    /// Resting order quantity was changed
    Modified { id: OrderId, quantity: Quantity },
    /// Command failed cold-path validation and never reached the book
    Rejected(BookError),
}
