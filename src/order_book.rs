//! Order Book - both sides plus the order arena for one instrument.
//!
//! Hot-path operations (`match_order`, `modify_order_by_id`,
//! `get_volume_at_level`) do no validation: ids must lie inside the arena
//! and prices inside `MIN_PRICE..=MAX_PRICE`. Lookups and the helpers below
//! them are cold and report failures through [`BookError`].

use tracing::{debug, info};

use crate::arena::OrderArena;
use crate::book_side::BookSide;
use crate::command::{Order, OrderId, Price, Quantity, Side};
use crate::config::{ARENA_CAPACITY, MAX_PRICE, MIN_PRICE, NUM_LEVELS};
use crate::error::{BookError, BookResult};

/// Limit order book over a fixed price domain.
pub struct OrderBook {
    /// Every order ever seen, addressed by id
    pub(crate) arena: OrderArena,
    /// Resting buy orders
    pub(crate) bids: BookSide,
    /// Resting sell orders
    pub(crate) asks: BookSide,
}

/// Allocate an empty book sized by the compile-time configuration.
pub fn create_orderbook() -> OrderBook {
    OrderBook::new()
}

impl OrderBook {
    /// Create a new empty order book with `ARENA_CAPACITY` order slots
    pub fn new() -> Self {
        Self::with_capacity(ARENA_CAPACITY)
    }

    /// Create a new empty order book accepting ids `0..capacity`
    pub fn with_capacity(capacity: OrderId) -> Self {
        info!(capacity, levels = NUM_LEVELS, "creating order book");
        Self {
            arena: OrderArena::new(capacity),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
        }
    }

    // ========================================================================
    // Side Access
    // ========================================================================

    #[inline]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    #[inline]
    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    #[inline]
    pub fn arena(&self) -> &OrderArena {
        &self.arena
    }

    // ========================================================================
    // Hot Path
    // ========================================================================

    /// Set the remaining quantity of an active order.
    ///
    /// `new_quantity == 0` cancels the order in place: its id stays in the
    /// level queue as dead weight and is skipped by matching. Inactive or
    /// out-of-range ids are ignored. Time priority is kept on any change.
    #[inline]
    pub fn modify_order_by_id(&mut self, id: OrderId, new_quantity: Quantity) {
        let Some(order) = self.arena.active_mut(id) else {
            return;
        };
        let old = order.quantity;
        order.quantity = new_quantity;
        let (side, price) = (order.side, order.price);

        debug!(id, old, new = new_quantity, ?side, price, "modify order");
        self.side_mut(side).adjust(price, old, new_quantity);
    }

    /// Total resting volume at `price` on `side`.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn get_volume_at_level(&self, side: Side, price: Price) -> u32 {
        self.side(side).volume_at(price)
    }

    // ========================================================================
    // Cold Path
    // ========================================================================

    /// Current state of an active order.
    pub fn lookup_order_by_id(&self, id: OrderId) -> BookResult<Order> {
        self.arena
            .try_get(id)
            .filter(|order| order.is_active())
            .copied()
            .ok_or(BookError::OrderNotFound(id))
    }

    /// True if `id` names an order with remaining quantity.
    pub fn order_exists(&self, id: OrderId) -> bool {
        self.arena.is_active(id)
    }

    /// Check that `order` honours the hot-path contract before submitting.
    pub fn check_incoming(&self, order: &Order) -> BookResult<()> {
        let capacity = self.arena.capacity();
        if order.id >= capacity {
            return Err(BookError::IdOutOfRange { id: order.id, capacity });
        }
        if !(MIN_PRICE..=MAX_PRICE).contains(&order.price) {
            return Err(BookError::PriceOutOfRange(order.price));
        }
        if order.quantity == 0 {
            return Err(BookError::ZeroQuantity(order.id));
        }
        if self.arena.is_active(order.id) {
            return Err(BookError::DuplicateOrderId(order.id));
        }
        if self.arena.is_claimed(order.id) {
            return Err(BookError::OrderIdReused(order.id));
        }
        Ok(())
    }

    /// Best bid price (highest buy price)
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best ask price (lowest sell price)
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Calculate spread (best_ask - best_bid)
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Top `n` levels of `side`, best first
    pub fn depth(&self, side: Side, n: usize) -> Vec<(Price, u64)> {
        self.side(side).depth(n)
    }

    /// Sum of all level volumes on `side`
    pub fn side_volume(&self, side: Side) -> u64 {
        self.side(side).total_volume()
    }

    /// Number of active orders. Scans the arena.
    pub fn order_count(&self) -> usize {
        self.arena.active_count()
    }

    /// Returns true if nothing rests on either side
    pub fn is_empty(&self) -> bool {
        self.bids.best_index().is_none() && self.asks.best_index().is_none()
    }

    /// Remove all orders and resting liquidity and release every id.
    /// Storage is zeroed in place, not reallocated.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.bids.clear();
        self.asks.clear();
    }

    /// Pre-fault arena pages
    pub fn warm_up(&mut self) {
        self.arena.warm_up();
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid())
            .field("best_ask", &self.best_ask())
            .field("bid_levels", &self.bids.level_count())
            .field("ask_levels", &self.asks.level_count())
            .field("capacity", &self.arena.capacity())
            .finish()
    }
}
