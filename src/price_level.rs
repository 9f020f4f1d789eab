//! Price Level - a FIFO of order ids at a single price, with lazy deletion.
//!
//! Fully filled and cancelled orders are not removed from the queue. A
//! `cursor` marks the first id that may still hold quantity; everything
//! before it is dead. When the level drains completely the queue is cleared
//! in one step (keeping its allocation). A level that never drains is
//! compacted on insert once dead ids outnumber live ones.

use crate::arena::OrderArena;
use crate::command::{OrderId, Quantity};
use crate::config::{LEVEL_COMPACT_THRESHOLD, LEVEL_QUEUE_HINT};

/// A queue of order ids at a specific price level.
///
/// Invariant: `volume == 0` iff no id at or after `cursor` has quantity.
#[derive(Clone, Debug, Default)]
pub struct PriceLevel {
    /// Order ids in arrival order (time priority)
    orders: Vec<OrderId>,
    /// First id that may still have resting quantity
    cursor: usize,
    /// Sum of remaining quantities of ids at or after `cursor`. Wider than
    /// any per-order quantity so a crowded level cannot wrap.
    volume: u64,
}

impl PriceLevel {
    /// Create an empty level with a pre-reserved queue.
    pub fn new() -> Self {
        Self::with_capacity(LEVEL_QUEUE_HINT)
    }

    /// Create an empty level reserving room for `capacity` ids.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Vec::with_capacity(capacity),
            cursor: 0,
            volume: 0,
        }
    }

    /// Total resting quantity at this level
    #[inline]
    pub const fn volume(&self) -> u64 {
        self.volume
    }

    /// Returns true if nothing rests at this level
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.volume == 0
    }

    /// Position of the lazy-deletion cursor
    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Ids that may still be live, oldest first. May include ids cancelled
    /// in place (quantity 0) that the cursor has not reached yet.
    #[inline]
    pub fn pending(&self) -> &[OrderId] {
        &self.orders[self.cursor..]
    }

    /// Ids the cursor has already passed
    #[inline]
    pub fn dead(&self) -> usize {
        self.cursor
    }

    /// Append an order to the tail of the queue (newest order).
    ///
    /// # Complexity
    /// O(1) amortised; no allocation while within the reserved capacity
    #[inline]
    pub fn push_back(&mut self, id: OrderId, quantity: Quantity) {
        if self.cursor >= LEVEL_COMPACT_THRESHOLD && self.cursor * 2 >= self.orders.len() {
            self.compact();
        }
        self.orders.push(id);
        self.volume += u64::from(quantity);
    }

    /// Replace one order's contribution to the level volume.
    #[inline]
    pub fn adjust(&mut self, old: Quantity, new: Quantity) {
        debug_assert!(self.volume >= u64::from(old));
        self.volume = self.volume - u64::from(old) + u64::from(new);
    }

    /// Fill `remaining` against this level in FIFO order.
    ///
    /// Each resting order touched gets `min(remaining, quantity)`. Orders
    /// filled to zero move the cursor forward; an order left with quantity
    /// means `remaining` hit zero and the walk stops. Ids cancelled in place
    /// are stepped over without counting as a match.
    ///
    /// # Returns
    /// Number of resting orders that received a fill
    #[inline]
    pub fn fill(&mut self, arena: &mut OrderArena, remaining: &mut Quantity) -> u32 {
        let mut matches = 0;

        while *remaining > 0 && self.cursor < self.orders.len() {
            let resting = arena.get_mut(self.orders[self.cursor]);
            if resting.quantity == 0 {
                self.cursor += 1;
                continue;
            }

            let trade = (*remaining).min(resting.quantity);
            *remaining -= trade;
            resting.quantity -= trade;
            self.volume -= u64::from(trade);
            matches += 1;

            if resting.quantity == 0 {
                self.cursor += 1;
            } else {
                debug_assert_eq!(*remaining, 0);
                break;
            }
        }

        matches
    }

    /// Physically remove the ids before the cursor.
    ///
    /// Each id is pushed once and dropped at most once, so the shift is
    /// amortised O(1) per insert.
    #[cold]
    fn compact(&mut self) {
        self.orders.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Drop every id at once. Only valid once the level has drained, when
    /// every queued id is dead.
    #[inline]
    pub fn reset(&mut self) {
        debug_assert_eq!(self.volume, 0);
        self.orders.clear();
        self.cursor = 0;
    }

    /// Drop every id and its volume, live or not.
    pub fn clear(&mut self) {
        self.volume = 0;
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Order;

    fn setup(arena: &mut OrderArena, level: &mut PriceLevel, quantities: &[Quantity]) {
        for (id, &qty) in quantities.iter().enumerate() {
            let id = id as OrderId;
            arena.insert(Order::sell(id, 100, qty));
            level.push_back(id, qty);
        }
    }

    #[test]
    fn test_empty_level() {
        let level = PriceLevel::new();
        assert!(level.is_empty());
        assert_eq!(level.volume(), 0);
        assert_eq!(level.cursor(), 0);
        assert!(level.pending().is_empty());
    }

    #[test]
    fn test_push_multiple_fifo() {
        let mut arena = OrderArena::new(10);
        let mut level = PriceLevel::new();
        setup(&mut arena, &mut level, &[100, 200, 300]);

        assert_eq!(level.volume(), 600);
        assert_eq!(level.pending(), &[0, 1, 2]);
    }

    #[test]
    fn test_fill_partial_head() {
        let mut arena = OrderArena::new(10);
        let mut level = PriceLevel::new();
        setup(&mut arena, &mut level, &[10, 10]);

        let mut remaining = 4;
        assert_eq!(level.fill(&mut arena, &mut remaining), 1);
        assert_eq!(remaining, 0);
        assert_eq!(arena.get(0).quantity, 6);
        assert_eq!(arena.get(1).quantity, 10);
        assert_eq!(level.cursor(), 0, "head still live");
        assert_eq!(level.volume(), 16);
    }

    #[test]
    fn test_fill_advances_cursor() {
        let mut arena = OrderArena::new(10);
        let mut level = PriceLevel::new();
        setup(&mut arena, &mut level, &[5, 5, 5]);

        let mut remaining = 12;
        assert_eq!(level.fill(&mut arena, &mut remaining), 3);
        assert_eq!(remaining, 0);
        assert_eq!(level.cursor(), 2);
        assert_eq!(level.dead(), 2);
        assert_eq!(level.pending(), &[2]);
        assert_eq!(arena.get(2).quantity, 3);
        assert_eq!(level.volume(), 3);
    }

    #[test]
    fn test_fill_drains_level() {
        let mut arena = OrderArena::new(10);
        let mut level = PriceLevel::new();
        setup(&mut arena, &mut level, &[5, 5]);

        let mut remaining = 20;
        assert_eq!(level.fill(&mut arena, &mut remaining), 2);
        assert_eq!(remaining, 10);
        assert!(level.is_empty());
        assert_eq!(level.cursor(), 2);

        level.reset();
        assert_eq!(level.cursor(), 0);
        assert!(level.pending().is_empty());
    }

    #[test]
    fn test_fill_skips_cancelled() {
        let mut arena = OrderArena::new(10);
        let mut level = PriceLevel::new();
        setup(&mut arena, &mut level, &[5, 5, 5]);

        // Cancel the middle order in place
        arena.get_mut(1).quantity = 0;
        level.adjust(5, 0);

        let mut remaining = 8;
        assert_eq!(level.fill(&mut arena, &mut remaining), 2, "cancelled id not counted");
        assert_eq!(arena.get(0).quantity, 0);
        assert_eq!(arena.get(2).quantity, 2);
        assert_eq!(level.volume(), 2);
        assert_eq!(level.cursor(), 2);
    }

    #[test]
    fn test_compaction_on_insert() {
        let mut arena = OrderArena::new(1000);
        let mut level = PriceLevel::new();
        // One resting order that stays behind all the churn
        let quantities: Vec<Quantity> = vec![1; LEVEL_COMPACT_THRESHOLD + 1];
        setup(&mut arena, &mut level, &quantities);

        let mut remaining = LEVEL_COMPACT_THRESHOLD as Quantity;
        level.fill(&mut arena, &mut remaining);
        assert_eq!(level.cursor(), LEVEL_COMPACT_THRESHOLD);
        let survivor = LEVEL_COMPACT_THRESHOLD as OrderId;
        assert_eq!(level.pending(), &[survivor]);

        arena.insert(Order::sell(500, 100, 3));
        level.push_back(500, 3);
        assert_eq!(level.cursor(), 0, "dead prefix dropped");
        assert_eq!(level.pending(), &[survivor, 500]);
        assert_eq!(level.volume(), 4);

        // FIFO order survives compaction
        let mut remaining = 2;
        assert_eq!(level.fill(&mut arena, &mut remaining), 2);
        assert_eq!(arena.get(survivor).quantity, 0);
        assert_eq!(arena.get(500).quantity, 2);
    }

    #[test]
    fn test_volume_wider_than_u32() {
        let mut level = PriceLevel::new();
        let per_order = u64::from(Quantity::MAX);
        let orders = u64::from(u32::MAX) / per_order + 2;
        for id in 0..orders {
            level.push_back(id as OrderId, Quantity::MAX);
        }
        assert_eq!(level.volume(), orders * per_order);
        assert!(level.volume() > u64::from(u32::MAX));

        level.adjust(Quantity::MAX, 0);
        assert_eq!(level.volume(), (orders - 1) * per_order);
    }

    #[test]
    fn test_adjust() {
        let mut level = PriceLevel::new();
        level.push_back(0, 100);
        level.push_back(1, 50);

        level.adjust(100, 40);
        assert_eq!(level.volume(), 90);

        level.adjust(40, 70);
        assert_eq!(level.volume(), 120);
    }
}
