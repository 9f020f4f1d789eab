//! Matching - price-time priority crossing against the opposite side.
//!
//! 1. CROSSING: sweep the opposite side from its best occupied level,
//!    draining each level in FIFO order before moving to the next.
//! 2. RESTING: write any remainder into the arena and onto the own side.
//!
//! Level discovery goes through the occupancy bitmap, so empty price levels
//! cost one bit each (64 per word) instead of a map or tree walk.

use tracing::trace;

use crate::arena::OrderArena;
use crate::book_side::BookSide;
use crate::command::{Order, Price, Quantity, Side};
use crate::order_book::OrderBook;

impl OrderBook {
    /// Match `incoming` against resting liquidity and rest any remainder.
    ///
    /// # Returns
    /// The number of resting orders that received at least one fill (not
    /// the traded quantity).
    ///
    /// # Complexity
    /// O(1) per fill plus one bit-scan per drained level
    #[inline]
    pub fn match_order(&mut self, incoming: Order) -> u32 {
        let mut remaining = incoming.quantity;
        self.arena.claim(incoming.id);

        let resting = match incoming.side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };
        let matches = resting.sweep(&mut self.arena, incoming.side, incoming.price, &mut remaining);

        if remaining > 0 {
            self.rest(incoming, remaining);
        }

        trace!(
            id = incoming.id,
            side = ?incoming.side,
            price = incoming.price,
            qty = incoming.quantity,
            matches,
            rested = remaining,
            "match"
        );
        matches
    }

    /// Rest `remaining` of `incoming` on its own side.
    #[inline]
    fn rest(&mut self, incoming: Order, remaining: Quantity) {
        self.arena.insert(Order { quantity: remaining, ..incoming });
        self.side_mut(incoming.side)
            .insert(incoming.id, incoming.price, remaining);
    }
}

impl BookSide {
    /// Fill `remaining` of a `taker`-side order limited at `limit` against
    /// this side, best level first.
    ///
    /// Stops when the order is exhausted, the next occupied level no longer
    /// crosses, or the side is empty. A level left with volume means the
    /// order ran out mid-level, so nothing further can match.
    ///
    /// # Returns
    /// Number of resting orders filled
    #[inline]
    pub(crate) fn sweep(
        &mut self,
        arena: &mut OrderArena,
        taker: Side,
        limit: Price,
        remaining: &mut Quantity,
    ) -> u32 {
        debug_assert_eq!(taker, self.side().opposite());
        let mut matches = 0;
        let mut index = self.first_filled();

        while index <= self.window.max
            && *remaining > 0
            && taker.crosses(limit, self.side().level_price(index))
        {
            let level = &mut self.levels[index];
            matches += level.fill(arena, remaining);

            if !level.is_empty() {
                return matches;
            }
            // Drained, or an occupied level that held no live volume
            self.retire(index);
            index = self.bitmap.next_filled(self.window.min, self.window.max);
        }

        matches
    }
}
