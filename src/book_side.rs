//! Book Side - the price-level ledger for one side of the book.
//!
//! Levels live in a dense array indexed by the side's transformed price
//! (index 0 = best price), alongside the occupancy bitmap and the active
//! window that bounds every scan.

use crate::bitmap::OccupancyBitmap;
use crate::command::{OrderId, Price, Quantity, Side};
use crate::config::NUM_LEVELS;
use crate::price_level::PriceLevel;

/// Index range `[min, max]` that can hold occupied levels.
///
/// An empty window has `min > max`. `min` only moves forward while matching
/// drains the front of the side; inserts widen both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveWindow {
    pub min: usize,
    pub max: usize,
}

impl ActiveWindow {
    /// Window of a side with nothing resting
    pub const EMPTY: Self = Self { min: NUM_LEVELS, max: 0 };

    /// Widen the window to cover `index`.
    #[inline]
    pub fn extend(&mut self, index: usize) {
        self.min = self.min.min(index);
        self.max = self.max.max(index);
    }

    /// True when no index can be occupied
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// True if `index` lies in `[min, max]`
    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        self.min <= index && index <= self.max
    }
}

impl Default for ActiveWindow {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// All resting liquidity for one side.
pub struct BookSide {
    side: Side,
    pub(crate) levels: Box<[PriceLevel]>,
    pub(crate) bitmap: OccupancyBitmap,
    pub(crate) window: ActiveWindow,
}

impl BookSide {
    /// Create an empty side with every level pre-allocated.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: (0..NUM_LEVELS).map(|_| PriceLevel::new()).collect(),
            bitmap: OccupancyBitmap::new(),
            window: ActiveWindow::EMPTY,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn window(&self) -> ActiveWindow {
        self.window
    }

    #[inline]
    pub fn bitmap(&self) -> &OccupancyBitmap {
        &self.bitmap
    }

    /// Level by transformed index
    #[inline]
    pub fn level(&self, index: usize) -> &PriceLevel {
        &self.levels[index]
    }

    /// Level by price
    #[inline]
    pub fn level_at(&self, price: Price) -> &PriceLevel {
        &self.levels[self.side.level_index(price)]
    }

    /// Resting volume at `price`, whether or not it lies inside the window.
    /// Saturates at `u32::MAX`; [`PriceLevel::volume`] has the exact sum.
    #[inline]
    pub fn volume_at(&self, price: Price) -> u32 {
        u32::try_from(self.level_at(price).volume()).unwrap_or(u32::MAX)
    }

    /// First occupied index inside the window, or `window.max + 1`.
    #[inline]
    pub(crate) fn first_filled(&self) -> usize {
        self.bitmap.next_filled(self.window.min, self.window.max)
    }

    /// Index of the best occupied level
    #[inline]
    pub fn best_index(&self) -> Option<usize> {
        let index = self.first_filled();
        (index <= self.window.max).then_some(index)
    }

    /// Best resting price on this side
    #[inline]
    pub fn best_price(&self) -> Option<Price> {
        self.best_index().map(|index| self.side.level_price(index))
    }

    /// Rest `quantity` of order `id` at `price`.
    ///
    /// Appends to the level FIFO, marks the level occupied and widens the
    /// window. Existing ids are never reordered.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn insert(&mut self, id: OrderId, price: Price, quantity: Quantity) {
        let index = self.side.level_index(price);
        self.levels[index].push_back(id, quantity);
        self.bitmap.set(index);
        self.window.extend(index);
    }

    /// Apply an in-place quantity change of one resting order at `price`.
    ///
    /// A level whose volume drops to zero is retired straight away: its bit
    /// is cleared, its queue reset, and the window front moved to the next
    /// occupied level.
    #[inline]
    pub fn adjust(&mut self, price: Price, old: Quantity, new: Quantity) {
        let index = self.side.level_index(price);
        let level = &mut self.levels[index];
        level.adjust(old, new);

        if level.is_empty() {
            level.reset();
            self.bitmap.clear(index);
            self.window.min = self.first_filled();
        }
    }

    /// Retire a level the matcher has just drained and step the window
    /// front past it.
    #[inline]
    pub(crate) fn retire(&mut self, index: usize) {
        self.levels[index].reset();
        self.bitmap.clear(index);
        self.window.min = index + 1;
    }

    /// Top `n` occupied levels as `(price, volume)`, best first.
    pub fn depth(&self, n: usize) -> Vec<(Price, u64)> {
        let mut out = Vec::with_capacity(n.min(NUM_LEVELS));
        let mut index = self.first_filled();
        while index <= self.window.max && out.len() < n {
            out.push((self.side.level_price(index), self.levels[index].volume()));
            index = self.bitmap.next_filled(index + 1, self.window.max);
        }
        out
    }

    /// Sum of every level's volume.
    pub fn total_volume(&self) -> u64 {
        self.levels.iter().map(PriceLevel::volume).sum()
    }

    /// Number of occupied levels
    pub fn level_count(&self) -> u32 {
        self.bitmap.count_ones()
    }

    /// Drop all resting liquidity.
    pub fn clear(&mut self) {
        for level in self.levels.iter_mut() {
            level.clear();
        }
        self.bitmap.reset();
        self.window = ActiveWindow::EMPTY;
    }
}

impl std::fmt::Debug for BookSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookSide")
            .field("side", &self.side)
            .field("best_price", &self.best_price())
            .field("levels", &self.level_count())
            .field("window", &self.window)
            .finish()
    }
}
