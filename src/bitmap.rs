//! Occupancy Bitmap - one bit per price level, scanned with `trailing_zeros`.
//!
//! A set bit means the level holds resting volume. Finding the best level is
//! a masked word load plus a count-trailing-zeros (BSF/TZCNT on x86, RBIT+CLZ
//! on ARM), then whole-word steps over empty runs. Cost is proportional to
//! the number of empty *words* skipped, not empty levels.

use crate::config::NUM_WORDS;

/// Fixed-size occupancy bitset covering every level of one side.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OccupancyBitmap {
    words: [u64; NUM_WORDS],
}

impl OccupancyBitmap {
    /// Create an empty bitmap
    #[inline]
    pub const fn new() -> Self {
        Self { words: [0; NUM_WORDS] }
    }

    /// Mark level `index` occupied.
    #[inline]
    pub fn set(&mut self, index: usize) {
        self.words[index >> 6] |= 1u64 << (index & 63);
    }

    /// Mark level `index` empty.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.words[index >> 6] &= !(1u64 << (index & 63));
    }

    /// True if level `index` is marked occupied
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        self.words[index >> 6] & (1u64 << (index & 63)) != 0
    }

    /// Smallest occupied index in `start..=max`, or `max + 1` if there is none.
    ///
    /// The sentinel lets callers drive their scan with a plain `idx <= max`
    /// bound instead of unwrapping an `Option` in the loop.
    #[inline]
    pub fn next_filled(&self, start: usize, max: usize) -> usize {
        let none = max + 1;
        if start > max {
            return none;
        }

        let mut w = start >> 6;
        if w >= NUM_WORDS {
            return none;
        }
        // Drop bits below `start` in the first word
        let mut word = self.words[w] & (!0u64 << (start & 63));

        loop {
            if word != 0 {
                let index = (w << 6) + word.trailing_zeros() as usize;
                return if index <= max { index } else { none };
            }
            w += 1;
            if w >= NUM_WORDS || (w << 6) > max {
                return none;
            }
            word = self.words[w];
        }
    }

    /// Number of occupied levels
    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|word| word.count_ones()).sum()
    }

    /// True if no level is occupied
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Clear every bit
    pub fn reset(&mut self) {
        self.words = [0; NUM_WORDS];
    }

    /// Iterate over occupied indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                // Clear lowest set bit
                rest &= rest - 1;
                Some((w << 6) + bit)
            })
        })
    }
}

impl Default for OccupancyBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OccupancyBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
