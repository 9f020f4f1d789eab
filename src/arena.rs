//! Order Arena - dense, fixed-capacity order storage addressed by id.
//!
//! Every order ever submitted keeps its slot for the whole session. The slot
//! index *is* the caller-assigned order id, so there is no id-to-slot map and
//! no free list: a lookup is a single indexed load.
//!
//! Alongside the slots the arena keeps one "used" bit per id. An id is
//! claimed when an order first enters the book and stays claimed until the
//! arena is reset, even after the order is filled or cancelled: a cancelled
//! id can still sit in a level queue behind the cursor, so handing it to a
//! new order would let the old level fill the new one.

use std::fmt;

use crate::command::{Order, OrderId};

/// Pre-allocated order storage.
///
/// Slots start zeroed (`quantity == 0`, i.e. inactive). The hot-path
/// accessors index directly; ids outside `0..capacity` are a caller bug and
/// panic on the slice bound. [`OrderArena::try_get`] is the checked form.
pub struct OrderArena {
    /// One slot per order id
    orders: Box<[Order]>,
    /// Bit per id, set once the id has been submitted
    used: Box<[u64]>,
}

impl OrderArena {
    /// Create an arena able to hold ids `0..capacity`.
    pub fn new(capacity: OrderId) -> Self {
        let slots = capacity as usize;
        Self {
            orders: vec![Order::default(); slots].into_boxed_slice(),
            used: vec![0u64; slots.div_ceil(64)].into_boxed_slice(),
        }
    }

    /// Mark `id` as submitted. Ids outside the arena panic.
    #[inline]
    pub fn claim(&mut self, id: OrderId) {
        let id = id as usize;
        self.used[id >> 6] |= 1u64 << (id & 63);
    }

    /// True if `id` has been submitted since the arena was created or reset.
    #[inline]
    pub fn is_claimed(&self, id: OrderId) -> bool {
        let id = id as usize;
        self.used
            .get(id >> 6)
            .is_some_and(|word| word & (1u64 << (id & 63)) != 0)
    }

    /// Zero every slot and release every id, keeping the allocation.
    pub fn reset(&mut self) {
        self.orders.fill(Order::default());
        self.used.fill(0);
    }

    /// Write `order` into the slot named by its id.
    ///
    /// # Complexity
    /// O(1) - direct array store
    #[inline]
    pub fn insert(&mut self, order: Order) {
        self.orders[order.id as usize] = order;
    }

    /// Get an immutable reference to an order slot.
    ///
    /// # Complexity
    /// O(1) - direct array access
    #[inline]
    pub fn get(&self, id: OrderId) -> &Order {
        &self.orders[id as usize]
    }

    /// Get a mutable reference to an order slot.
    #[inline]
    pub fn get_mut(&mut self, id: OrderId) -> &mut Order {
        &mut self.orders[id as usize]
    }

    /// Checked lookup; `None` when the id is outside the arena.
    #[inline]
    pub fn try_get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id as usize)
    }

    /// Mutable slot of an active order, if `id` is in range and active.
    #[inline]
    pub fn active_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders
            .get_mut(id as usize)
            .filter(|order| order.is_active())
    }

    /// True if `id` is in range and still has quantity.
    #[inline]
    pub fn is_active(&self, id: OrderId) -> bool {
        self.try_get(id).is_some_and(Order::is_active)
    }

    /// Returns the number of slots (the exclusive upper bound on ids).
    #[inline]
    pub fn capacity(&self) -> OrderId {
        self.orders.len() as OrderId
    }

    /// Number of active orders. Scans the whole arena.
    pub fn active_count(&self) -> usize {
        self.orders.iter().filter(|order| order.is_active()).count()
    }

    /// Iterate over every active order. Scans the whole arena.
    pub fn active(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| order.is_active())
    }

    /// Pre-fault all memory pages (warm-up routine).
    ///
    /// Touches every slot so the OS maps the pages before the first order
    /// arrives, keeping page faults out of the hot path.
    pub fn warm_up(&mut self) {
        for order in self.orders.iter_mut() {
            // Volatile read-write so the loop is not optimised away
            unsafe {
                let value = std::ptr::read_volatile(&order.quantity);
                std::ptr::write_volatile(&mut order.quantity, value);
            }
        }
    }
}

impl fmt::Debug for OrderArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderArena")
            .field("capacity", &self.capacity())
            .finish()
    }
}
