//! Engine - command loop around the order book with CPU pinning and warm-up.
//!
//! The engine is the single writer. It validates each command on the cold
//! path before it reaches the unchecked hot path, so a malformed command is
//! rejected instead of indexing outside the book.

use tracing::{debug, info, warn};

use crate::command::{Command, CommandOutcome, OrderId};
use crate::error::BookError;
use crate::order_book::OrderBook;

/// Running totals kept by the engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub commands: u64,
    pub matches: u64,
    pub rejected: u64,
}

/// The main engine that processes commands for one instrument.
pub struct Engine {
    /// The underlying order book
    pub book: OrderBook,
    stats: EngineStats,
}

impl Engine {
    /// Create a new engine accepting order ids `0..capacity`.
    pub fn new(capacity: OrderId) -> Self {
        Self {
            book: OrderBook::with_capacity(capacity),
            stats: EngineStats::default(),
        }
    }

    /// Run the engine event loop.
    ///
    /// # Arguments
    /// * `input` - Consumer end of the command ring buffer
    /// * `output` - Producer end of the outcome ring buffer
    /// * `pin_to_core` - Whether to pin to the last available CPU core
    ///
    /// # Note
    /// Returns once the producer side of `input` has been dropped and the
    /// buffer is drained.
    #[cfg(feature = "runtime")]
    pub fn run(
        &mut self,
        input: &mut rtrb::Consumer<Command>,
        output: &mut rtrb::Producer<CommandOutcome>,
        pin_to_core: bool,
    ) {
        if pin_to_core {
            self.pin_to_core();
        }
        self.warm_up();
        info!("engine loop started");

        // Busy-wait
        loop {
            while let Ok(cmd) = input.pop() {
                let outcome = self.process_command(cmd);
                if output.push(outcome).is_err() {
                    warn!("outcome buffer full, dropping outcome");
                }
            }
            if input.is_abandoned() && input.is_empty() {
                break;
            }
            std::hint::spin_loop();
        }

        info!(stats = ?self.stats, "engine loop stopped");
    }

    /// Process a single command and return its outcome.
    ///
    /// This is the main entry point for synchronous usage (replay, tests,
    /// benchmarks).
    #[inline]
    pub fn process_command(&mut self, cmd: Command) -> CommandOutcome {
        self.stats.commands += 1;

        let outcome = match cmd {
            Command::Match(order) => match self.book.check_incoming(&order) {
                Ok(()) => {
                    let matches = self.book.match_order(order);
                    self.stats.matches += u64::from(matches);
                    let rested = if self.book.order_exists(order.id) {
                        self.book.arena().get(order.id).quantity
                    } else {
                        0
                    };
                    CommandOutcome::Matched { matches, rested }
                }
                Err(err) => CommandOutcome::Rejected(err),
            },
            Command::Modify { id, quantity } => {
                if self.book.order_exists(id) {
                    self.book.modify_order_by_id(id, quantity);
                    CommandOutcome::Modified { id, quantity }
                } else {
                    CommandOutcome::Rejected(BookError::OrderNotFound(id))
                }
            }
        };

        if let CommandOutcome::Rejected(err) = &outcome {
            self.stats.rejected += 1;
            debug!(?cmd, %err, "command rejected");
        }
        outcome
    }

    /// Pin the current thread to the last available CPU core.
    ///
    /// The last core is typically isolated from OS interrupts.
    pub fn pin_to_core(&self) {
        match core_affinity::get_core_ids().and_then(|ids| ids.last().copied()) {
            Some(core) if core_affinity::set_for_current(core) => {
                info!(core = core.id, "pinned engine thread");
            }
            _ => warn!("could not pin engine thread"),
        }
    }

    /// Warm up the engine by pre-faulting memory pages.
    pub fn warm_up(&mut self) {
        self.book.warm_up();
    }

    #[inline]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Compute a hash of the current state (for determinism testing)
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        for side in [crate::command::Side::Buy, crate::command::Side::Sell] {
            let book_side = self.book.side(side);
            book_side.best_price().hash(&mut hasher);
            book_side.depth(usize::MAX).hash(&mut hasher);
        }
        for order in self.book.arena().active() {
            order.hash(&mut hasher);
        }

        hasher.finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            book: OrderBook::new(),
            stats: EngineStats::default(),
        }
    }
}
