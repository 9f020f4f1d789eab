//! Cold-path error types.
//!
//! The hot path (`match_order`, `modify_order_by_id`, `get_volume_at_level`)
//! never returns these; callers uphold the id and price domain instead.

use crate::command::{OrderId, Price};
use crate::config::{MAX_PRICE, MIN_PRICE};

/// Failures reported by lookups and by pre-trade validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum BookError {
    /// Id is out of range or the order has no remaining quantity
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order id {id} exceeds arena capacity {capacity}")]
    IdOutOfRange { id: OrderId, capacity: OrderId },

    #[error("price {0} outside [{min}, {max}]", min = MIN_PRICE, max = MAX_PRICE)]
    PriceOutOfRange(Price),

    #[error("order {0} has zero quantity")]
    ZeroQuantity(OrderId),

    /// An active order already occupies this id
    #[error("order {0} is already active")]
    DuplicateOrderId(OrderId),

    /// The id belonged to an earlier order that has since been filled or
    /// cancelled; ids are single-use until the book is cleared
    #[error("order id {0} was already used")]
    OrderIdReused(OrderId),
}

/// Result type for cold-path book operations
pub type BookResult<T> = Result<T, BookError>;
