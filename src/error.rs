//! Input-validation errors reported by `OrderBook::submit`.
//!
//! Contention inside the lock-free lists is handled by internal retry and is
//! never surfaced here.

use thiserror::Error;

/// Reasons a submission is rejected before touching any book.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Ticker symbol does not resolve to a slot in `[0, 1023]`
    #[error("ticker symbol outside the supported range")]
    InvalidTicker,
    /// Quantity must be strictly positive
    #[error("quantity must be positive")]
    InvalidQuantity,
    /// Price must be strictly positive
    #[error("price must be positive")]
    InvalidPrice,
}
