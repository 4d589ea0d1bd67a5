//! Shared data model: order sides, resting orders, and match events.
//!
//! An `Order` is immutable after creation except for its remaining quantity,
//! which only the matching engine mutates through CAS-validated decrements.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ticker::TickerId;

/// Order side (bid = buy, ask = sell)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    Buy = 0,
    /// Sell side (asks)
    Sell = 1,
}

/// A resting limit order.
///
/// `seq` is assigned from one shared monotonic counter at submission and
/// breaks ties between equal-price orders (earlier submission ranks first).
#[derive(Debug)]
pub struct Order {
    /// Monotonic sequence number; identity and tie-break, not a lookup key
    pub seq: u64,
    /// Buy or Sell
    pub side: Side,
    /// Resolved book slot
    pub ticker: TickerId,
    /// Quantity at submission
    pub original_qty: u64,
    /// Quantity still unmatched
    remaining: AtomicU64,
    /// Fixed-point limit price, immutable after creation
    pub price: u64,
}

impl Order {
    pub(crate) fn new(seq: u64, side: Side, ticker: TickerId, quantity: u64, price: u64) -> Self {
        Self {
            seq,
            side,
            ticker,
            original_qty: quantity,
            remaining: AtomicU64::new(quantity),
            price,
        }
    }

    /// Current unmatched quantity
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Decrement the remaining quantity by exactly `qty`, validated against
    /// the value the caller observed.
    ///
    /// Returns `false` if the remaining quantity changed concurrently; the
    /// caller must re-read and recompute rather than blindly subtract.
    #[inline]
    pub(crate) fn try_fill(&self, observed: u64, qty: u64) -> bool {
        debug_assert!(qty > 0 && qty <= observed, "fill exceeds observed remaining");
        self.remaining
            .compare_exchange(observed, observed - qty, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// Return a reserved quantity after a two-phase match attempt lost the
    /// race on the other side.
    #[inline]
    pub(crate) fn unfill(&self, qty: u64) {
        self.remaining.fetch_add(qty, Ordering::AcqRel);
    }
}

/// A single execution pairing one buy and one sell order.
///
/// Produced transiently per match and handed to the sweep caller; never
/// persisted by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchEvent {
    /// Slot the match occurred in
    pub ticker: TickerId,
    /// Matched quantity
    pub quantity: u64,
    /// Execution price: the resting sell's limit price
    pub price: u64,
    /// Sequence number of the buy order
    pub buy_seq: u64,
    /// Sequence number of the sell order
    pub sell_seq: u64,
}
