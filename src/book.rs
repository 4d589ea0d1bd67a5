//! Order Book - 1024 fixed ticker slots, each holding one buy list and one
//! sell list.
//!
//! Built once at startup and shared by reference; producers call [`submit`]
//! from any number of threads with no lock anywhere. A fixed array indexed by
//! the resolved ticker slot replaces any associative container.
//!
//! [`submit`]: OrderBook::submit

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use tracing::trace;

use crate::error::SubmitError;
use crate::list::{OrderView, PriceOrderedList, SortOrder};
use crate::order::{Order, Side};
use crate::ticker::{TickerId, TickerRegistry, TICKER_SLOTS};

/// Both sides of one ticker's book.
struct TickerBook {
    buys: PriceOrderedList,
    sells: PriceOrderedList,
}

impl TickerBook {
    fn new() -> Self {
        Self {
            buys: PriceOrderedList::new(SortOrder::PriceDescending),
            sells: PriceOrderedList::new(SortOrder::PriceAscending),
        }
    }

    fn side(&self, side: Side) -> &PriceOrderedList {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }
}

/// The full multi-ticker limit order book.
pub struct OrderBook {
    registry: TickerRegistry,
    /// One padded slot per ticker so contended heads never share a cache line
    slots: Box<[CachePadded<TickerBook>]>,
    /// Monotonic sequence source for price-time tie-breaking
    next_seq: AtomicU64,
}

impl OrderBook {
    /// Create an empty book with all 1024 ticker slots.
    pub fn new() -> Self {
        let slots = (0..TICKER_SLOTS)
            .map(|_| CachePadded::new(TickerBook::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            registry: TickerRegistry::new(),
            slots,
            next_seq: AtomicU64::new(1),
        }
    }

    /// Submit a limit order.
    ///
    /// Validates the ticker symbol, then quantity, then price; nothing is
    /// mutated when validation fails. On success the order is published into
    /// the matching side's list and the assigned sequence number is returned
    /// (diagnostics only; there is no cancellation).
    pub fn submit(
        &self,
        side: Side,
        symbol: &str,
        quantity: u64,
        price: u64,
    ) -> Result<u64, SubmitError> {
        let ticker = self.registry.resolve(symbol)?;
        self.submit_resolved(side, ticker, quantity, price)
    }

    /// Submit with an already-resolved ticker slot.
    pub fn submit_resolved(
        &self,
        side: Side,
        ticker: TickerId,
        quantity: u64,
        price: u64,
    ) -> Result<u64, SubmitError> {
        if quantity == 0 {
            return Err(SubmitError::InvalidQuantity);
        }
        if price == 0 {
            return Err(SubmitError::InvalidPrice);
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let order = Order::new(seq, side, ticker, quantity, price);
        self.slots[ticker.index()].side(side).insert(order);
        trace!(seq, ?side, slot = ticker.index(), quantity, price, "order accepted");
        Ok(seq)
    }

    /// The ticker registry this book resolves symbols through.
    pub fn registry(&self) -> &TickerRegistry {
        &self.registry
    }

    pub(crate) fn sides(&self, ticker: TickerId) -> (&PriceOrderedList, &PriceOrderedList) {
        let slot = &self.slots[ticker.index()];
        (&slot.buys, &slot.sells)
    }

    /// Best (highest) resting buy price for a ticker.
    pub fn best_buy(&self, ticker: TickerId) -> Option<u64> {
        self.slots[ticker.index()].buys.best_price()
    }

    /// Best (lowest) resting sell price for a ticker.
    pub fn best_sell(&self, ticker: TickerId) -> Option<u64> {
        self.slots[ticker.index()].sells.best_price()
    }

    /// Point-in-time view of one side of one ticker, in priority order.
    pub fn side_snapshot(&self, ticker: TickerId, side: Side) -> Vec<OrderView> {
        self.slots[ticker.index()].side(side).snapshot()
    }

    /// Number of live orders resting on one side of one ticker.
    pub fn side_len(&self, ticker: TickerId, side: Side) -> usize {
        self.slots[ticker.index()].side(side).len()
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
            .field("slots", &self.slots.len())
            .field("next_seq", &self.next_seq.load(Ordering::Relaxed))
            .finish()
    }
}
