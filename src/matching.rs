//! Matching Engine - pairs crossing orders per ticker.
//!
//! A sweep repeatedly reads the best buy and best sell of one slot, matches
//! while the buy price is at or above the sell price, and retires fully
//! filled orders from the head of their list. Sweeps never block producers
//! and producers never block sweeps; every step is a CAS validated against
//! the value just observed, restarted on conflict with fresh reads.

use std::sync::Arc;

use crossbeam_epoch as epoch;
use tracing::debug;

use crate::book::OrderBook;
use crate::order::MatchEvent;
use crate::ticker::{TickerId, TICKER_SLOTS};

/// Drives matching sweeps over an [`OrderBook`].
pub struct MatchingEngine {
    book: Arc<OrderBook>,
}

impl MatchingEngine {
    pub fn new(book: Arc<OrderBook>) -> Self {
        Self { book }
    }

    /// The book this engine sweeps.
    pub fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    /// Sweep every ticker slot in slot order.
    ///
    /// No ordering is guaranteed across slots; their books are fully
    /// independent. Completes in time proportional to the orders matched.
    pub fn sweep_all(&self) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        for ticker in (0..TICKER_SLOTS).filter_map(TickerId::from_index) {
            self.sweep_into(ticker, &mut events);
        }
        events
    }

    /// Match crossing orders for one ticker until no cross remains or a side
    /// empties.
    ///
    /// May also stop early at a front order another sweep is mid-fill on;
    /// a later sweep picks up whatever that one leaves behind.
    pub fn sweep_ticker(&self, ticker: TickerId) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        self.sweep_into(ticker, &mut events);
        events
    }

    fn sweep_into(&self, ticker: TickerId, events: &mut Vec<MatchEvent>) {
        let (buys, sells) = self.book.sides(ticker);
        let guard = epoch::pin();
        loop {
            let Some((buy_node, buy)) = buys.front(&guard) else { break };
            let Some((sell_node, sell)) = sells.front(&guard) else { break };
            if buy.price < sell.price {
                break; // no cross
            }

            let buy_remaining = buy.remaining();
            let sell_remaining = sell.remaining();
            // A zero-remaining front belongs to whichever sweep drove it to
            // zero: either a completed fill about to be retired, or a
            // reservation whose opposite-side CAS is still in flight and may
            // be returned by `unfill`. Only the owner may retire it, so stop
            // here; the next sweep re-reads after the owner's two-phase step
            // lands.
            if buy_remaining == 0 || sell_remaining == 0 {
                break;
            }

            let quantity = buy_remaining.min(sell_remaining);
            // Two independent CAS-validated decrements. Each can only lose
            // to another sweeper; on conflict restart the iteration with
            // fresh reads, returning the buy reservation if the sell side
            // was the one that moved.
            if !buy.try_fill(buy_remaining, quantity) {
                continue;
            }
            if !sell.try_fill(sell_remaining, quantity) {
                buy.unfill(quantity);
                continue;
            }

            // Execution at the resting sell's price
            events.push(MatchEvent {
                ticker,
                quantity,
                price: sell.price,
                buy_seq: buy.seq,
                sell_seq: sell.seq,
            });
            debug!(
                slot = ticker.index(),
                quantity,
                price = sell.price,
                buy_seq = buy.seq,
                sell_seq = sell.seq,
                "matched"
            );

            if buy_remaining == quantity {
                buys.remove_head_if(buy_node, &guard);
            }
            if sell_remaining == quantity {
                sells.remove_head_if(sell_node, &guard);
            }
        }
    }
}
