//! # Atomic-LOB
//!
//! A lock-free, multi-ticker limit order matching core.
//!
//! ## Design Principles
//!
//! - **Lock-Free**: every shared mutation is a single-word CAS; conflicts
//!   restart from a freshly read head, never block
//! - **No Dictionaries**: 1024 fixed ticker slots with direct array indexing;
//!   each side of a book is a price-ordered singly linked list
//! - **Price-Time Priority**: better price first, earlier sequence number
//!   first among equals
//! - **Epoch Reclamation**: retired nodes are freed only once no in-flight
//!   traversal can still reach them
//!
//! ## Architecture
//!
//! ```text
//! [Producer Threads] --submit--> [OrderBook: 1024 x (buy list, sell list)]
//!                                         ^
//! [Sweep Thread] ---sweep_all---> [MatchingEngine] --> [MatchEvents]
//! ```

pub mod book;
pub mod error;
pub mod list;
pub mod matching;
pub mod order;
pub mod ticker;

// Re-exports for convenience
pub use book::OrderBook;
pub use error::SubmitError;
pub use list::{OrderView, PriceOrderedList, SortOrder};
pub use matching::MatchingEngine;
pub use order::{MatchEvent, Order, Side};
pub use ticker::{TickerId, TickerRegistry, TICKER_SLOTS};
