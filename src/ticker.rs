//! Ticker Registry - maps ticker symbols to dense book slots.
//!
//! Symbols follow the `TICK<n>` scheme with `n` in `[0, 1023]`. Resolution is
//! direct byte-wise digit decoding: deterministic, allocation-free, and no
//! associative lookup anywhere.

use crate::error::SubmitError;

/// Number of tradable instruments (fixed at construction)
pub const TICKER_SLOTS: usize = 1024;

/// Dense integer identifier for a tradable instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickerId(u16);

impl TickerId {
    /// Build a ticker ID from a dense slot index.
    ///
    /// Returns `None` if the index is outside `[0, 1023]`.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < TICKER_SLOTS).then(|| Self(index as u16))
    }

    /// The slot index in `[0, 1023]`
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", TickerRegistry::SYMBOL_PREFIX, self.0)
    }
}

/// Resolves ticker symbols to slots without a hash table.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickerRegistry;

impl TickerRegistry {
    /// Fixed symbol prefix; the suffix is the decimal slot index.
    pub const SYMBOL_PREFIX: &'static str = "TICK";

    pub const fn new() -> Self {
        Self
    }

    /// Resolve a symbol to its slot.
    ///
    /// Fails with [`SubmitError::InvalidTicker`] for any symbol that is not
    /// `TICK<n>` with `n` in `[0, 1023]`. Must be (and is) called before any
    /// book list is touched.
    pub fn resolve(&self, symbol: &str) -> Result<TickerId, SubmitError> {
        let digits = symbol
            .strip_prefix(Self::SYMBOL_PREFIX)
            .ok_or(SubmitError::InvalidTicker)?;
        if digits.is_empty() || digits.len() > 4 {
            return Err(SubmitError::InvalidTicker);
        }
        let mut slot = 0usize;
        for byte in digits.bytes() {
            if !byte.is_ascii_digit() {
                return Err(SubmitError::InvalidTicker);
            }
            slot = slot * 10 + (byte - b'0') as usize;
        }
        TickerId::from_index(slot).ok_or(SubmitError::InvalidTicker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_valid_symbols() {
        let registry = TickerRegistry::new();
        assert_eq!(registry.resolve("TICK0"), Ok(TickerId(0)));
        assert_eq!(registry.resolve("TICK42"), Ok(TickerId(42)));
        assert_eq!(registry.resolve("TICK1023"), Ok(TickerId(1023)));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let registry = TickerRegistry::new();
        assert_eq!(registry.resolve("TICK1024"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("TICK9999"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("TICK10240"), Err(SubmitError::InvalidTicker));
    }

    #[test]
    fn test_resolve_malformed_symbols() {
        let registry = TickerRegistry::new();
        assert_eq!(registry.resolve(""), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("TICK"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("TICKx"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("TICK-1"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("TICK 5"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("AAPL"), Err(SubmitError::InvalidTicker));
        assert_eq!(registry.resolve("tick5"), Err(SubmitError::InvalidTicker));
    }

    #[test]
    fn test_leading_zeros_stay_in_range() {
        let registry = TickerRegistry::new();
        // "TICK0007" decodes to slot 7; still four digits, still in range
        assert_eq!(registry.resolve("TICK0007"), Ok(TickerId(7)));
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(TickerId::from_index(0), Some(TickerId(0)));
        assert_eq!(TickerId::from_index(1023), Some(TickerId(1023)));
        assert_eq!(TickerId::from_index(1024), None);
    }

    #[test]
    fn test_display_round_trips() {
        let registry = TickerRegistry::new();
        let id = TickerId::from_index(317).unwrap();
        assert_eq!(registry.resolve(&id.to_string()), Ok(id));
    }
}
