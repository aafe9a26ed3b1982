//! Order-book ladder and snapshot types.
//!
//! The exchange reports the five best levels per side. Ladders are fixed
//! `[_; BOOK_DEPTH]` arrays ordered best-to-worst; a level with zero volume
//! or zero price is an empty slot and is skipped by every aggregate below.

use crate::{Instrument, Price};
use serde::{Deserialize, Serialize};

/// Number of price levels reported per side.
pub const BOOK_DEPTH: usize = 5;

/// Book state for two-sidedness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// Both best bid and best ask are present.
    Valid,
    /// No bid side.
    NoBid,
    /// No ask side.
    NoAsk,
    /// Both sides missing.
    Empty,
}

impl BookState {
    pub fn is_tradeable(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
        }
    }
}

/// A single (price, volume) level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Price,
    pub volume: i64,
}

impl PriceLevel {
    /// Whether this slot holds a real level.
    pub fn is_present(&self) -> bool {
        self.volume > 0 && self.price.is_positive()
    }
}

/// One side of a book: five prices and five volumes, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ladder {
    pub prices: [Price; BOOK_DEPTH],
    pub volumes: [i64; BOOK_DEPTH],
}

impl Ladder {
    pub fn new(prices: [Price; BOOK_DEPTH], volumes: [i64; BOOK_DEPTH]) -> Self {
        Self { prices, volumes }
    }

    /// Build from raw tick prices, as delivered by the exchange.
    pub fn from_ticks(prices: [i64; BOOK_DEPTH], volumes: [i64; BOOK_DEPTH]) -> Self {
        Self {
            prices: prices.map(Price::new),
            volumes,
        }
    }

    /// Level at `index` (0 = best).
    pub fn level(&self, index: usize) -> PriceLevel {
        PriceLevel {
            price: self.prices[index],
            volume: self.volumes[index],
        }
    }

    /// Iterate over present levels, best first.
    pub fn levels(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        (0..BOOK_DEPTH)
            .map(|i| self.level(i))
            .filter(PriceLevel::is_present)
    }

    /// Best price on this side, or zero when the side is empty.
    pub fn best(&self) -> Price {
        let best = self.level(0);
        if best.is_present() {
            best.price
        } else {
            Price::ZERO
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels().next().is_none()
    }

    /// Sum of volumes over present levels. Widened so that no `i64`
    /// input can overflow.
    pub fn total_volume(&self) -> i128 {
        self.levels().map(|l| i128::from(l.volume)).sum()
    }

    /// Dot product of prices and volumes over present levels, in `i128`.
    pub fn notional(&self) -> i128 {
        self.levels()
            .map(|l| i128::from(l.price.ticks()) * i128::from(l.volume))
            .sum()
    }

    /// Copy of this ladder with `volume` removed from the level at `price`.
    ///
    /// Used to keep the engine's own resting order out of book-derived
    /// estimates. Volume is floored at zero; a price not on the ladder
    /// leaves it unchanged.
    pub fn without_own_volume(&self, price: Price, volume: i64) -> Self {
        let mut out = *self;
        if volume <= 0 {
            return out;
        }
        for i in 0..BOOK_DEPTH {
            if out.prices[i] == price && out.volumes[i] > 0 {
                out.volumes[i] = (out.volumes[i] - volume).max(0);
                break;
            }
        }
        out
    }

    /// Asks strictly increasing over present levels.
    pub fn is_ascending(&self) -> bool {
        let prices: Vec<Price> = self.levels().map(|l| l.price).collect();
        prices.windows(2).all(|w| w[0] < w[1])
    }

    /// Bids strictly decreasing over present levels.
    pub fn is_descending(&self) -> bool {
        let prices: Vec<Price> = self.levels().map(|l| l.price).collect();
        prices.windows(2).all(|w| w[0] > w[1])
    }
}

/// Full five-level snapshot of one instrument's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub instrument: Instrument,
    pub sequence: u64,
    pub asks: Ladder,
    pub bids: Ladder,
}

impl BookSnapshot {
    pub fn new(instrument: Instrument, sequence: u64, asks: Ladder, bids: Ladder) -> Self {
        Self {
            instrument,
            sequence,
            asks,
            bids,
        }
    }

    pub fn best_bid(&self) -> Price {
        self.bids.best()
    }

    pub fn best_ask(&self) -> Price {
        self.asks.best()
    }

    /// Two-sidedness of the top of book.
    pub fn state(&self) -> BookState {
        let has_bid = self.best_bid().is_positive();
        let has_ask = self.best_ask().is_positive();
        match (has_bid, has_ask) {
            (true, true) => BookState::Valid,
            (false, true) => BookState::NoBid,
            (true, false) => BookState::NoAsk,
            (false, false) => BookState::Empty,
        }
    }

    /// Whether ask prices rise and bid prices fall away from the top.
    pub fn is_well_formed(&self) -> bool {
        self.asks.is_ascending() && self.bids.is_descending()
    }

    /// Volume-weighted price across both sides.
    ///
    /// Returns `None` when no level carries volume.
    pub fn weighted_mid(&self) -> Option<f64> {
        weighted_mid(&self.asks, &self.bids)
    }
}

/// Volume-weighted average price over both ladders combined.
pub fn weighted_mid(asks: &Ladder, bids: &Ladder) -> Option<f64> {
    let volume = asks.total_volume() + bids.total_volume();
    if volume <= 0 {
        return None;
    }
    let notional = asks.notional() + bids.notional();
    Some(notional as f64 / volume as f64)
}
