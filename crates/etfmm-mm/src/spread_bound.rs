//! Rolling spread bounds between the tracked and reference books.
//!
//! Every cycle, each present level of the tracked book contributes its
//! distance in ticks from the reference best ask and best bid. The extreme
//! distances give the tightest prices at which the engine can sell above
//! and buy below the reference market:
//!
//! - `min_sell_diff = max(min(0, min ask diff vs rA), max bid diff vs rA)`
//! - `max_buy_diff  = max(min(0, min ask diff vs rB), max bid diff vs rB)`
//! - `min_sell_price = max(0, min_sell_diff) + rA`
//! - `max_buy_price  = min(0, max_buy_diff) + rB`
//!
//! Contributions are added to counted windows and the previous cycle's
//! contributions are retracted afterwards, so the windows always describe
//! exactly the latest ladder and an extremum can loosen as well as tighten.

use std::collections::BTreeMap;

use etfmm_core::{BookSnapshot, Price};

/// Counted multiset of tick offsets with ordered extrema.
#[derive(Debug, Clone, Default)]
pub struct ExtremumWindow {
    counts: BTreeMap<i64, usize>,
}

impl ExtremumWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: i64) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// Remove one occurrence of `value`. Returns false if it was absent.
    pub fn retract(&mut self, value: i64) -> bool {
        match self.counts.get_mut(&value) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&value);
                true
            }
            None => false,
        }
    }

    pub fn min(&self) -> Option<i64> {
        self.counts.keys().next().copied()
    }

    pub fn max(&self) -> Option<i64> {
        self.counts.keys().next_back().copied()
    }

    /// Number of values held, counting repeats.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Contributions of one cycle, kept so they can be retracted next cycle.
#[derive(Debug, Clone, Default)]
struct DiffWindow {
    ask_vs_ask: Vec<i64>,
    ask_vs_bid: Vec<i64>,
    bid_vs_ask: Vec<i64>,
    bid_vs_bid: Vec<i64>,
}

/// Bounds derived from one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteBounds {
    pub min_sell_diff: i64,
    pub max_buy_diff: i64,
    /// Lowest price the engine will offer at. Never below the reference ask.
    pub min_sell_price: Price,
    /// Highest price the engine will bid at. Never above the reference bid.
    pub max_buy_price: Price,
}

impl QuoteBounds {
    /// Derive bounds from window extrema against reference prices.
    pub fn from_extrema(
        min_ask_vs_ask: Option<i64>,
        max_bid_vs_ask: Option<i64>,
        min_ask_vs_bid: Option<i64>,
        max_bid_vs_bid: Option<i64>,
        reference_bid: Price,
        reference_ask: Price,
    ) -> Self {
        let min_sell_diff = fold_bound(min_ask_vs_ask, max_bid_vs_ask);
        let max_buy_diff = fold_bound(min_ask_vs_bid, max_bid_vs_bid);
        Self {
            min_sell_diff,
            max_buy_diff,
            min_sell_price: reference_ask.offset(min_sell_diff.max(0)),
            max_buy_price: reference_bid.offset(max_buy_diff.min(0)),
        }
    }
}

/// Start from zero, pull down to the lowest ask offset, then push up to
/// the highest bid offset.
fn fold_bound(min_ask: Option<i64>, max_bid: Option<i64>) -> i64 {
    let mut bound = 0;
    if let Some(ask) = min_ask {
        bound = bound.min(ask);
    }
    if let Some(bid) = max_bid {
        bound = bound.max(bid);
    }
    bound
}

/// Tracks the spread windows across pricing cycles.
#[derive(Debug, Default)]
pub struct SpreadBoundTracker {
    /// Tracked ask prices minus reference best ask.
    ask_vs_ask: ExtremumWindow,
    /// Tracked ask prices minus reference best bid.
    ask_vs_bid: ExtremumWindow,
    /// Tracked bid prices minus reference best ask.
    bid_vs_ask: ExtremumWindow,
    /// Tracked bid prices minus reference best bid.
    bid_vs_bid: ExtremumWindow,
    previous: DiffWindow,
    bounds: Option<QuoteBounds>,
    cycles: u64,
}

impl SpreadBoundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one cycle against the tracked book and reference top of book.
    ///
    /// Returns `None` without touching any state when either reference
    /// price is zero.
    pub fn update(
        &mut self,
        tracked: &BookSnapshot,
        reference_bid: Price,
        reference_ask: Price,
    ) -> Option<QuoteBounds> {
        if reference_bid.is_zero() || reference_ask.is_zero() {
            return None;
        }

        let mut current = DiffWindow::default();
        for level in tracked.asks.levels() {
            let vs_ask = level.price.diff(reference_ask);
            let vs_bid = level.price.diff(reference_bid);
            self.ask_vs_ask.insert(vs_ask);
            self.ask_vs_bid.insert(vs_bid);
            current.ask_vs_ask.push(vs_ask);
            current.ask_vs_bid.push(vs_bid);
        }
        for level in tracked.bids.levels() {
            let vs_ask = level.price.diff(reference_ask);
            let vs_bid = level.price.diff(reference_bid);
            self.bid_vs_ask.insert(vs_ask);
            self.bid_vs_bid.insert(vs_bid);
            current.bid_vs_ask.push(vs_ask);
            current.bid_vs_bid.push(vs_bid);
        }

        let previous = std::mem::replace(&mut self.previous, current);
        retract_all(&mut self.ask_vs_ask, &previous.ask_vs_ask);
        retract_all(&mut self.ask_vs_bid, &previous.ask_vs_bid);
        retract_all(&mut self.bid_vs_ask, &previous.bid_vs_ask);
        retract_all(&mut self.bid_vs_bid, &previous.bid_vs_bid);

        let bounds = QuoteBounds::from_extrema(
            self.ask_vs_ask.min(),
            self.bid_vs_ask.max(),
            self.ask_vs_bid.min(),
            self.bid_vs_bid.max(),
            reference_bid,
            reference_ask,
        );
        self.bounds = Some(bounds);
        self.cycles += 1;
        Some(bounds)
    }

    /// Bounds from the last completed cycle.
    pub fn bounds(&self) -> Option<QuoteBounds> {
        self.bounds
    }

    /// Completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Values currently held across all four windows.
    pub fn window_len(&self) -> usize {
        self.ask_vs_ask.len() + self.ask_vs_bid.len() + self.bid_vs_ask.len() + self.bid_vs_bid.len()
    }
}

fn retract_all(window: &mut ExtremumWindow, values: &[i64]) {
    for &value in values {
        window.retract(value);
    }
}
