//! Fair-value forecast from volume-weighted prices.
//!
//! Each cycle computes the volume-weighted price of the tracked book (with
//! the engine's own resting volume taken out) and of the reference book.
//! The log return of the tracked price, net of the previous cycle's volume
//! imbalance, feeds a running mean and variance. Once enough history has
//! accumulated the expected return
//!
//! ```text
//! expected = imbalance + mean + variance / 2
//! ```
//!
//! selects a single side to quote:
//! - `expected > 0`: bid at `floor(exp(expected) * price_bw + rB - price_bw_future)`
//! - `expected < 0`: offer at `ceil(exp(expected) * price_bw + rA - price_bw_future)`

use etfmm_core::{weighted_mid, BookSnapshot, OrderSide, Price, PriceLevel};

use crate::quote_manager::QuoteTarget;
use tracing::warn;

/// Cycle index a forecast requires before it is trusted.
const WARMUP_INDEX: u64 = 3;

/// Running mean and variance with a 1-based cycle index.
///
/// The index advances on every cycle, including cycles that carry no
/// sample. At index `n`:
/// - `n >= 3`: `variance = ((n-3) * variance + (x - mean)^2) / (n-2)`
/// - `n >= 2`: `mean = ((n-2) * mean + x) / (n-1)`
///
/// The variance uses the mean from before this sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningMoments {
    index: u64,
    mean: f64,
    variance: f64,
}

impl Default for RunningMoments {
    fn default() -> Self {
        Self {
            index: 1,
            mean: 0.0,
            variance: 0.0,
        }
    }
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Fold in one sample and advance the index.
    pub fn observe(&mut self, sample: f64) {
        let n = self.index as f64;
        if self.index >= 3 {
            let deviation = sample - self.mean;
            self.variance = ((n - 3.0) * self.variance + deviation * deviation) / (n - 2.0);
        }
        if self.index >= 2 {
            self.mean = ((n - 2.0) * self.mean + sample) / (n - 1.0);
        }
        self.index += 1;
    }

    /// Advance the index without a sample.
    pub fn skip(&mut self) {
        self.index += 1;
    }
}

/// Everything one forecasting cycle computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairValueSignal {
    /// Weighted price of the tracked book, own volume excluded.
    pub price_bw: f64,
    /// Weighted price of the reference book.
    pub price_bw_future: f64,
    /// `(bid volume - ask volume) / total volume` on the tracked book.
    pub imbalance: f64,
    pub expected_return: f64,
    /// `None` when the expected return is exactly zero or the projected
    /// price does not fit in a tick price.
    pub target: Option<QuoteTarget>,
}

/// Result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FairValueOutcome {
    /// Zero or undefined weighted price. Only the index advanced.
    Skipped,
    /// Moments updated; not enough history to forecast yet.
    WarmingUp,
    Forecast(FairValueSignal),
}

/// Log-return forecaster over the tracked and reference books.
#[derive(Debug, Default)]
pub struct FairValueEstimator {
    moments: RunningMoments,
    prev_price_bw: Option<f64>,
    prev_imbalance: f64,
    last_signal: Option<FairValueSignal>,
}

impl FairValueEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moments(&self) -> &RunningMoments {
        &self.moments
    }

    /// Signal from the latest forecasting cycle.
    pub fn last_signal(&self) -> Option<FairValueSignal> {
        self.last_signal
    }

    /// Run one cycle.
    ///
    /// `own_bid` and `own_ask` are the engine's live resting orders on the
    /// tracked instrument; their volume is removed from the matching
    /// tracked level before any estimate is taken.
    pub fn update(
        &mut self,
        tracked: &BookSnapshot,
        reference: &BookSnapshot,
        own_bid: Option<PriceLevel>,
        own_ask: Option<PriceLevel>,
    ) -> FairValueOutcome {
        let cycle_index = self.moments.index();

        let mut asks = tracked.asks;
        if let Some(own) = own_ask {
            asks = asks.without_own_volume(own.price, own.volume);
        }
        let mut bids = tracked.bids;
        if let Some(own) = own_bid {
            bids = bids.without_own_volume(own.price, own.volume);
        }

        let price_bw = weighted_mid(&asks, &bids).filter(|p| *p > 0.0);
        let price_bw_future = reference.weighted_mid().filter(|p| *p > 0.0);
        let (Some(price_bw), Some(price_bw_future)) = (price_bw, price_bw_future) else {
            self.moments.skip();
            return FairValueOutcome::Skipped;
        };

        let bid_volume = bids.total_volume() as f64;
        let ask_volume = asks.total_volume() as f64;
        let imbalance = (bid_volume - ask_volume) / (bid_volume + ask_volume);

        match self.prev_price_bw {
            Some(prev) => {
                let log_return = (price_bw / prev).ln();
                self.moments.observe(log_return - self.prev_imbalance);
            }
            None => self.moments.skip(),
        }
        self.prev_price_bw = Some(price_bw);
        self.prev_imbalance = imbalance;

        if cycle_index <= WARMUP_INDEX {
            return FairValueOutcome::WarmingUp;
        }

        let expected_return = imbalance + self.moments.mean() + self.moments.variance() / 2.0;
        let projected = expected_return.exp() * price_bw;
        let target = if expected_return > 0.0 {
            Price::checked_floor(projected + reference.best_bid().as_f64() - price_bw_future)
                .map(|price| QuoteTarget::new(OrderSide::Buy, price))
        } else if expected_return < 0.0 {
            Price::checked_ceil(projected + reference.best_ask().as_f64() - price_bw_future)
                .map(|price| QuoteTarget::new(OrderSide::Sell, price))
        } else {
            None
        };
        if target.is_none() && expected_return != 0.0 {
            warn!(
                expected_return,
                price_bw, "Projected fair value is not a representable price"
            );
        }

        let signal = FairValueSignal {
            price_bw,
            price_bw_future,
            imbalance,
            expected_return,
            target,
        };
        self.last_signal = Some(signal);
        FairValueOutcome::Forecast(signal)
    }
}
