//! Event-driven market-making engine.
//!
//! Owns every piece of trading state and applies exchange events one at a
//! time. Order-book updates that make both books current at the same
//! sequence number run one pricing cycle of the configured model; the
//! resulting quote targets go through the [`QuoteManager`] and come back
//! as order commands.

use etfmm_core::{
    BookSnapshot, ExchangeEvent, Instrument, OrderCommand, OrderSide, SkipReason, TradeTick,
};
use etfmm_feed::{OrderBookCache, SnapshotOutcome};
use etfmm_telemetry::Metrics;
use tracing::{debug, info, warn};

use crate::config::{PricingMode, QuoterConfig};
use crate::fair_value::{FairValueEstimator, FairValueOutcome};
use crate::ledger::OrderLedger;
use crate::quote_manager::{QuoteManager, QuoteOutcome, QuoteTarget};
use crate::spread_bound::SpreadBoundTracker;

/// Active pricing model and its state.
#[derive(Debug)]
pub enum PricingModel {
    SpreadBound(SpreadBoundTracker),
    FairValue(FairValueEstimator),
}

impl PricingModel {
    pub fn new(mode: PricingMode) -> Self {
        match mode {
            PricingMode::SpreadBound => Self::SpreadBound(SpreadBoundTracker::new()),
            PricingMode::FairValue => Self::FairValue(FairValueEstimator::new()),
        }
    }

    pub fn mode(&self) -> PricingMode {
        match self {
            Self::SpreadBound(_) => PricingMode::SpreadBound,
            Self::FairValue(_) => PricingMode::FairValue,
        }
    }
}

/// Single owner of book cache, pricing model, quotes and ledger.
#[derive(Debug)]
pub struct MarketMaker {
    config: QuoterConfig,
    books: OrderBookCache,
    model: PricingModel,
    quotes: QuoteManager,
    ledger: OrderLedger,
}

impl MarketMaker {
    pub fn new(config: QuoterConfig) -> Self {
        let model = PricingModel::new(config.pricing_mode);
        let quotes = QuoteManager::new(&config);
        info!(
            mode = %config.pricing_mode,
            max_inventory = config.max_inventory,
            lot = quotes.lot(),
            action_ceiling = config.action_ceiling(),
            "Market maker initialized"
        );
        Self {
            config,
            books: OrderBookCache::new(),
            model,
            quotes,
            ledger: OrderLedger::new(),
        }
    }

    pub fn config(&self) -> &QuoterConfig {
        &self.config
    }

    pub fn books(&self) -> &OrderBookCache {
        &self.books
    }

    pub fn model(&self) -> &PricingModel {
        &self.model
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn quote_manager(&self) -> &QuoteManager {
        &self.quotes
    }

    pub fn position(&self) -> i64 {
        self.ledger.position()
    }

    /// Apply one exchange event and return the commands it produced.
    pub fn handle(&mut self, event: ExchangeEvent) -> Vec<OrderCommand> {
        match event {
            ExchangeEvent::OrderBook(update) => self.on_order_book(update.into_snapshot()),
            ExchangeEvent::TradeTicks { instrument, ticks } => {
                self.on_trade_ticks(instrument, &ticks);
                Vec::new()
            }
            ExchangeEvent::OrderStatus {
                order_id,
                fill_volume,
                remaining_volume,
                fees,
            } => {
                self.on_order_status(order_id, fill_volume, remaining_volume, fees);
                Vec::new()
            }
            ExchangeEvent::PositionChange {
                reference_position,
                tracked_position,
            } => {
                self.on_position_change(reference_position, tracked_position);
                Vec::new()
            }
            ExchangeEvent::Error { order_id, message } => {
                self.on_error(order_id, &message);
                Vec::new()
            }
        }
    }

    /// Store a book snapshot and, once both books line up, run a pricing cycle.
    pub fn on_order_book(&mut self, snapshot: BookSnapshot) -> Vec<OrderCommand> {
        let instrument = snapshot.instrument;
        let outcome = self.books.apply_snapshot(snapshot);
        Metrics::book_update(instrument.as_str(), outcome.is_accepted());
        if outcome != SnapshotOutcome::Accepted {
            return Vec::new();
        }

        let targets = self.price();
        let mut commands = Vec::new();
        for target in targets {
            commands.extend(self.place(target));
        }
        commands
    }

    /// Run the pricing model on the current joint books.
    fn price(&mut self) -> Vec<QuoteTarget> {
        let Some((tracked, reference)) = self.books.joint() else {
            return Vec::new();
        };
        let mode = self.model.mode().as_str();

        match &mut self.model {
            PricingModel::SpreadBound(tracker) => {
                let Some(bounds) =
                    tracker.update(tracked, reference.best_bid(), reference.best_ask())
                else {
                    Metrics::pricing_cycle(mode, false);
                    return Vec::new();
                };
                Metrics::pricing_cycle(mode, true);
                debug!(
                    sequence = tracked.sequence,
                    min_sell_diff = bounds.min_sell_diff,
                    max_buy_diff = bounds.max_buy_diff,
                    min_sell_price = %bounds.min_sell_price,
                    max_buy_price = %bounds.max_buy_price,
                    "Spread bounds updated"
                );
                vec![
                    QuoteTarget::new(OrderSide::Buy, bounds.max_buy_price),
                    QuoteTarget::new(OrderSide::Sell, bounds.min_sell_price),
                ]
            }
            PricingModel::FairValue(estimator) => {
                let own_bid = self.ledger.live_level(OrderSide::Buy);
                let own_ask = self.ledger.live_level(OrderSide::Sell);
                match estimator.update(tracked, reference, own_bid, own_ask) {
                    FairValueOutcome::Skipped => {
                        Metrics::pricing_cycle(mode, false);
                        Vec::new()
                    }
                    FairValueOutcome::WarmingUp => {
                        Metrics::pricing_cycle(mode, true);
                        debug!(
                            sequence = tracked.sequence,
                            index = estimator.moments().index(),
                            "Fair value warming up"
                        );
                        Vec::new()
                    }
                    FairValueOutcome::Forecast(signal) => {
                        Metrics::pricing_cycle(mode, true);
                        debug!(
                            sequence = tracked.sequence,
                            price_bw = signal.price_bw,
                            price_bw_future = signal.price_bw_future,
                            imbalance = signal.imbalance,
                            expected_return = signal.expected_return,
                            "Fair value forecast"
                        );
                        signal.target.into_iter().collect()
                    }
                }
            }
        }
    }

    fn place(&mut self, target: QuoteTarget) -> Vec<OrderCommand> {
        Metrics::quote_target(target.side.as_str(), target.price.ticks());
        let commands = match self.quotes.propose(target, &mut self.ledger) {
            QuoteOutcome::Placed(action) => action.into_commands(),
            QuoteOutcome::Skipped(reason) => {
                if reason != SkipReason::PriceUnchanged {
                    debug!(side = %target.side, price = %target.price, %reason, "Quote skipped");
                }
                Metrics::quote_skipped(target.side.as_str(), reason.as_str());
                Vec::new()
            }
        };
        for command in &commands {
            Metrics::order_command(command.kind(), target.side.as_str());
        }
        Metrics::action_budget_set(self.quotes.budget().used());
        commands
    }

    /// A tick report closes the current period.
    pub fn on_trade_ticks(&mut self, instrument: Instrument, ticks: &[TradeTick]) {
        let volume: i64 = ticks.iter().map(|t| t.volume).sum();
        debug!(
            instrument = %instrument,
            ticks = ticks.len(),
            volume,
            budget_used = self.quotes.budget().used(),
            "Period closed"
        );
        self.quotes.on_period_end();
        Metrics::action_budget_set(0);
    }

    pub fn on_order_status(
        &mut self,
        order_id: u64,
        fill_volume: i64,
        remaining_volume: i64,
        fees: i64,
    ) {
        if let Some(update) =
            self.ledger
                .on_order_status(order_id, fill_volume, remaining_volume, fees)
        {
            Metrics::filled(update.side.as_str(), update.newly_filled);
            if update.newly_filled > 0 {
                info!(
                    order_id,
                    side = %update.side,
                    lots = update.newly_filled,
                    remaining_volume,
                    "Quote filled"
                );
            }
        }
    }

    pub fn on_position_change(&mut self, reference_position: i64, tracked_position: i64) {
        self.ledger
            .on_position_change(reference_position, tracked_position);
        Metrics::position_set(tracked_position);
    }

    /// Log an exchange error; an order-specific one frees that order's side.
    pub fn on_error(&mut self, order_id: u64, message: &str) {
        warn!(order_id, reason = message, "Exchange reported an error");
        Metrics::order_error(order_id != 0);
        if let Some(update) = self.ledger.on_error(order_id) {
            debug!(order_id, side = %update.side, "Order treated as cancelled");
        }
    }
}
