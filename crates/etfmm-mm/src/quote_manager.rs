//! Quote placement under inventory and action-budget limits.
//!
//! A proposal names a side and a target price. It becomes a cancel of the
//! live order on that side (if any) followed by a fresh insert, unless one
//! of these holds, checked in order:
//! 1. the target price is not positive
//! 2. the position leaves no headroom on that side
//! 3. a live order already rests at the target price
//! 4. the period's action budget is spent

use etfmm_core::{
    CancelOrder, InsertOrder, Lifespan, OrderCommand, OrderIdGenerator, OrderSide, Price,
    SkipReason,
};
use tracing::{debug, info};

use crate::config::QuoterConfig;
use crate::ledger::OrderLedger;

/// Desired quote on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTarget {
    pub side: OrderSide,
    pub price: Price,
}

impl QuoteTarget {
    pub fn new(side: OrderSide, price: Price) -> Self {
        Self { side, price }
    }
}

/// Cancel-then-insert produced by an accepted proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteAction {
    pub cancel: Option<CancelOrder>,
    pub insert: InsertOrder,
}

impl QuoteAction {
    /// Commands in the order they must reach the exchange.
    pub fn into_commands(self) -> Vec<OrderCommand> {
        let mut commands = Vec::with_capacity(2);
        if let Some(cancel) = self.cancel {
            commands.push(OrderCommand::Cancel(cancel));
        }
        commands.push(OrderCommand::Insert(self.insert));
        commands
    }
}

/// Result of a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    Placed(QuoteAction),
    Skipped(SkipReason),
}

/// Insert and cancel actions spent in the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionBudget {
    used: u32,
    ceiling: u32,
}

impl ActionBudget {
    pub fn new(ceiling: u32) -> Self {
        Self { used: 0, ceiling }
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.ceiling
    }

    fn spend(&mut self) {
        self.used += 1;
    }

    /// Start a new period.
    pub fn reset(&mut self) {
        self.used = 0;
    }
}

/// Turns quote targets into order commands.
#[derive(Debug)]
pub struct QuoteManager {
    max_inventory: i64,
    lot: i64,
    lifespan: Lifespan,
    budget: ActionBudget,
    ids: OrderIdGenerator,
}

impl QuoteManager {
    pub fn new(config: &QuoterConfig) -> Self {
        Self {
            max_inventory: config.max_inventory,
            lot: config.lot(),
            lifespan: config.lifespan,
            budget: ActionBudget::new(config.action_ceiling()),
            ids: OrderIdGenerator::new(),
        }
    }

    pub fn budget(&self) -> &ActionBudget {
        &self.budget
    }

    pub fn lot(&self) -> i64 {
        self.lot
    }

    /// Volume a new order on `side` may carry at `position`.
    pub fn headroom(&self, side: OrderSide, position: i64) -> i64 {
        let room = match side {
            OrderSide::Buy => self.max_inventory - position,
            OrderSide::Sell => self.max_inventory + position,
        };
        room.min(self.lot)
    }

    /// Offer a target; on success the ledger already reflects the action.
    pub fn propose(&mut self, target: QuoteTarget, ledger: &mut OrderLedger) -> QuoteOutcome {
        let QuoteTarget { side, price } = target;

        if !price.is_positive() {
            return QuoteOutcome::Skipped(SkipReason::InvalidPrice);
        }

        let volume = self.headroom(side, ledger.position());
        if volume <= 0 {
            debug!(side = %side, position = ledger.position(), "No inventory headroom");
            return QuoteOutcome::Skipped(SkipReason::InventoryLimit);
        }

        let resting = *ledger.order(side);
        if resting.is_live() && resting.price == price {
            return QuoteOutcome::Skipped(SkipReason::PriceUnchanged);
        }

        if self.budget.is_exhausted() {
            debug!(
                side = %side,
                used = self.budget.used(),
                ceiling = self.budget.ceiling(),
                "Action budget exhausted"
            );
            return QuoteOutcome::Skipped(SkipReason::ActionBudgetExhausted);
        }

        let cancel = ledger.clear(side).map(|id| {
            self.budget.spend();
            CancelOrder::new(id)
        });

        let insert = InsertOrder::new(self.ids.next_id(), side, price, volume, self.lifespan);
        ledger.record_insert(&insert);
        self.budget.spend();

        info!(
            side = %side,
            price = %price,
            volume,
            order_id = %insert.id,
            replaced = ?cancel.map(|c| c.id.get()),
            "Quote placed"
        );

        QuoteOutcome::Placed(QuoteAction { cancel, insert })
    }

    /// End of a trading period: the action budget starts over.
    pub fn on_period_end(&mut self) {
        self.budget.reset();
    }
}
