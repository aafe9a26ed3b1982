//! Execution-related types exchanged with the connectivity layer.
//!
//! This module provides types for:
//! - Order commands the engine emits (insert / cancel)
//! - Exchange events the engine consumes (book, ticks, status, position, error)
//! - Quote skip reasons

use serde::{Deserialize, Serialize};

use crate::book::{BookSnapshot, Ladder, BOOK_DEPTH};
use crate::instrument::Instrument;
use crate::order::{Lifespan, OrderId, OrderSide};
use crate::Price;

// ============================================================================
// Order Commands
// ============================================================================

/// New limit order to be sent to the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOrder {
    /// Client order ID, fresh for every insert.
    pub id: OrderId,
    /// Order side (buy/sell).
    pub side: OrderSide,
    /// Limit price in ticks.
    pub price: Price,
    /// Order volume in lots.
    pub volume: i64,
    /// Lifespan (good-for-day for quotes).
    pub lifespan: Lifespan,
}

impl InsertOrder {
    #[must_use]
    pub fn new(id: OrderId, side: OrderSide, price: Price, volume: i64, lifespan: Lifespan) -> Self {
        Self {
            id,
            side,
            price,
            volume,
            lifespan,
        }
    }
}

/// Cancel request for a resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub id: OrderId,
}

impl CancelOrder {
    #[must_use]
    pub fn new(id: OrderId) -> Self {
        Self { id }
    }
}

/// Command produced by the engine for the connectivity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderCommand {
    Insert(InsertOrder),
    Cancel(CancelOrder),
}

impl OrderCommand {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Cancel(_) => "cancel",
        }
    }

    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Insert(order) => order.id,
            Self::Cancel(cancel) => cancel.id,
        }
    }
}

// ============================================================================
// Exchange Events
// ============================================================================

/// Five-level book update as delivered by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookUpdate {
    pub instrument: Instrument,
    pub sequence: u64,
    pub ask_prices: [i64; BOOK_DEPTH],
    pub ask_volumes: [i64; BOOK_DEPTH],
    pub bid_prices: [i64; BOOK_DEPTH],
    pub bid_volumes: [i64; BOOK_DEPTH],
}

impl OrderBookUpdate {
    /// Convert into an immutable snapshot.
    pub fn into_snapshot(self) -> BookSnapshot {
        BookSnapshot::new(
            self.instrument,
            self.sequence,
            Ladder::from_ticks(self.ask_prices, self.ask_volumes),
            Ladder::from_ticks(self.bid_prices, self.bid_volumes),
        )
    }
}

/// Lots traded at one price since the previous tick report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTick {
    pub price: Price,
    pub volume: i64,
}

/// Event delivered by the connectivity layer, one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeEvent {
    /// Periodic five-level book report for one instrument.
    OrderBook(OrderBookUpdate),
    /// Trading activity since the last report; marks the end of a period.
    TradeTicks {
        instrument: Instrument,
        #[serde(default)]
        ticks: Vec<TradeTick>,
    },
    /// Status change of one of our orders. Cancelled orders report
    /// `remaining_volume == 0`.
    OrderStatus {
        order_id: u64,
        fill_volume: i64,
        remaining_volume: i64,
        fees: i64,
    },
    /// Both legs of the position; the reference leg hedges the tracked one.
    PositionChange {
        reference_position: i64,
        tracked_position: i64,
    },
    /// Exchange-detected error. `order_id` is 0 when not order-specific.
    Error {
        #[serde(default)]
        order_id: u64,
        message: String,
    },
}

impl ExchangeEvent {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderBook(_) => "order_book",
            Self::TradeTicks { .. } => "trade_ticks",
            Self::OrderStatus { .. } => "order_status",
            Self::PositionChange { .. } => "position_change",
            Self::Error { .. } => "error",
        }
    }
}

// ============================================================================
// Skip Reasons
// ============================================================================

/// Reason a proposed quote produced no commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Target price is zero or negative.
    InvalidPrice,
    /// Position leaves no headroom on this side.
    InventoryLimit,
    /// A live order already rests at the target price.
    PriceUnchanged,
    /// Order-action budget for the period is spent.
    ActionBudgetExhausted,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPrice => "invalid_price",
            Self::InventoryLimit => "inventory_limit",
            Self::PriceUnchanged => "price_unchanged",
            Self::ActionBudgetExhausted => "action_budget_exhausted",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
