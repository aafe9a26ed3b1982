//! Resting-order and position bookkeeping.
//!
//! The engine keeps at most one live order per side. Resting volume is
//! always the exchange's last reported figure, never accumulated locally.

use etfmm_core::{InsertOrder, OrderId, OrderSide, Price, PriceLevel};
use tracing::{debug, warn};

/// The engine's order on one side of the tracked book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestingOrder {
    /// `None` once the order is done or cancelled.
    pub id: Option<OrderId>,
    pub price: Price,
    /// Remaining volume as last reported.
    pub volume: i64,
    /// Cumulative filled volume as last reported.
    pub filled: i64,
}

impl RestingOrder {
    pub fn is_live(&self) -> bool {
        self.id.is_some()
    }

    /// Price and remaining volume while live.
    pub fn level(&self) -> Option<PriceLevel> {
        self.is_live().then_some(PriceLevel {
            price: self.price,
            volume: self.volume,
        })
    }
}

/// What an order-status report changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub side: OrderSide,
    /// Lots filled since the previous report for this order.
    pub newly_filled: i64,
    /// The order is finished and its side is free.
    pub closed: bool,
}

/// Bid and ask resting orders plus the tracked-instrument position.
#[derive(Debug, Default)]
pub struct OrderLedger {
    bid: RestingOrder,
    ask: RestingOrder,
    position: i64,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self, side: OrderSide) -> &RestingOrder {
        match side {
            OrderSide::Buy => &self.bid,
            OrderSide::Sell => &self.ask,
        }
    }

    fn order_mut(&mut self, side: OrderSide) -> &mut RestingOrder {
        match side {
            OrderSide::Buy => &mut self.bid,
            OrderSide::Sell => &mut self.ask,
        }
    }

    pub fn bid(&self) -> &RestingOrder {
        &self.bid
    }

    pub fn ask(&self) -> &RestingOrder {
        &self.ask
    }

    /// Net tracked-instrument position in lots.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Live order level on a side, for self-volume exclusion.
    pub fn live_level(&self, side: OrderSide) -> Option<PriceLevel> {
        self.order(side).level()
    }

    /// Record a freshly inserted order as the live order on its side.
    pub fn record_insert(&mut self, order: &InsertOrder) {
        *self.order_mut(order.side) = RestingOrder {
            id: Some(order.id),
            price: order.price,
            volume: order.volume,
            filled: 0,
        };
    }

    /// Forget the live order on a side after a cancel was sent.
    ///
    /// Later status reports for the returned id no longer match any side.
    pub fn clear(&mut self, side: OrderSide) -> Option<OrderId> {
        let order = self.order_mut(side);
        let id = order.id.take();
        order.volume = 0;
        id
    }

    fn side_of(&self, id: OrderId) -> Option<OrderSide> {
        if self.bid.id == Some(id) {
            Some(OrderSide::Buy)
        } else if self.ask.id == Some(id) {
            Some(OrderSide::Sell)
        } else {
            None
        }
    }

    /// Apply an order-status report. Unknown identifiers are ignored.
    pub fn on_order_status(
        &mut self,
        order_id: u64,
        fill_volume: i64,
        remaining_volume: i64,
        fees: i64,
    ) -> Option<StatusUpdate> {
        let id = OrderId::from_raw(order_id)?;
        let Some(side) = self.side_of(id) else {
            debug!(order_id, "Status for unknown order ignored");
            return None;
        };

        let order = self.order_mut(side);
        let newly_filled = (fill_volume - order.filled).max(0);
        order.filled = order.filled.max(fill_volume);
        order.volume = remaining_volume;
        let closed = remaining_volume == 0;
        if closed {
            order.id = None;
        }
        debug!(
            order_id,
            side = %side,
            fill_volume,
            remaining_volume,
            fees,
            "Order status applied"
        );

        Some(StatusUpdate {
            side,
            newly_filled,
            closed,
        })
    }

    /// An exchange error on an order acts as its cancellation.
    pub fn on_error(&mut self, order_id: u64) -> Option<StatusUpdate> {
        self.on_order_status(order_id, 0, 0, 0)
    }

    /// Overwrite the position from an exchange report.
    pub fn on_position_change(&mut self, reference_position: i64, tracked_position: i64) {
        if reference_position != -tracked_position {
            warn!(
                reference_position,
                tracked_position, "Hedge leg does not offset tracked position"
            );
        }
        self.position = tracked_position;
    }
}
