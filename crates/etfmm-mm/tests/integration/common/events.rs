//! Exchange event builders for integration tests.

use etfmm_core::{
    ExchangeEvent, InsertOrder, Instrument, OrderBookUpdate, OrderCommand, OrderSide,
};

/// Five-level book update with unit spacing from the given best prices.
pub fn book(instrument: Instrument, sequence: u64, best_ask: i64, best_bid: i64) -> ExchangeEvent {
    book_with_volumes(instrument, sequence, best_ask, best_bid, [10; 5], [10; 5])
}

pub fn book_with_volumes(
    instrument: Instrument,
    sequence: u64,
    best_ask: i64,
    best_bid: i64,
    ask_volumes: [i64; 5],
    bid_volumes: [i64; 5],
) -> ExchangeEvent {
    ExchangeEvent::OrderBook(OrderBookUpdate {
        instrument,
        sequence,
        ask_prices: std::array::from_fn(|i| best_ask + i as i64),
        ask_volumes,
        bid_prices: std::array::from_fn(|i| best_bid - i as i64),
        bid_volumes,
    })
}

pub fn ticks() -> ExchangeEvent {
    ExchangeEvent::TradeTicks {
        instrument: Instrument::Reference,
        ticks: Vec::new(),
    }
}

pub fn status(order_id: u64, fill_volume: i64, remaining_volume: i64) -> ExchangeEvent {
    ExchangeEvent::OrderStatus {
        order_id,
        fill_volume,
        remaining_volume,
        fees: 0,
    }
}

pub fn position(tracked: i64) -> ExchangeEvent {
    ExchangeEvent::PositionChange {
        reference_position: -tracked,
        tracked_position: tracked,
    }
}

pub fn error(order_id: u64, message: &str) -> ExchangeEvent {
    ExchangeEvent::Error {
        order_id,
        message: message.to_string(),
    }
}

/// Inserts among `commands` on `side`.
pub fn inserts(commands: &[OrderCommand], side: OrderSide) -> Vec<InsertOrder> {
    commands
        .iter()
        .filter_map(|c| match c {
            OrderCommand::Insert(order) if order.side == side => Some(order.clone()),
            _ => None,
        })
        .collect()
}

pub fn cancel_count(commands: &[OrderCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, OrderCommand::Cancel(_)))
        .count()
}
