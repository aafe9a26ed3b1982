//! Event decoding for the stdio bridge.
//!
//! The connectivity layer writes one JSON-encoded `ExchangeEvent` per line.
//! Decoding checks the values the engine relies on (non-negative prices and
//! volumes) so malformed input is rejected here instead of reaching pricing.

use crate::error::{FeedError, FeedResult};
use etfmm_core::ExchangeEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Counters for decoded and rejected lines.
#[derive(Debug, Default)]
pub struct ParseStats {
    parsed: AtomicU64,
    rejected: AtomicU64,
}

impl ParseStats {
    pub fn parsed(&self) -> u64 {
        self.parsed.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

/// Decodes newline-delimited exchange events.
#[derive(Debug, Default)]
pub struct EventParser {
    stats: ParseStats,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Decode one line. Blank lines yield `Ok(None)`.
    pub fn parse_line(&self, line: &str) -> FeedResult<Option<ExchangeEvent>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let result = serde_json::from_str::<ExchangeEvent>(line)
            .map_err(FeedError::from)
            .and_then(|event| validate(&event).map(|()| event));

        match result {
            Ok(event) => {
                self.stats.parsed.fetch_add(1, Ordering::Relaxed);
                Ok(Some(event))
            }
            Err(e) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Rejected event line");
                Err(e)
            }
        }
    }
}

fn validate(event: &ExchangeEvent) -> FeedResult<()> {
    match event {
        ExchangeEvent::OrderBook(update) => {
            let prices = update.ask_prices.iter().chain(update.bid_prices.iter());
            if prices.copied().any(|p| p < 0) {
                return Err(FeedError::InvalidData(format!(
                    "negative price in {} book at sequence {}",
                    update.instrument, update.sequence
                )));
            }
            let volumes = update.ask_volumes.iter().chain(update.bid_volumes.iter());
            if volumes.copied().any(|v| v < 0) {
                return Err(FeedError::InvalidData(format!(
                    "negative volume in {} book at sequence {}",
                    update.instrument, update.sequence
                )));
            }
        }
        ExchangeEvent::OrderStatus {
            order_id,
            fill_volume,
            remaining_volume,
            ..
        } => {
            if *fill_volume < 0 || *remaining_volume < 0 {
                return Err(FeedError::InvalidData(format!(
                    "negative volume in status for order {order_id}"
                )));
            }
        }
        ExchangeEvent::TradeTicks { ticks, .. } => {
            if ticks.iter().any(|t| t.volume < 0) {
                return Err(FeedError::InvalidData(
                    "negative trade tick volume".to_string(),
                ));
            }
        }
        ExchangeEvent::PositionChange { .. } | ExchangeEvent::Error { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfmm_core::Instrument;

    #[test]
    fn test_parse_book_update() {
        let parser = EventParser::new();
        let line = r#"{"type":"order_book","instrument":"tracked","sequence":3,
            "ask_prices":[101,102,103,104,105],"ask_volumes":[1,1,1,1,1],
            "bid_prices":[99,98,97,96,95],"bid_volumes":[1,1,1,1,1]}"#
            .replace('\n', "");

        let event = parser.parse_line(&line).unwrap().unwrap();
        match event {
            ExchangeEvent::OrderBook(update) => {
                assert_eq!(update.instrument, Instrument::Tracked);
                assert_eq!(update.sequence, 3);
                assert_eq!(update.bid_prices[0], 99);
            }
            other => panic!("Expected order book, got {other:?}"),
        }
        assert_eq!(parser.stats().parsed(), 1);
    }

    #[test]
    fn test_parse_blank_line() {
        let parser = EventParser::new();
        assert!(parser.parse_line("   ").unwrap().is_none());
        assert_eq!(parser.stats().parsed(), 0);
    }

    #[test]
    fn test_parse_order_status() {
        let parser = EventParser::new();
        let event = parser
            .parse_line(r#"{"type":"order_status","order_id":4,"fill_volume":2,"remaining_volume":0,"fees":-1}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            ExchangeEvent::OrderStatus {
                order_id: 4,
                fill_volume: 2,
                remaining_volume: 0,
                fees: -1
            }
        );
    }

    #[test]
    fn test_reject_malformed_json() {
        let parser = EventParser::new();
        let err = parser.parse_line("{not json").unwrap_err();
        assert!(matches!(err, FeedError::Json(_)));
        assert_eq!(parser.stats().rejected(), 1);
    }

    #[test]
    fn test_reject_short_ladder() {
        let parser = EventParser::new();
        let line = r#"{"type":"order_book","instrument":"reference","sequence":1,"ask_prices":[1,2],"ask_volumes":[1,1],"bid_prices":[1,2],"bid_volumes":[1,1]}"#;
        assert!(parser.parse_line(line).is_err());
    }

    #[test]
    fn test_reject_negative_volume() {
        let parser = EventParser::new();
        let line = r#"{"type":"order_book","instrument":"reference","sequence":1,"ask_prices":[101,102,103,104,105],"ask_volumes":[1,-1,1,1,1],"bid_prices":[99,98,97,96,95],"bid_volumes":[1,1,1,1,1]}"#;
        let err = parser.parse_line(line).unwrap_err();
        assert!(matches!(err, FeedError::InvalidData(_)));
    }
}
