//! Prometheus metrics for the market maker.
//!
//! Covers:
//! - Book updates (accepted / stale) per instrument
//! - Pricing cycles per mode (computed / skipped)
//! - Order commands and quote skips
//! - Fills, order errors, position and action budget
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_int_gauge, CounterVec, GaugeVec, IntGauge,
};

/// Book updates received.
/// Labels: instrument (tracked/reference), outcome (accepted/stale)
pub static BOOK_UPDATES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_book_updates_total",
        "Order-book updates received",
        &["instrument", "outcome"]
    )
    .unwrap()
});

/// Pricing cycles run by the active pricing model.
/// Labels: mode (spread_bound/fair_value), outcome (computed/skipped)
pub static PRICING_CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_pricing_cycles_total",
        "Pricing cycles by mode and outcome",
        &["mode", "outcome"]
    )
    .unwrap()
});

/// Order commands emitted.
/// Labels: kind (insert/cancel), side (buy/sell)
pub static ORDER_COMMANDS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_order_commands_total",
        "Order commands emitted to the exchange",
        &["kind", "side"]
    )
    .unwrap()
});

/// Quote proposals that produced no commands.
/// Labels: side, reason
pub static QUOTE_SKIPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_quote_skips_total",
        "Quote proposals skipped, by reason",
        &["side", "reason"]
    )
    .unwrap()
});

/// Lots filled on our orders.
/// Labels: side
pub static FILLED_LOTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_filled_lots_total",
        "Lots filled on resting quotes",
        &["side"]
    )
    .unwrap()
});

/// Exchange-reported errors.
/// Labels: scope (order/general)
pub static ORDER_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "etfmm_order_errors_total",
        "Errors reported by the exchange",
        &["scope"]
    )
    .unwrap()
});

/// Tracked-instrument position.
pub static POSITION: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("etfmm_position", "Tracked-instrument net position").unwrap()
});

/// Order actions spent in the current period.
pub static ACTION_BUDGET_USED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "etfmm_action_budget_used",
        "Cancel and insert actions spent in the current period"
    )
    .unwrap()
});

/// Latest target quote price per side.
pub static QUOTE_TARGET_PRICE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "etfmm_quote_target_price",
        "Latest target quote price in ticks",
        &["side"]
    )
    .unwrap()
});

/// Metrics helper for recording values.
pub struct Metrics;

impl Metrics {
    /// Record an order-book update and whether it was accepted.
    pub fn book_update(instrument: &str, accepted: bool) {
        let outcome = if accepted { "accepted" } else { "stale" };
        BOOK_UPDATES_TOTAL
            .with_label_values(&[instrument, outcome])
            .inc();
    }

    /// Record a pricing cycle.
    pub fn pricing_cycle(mode: &str, computed: bool) {
        let outcome = if computed { "computed" } else { "skipped" };
        PRICING_CYCLES_TOTAL.with_label_values(&[mode, outcome]).inc();
    }

    /// Record an emitted order command.
    pub fn order_command(kind: &str, side: &str) {
        ORDER_COMMANDS_TOTAL.with_label_values(&[kind, side]).inc();
    }

    /// Record a skipped quote proposal.
    pub fn quote_skipped(side: &str, reason: &str) {
        QUOTE_SKIPS_TOTAL.with_label_values(&[side, reason]).inc();
    }

    /// Record filled lots.
    pub fn filled(side: &str, lots: i64) {
        if lots > 0 {
            FILLED_LOTS_TOTAL
                .with_label_values(&[side])
                .inc_by(lots as f64);
        }
    }

    /// Record an exchange-reported error.
    pub fn order_error(order_specific: bool) {
        let scope = if order_specific { "order" } else { "general" };
        ORDER_ERRORS_TOTAL.with_label_values(&[scope]).inc();
    }

    pub fn position_set(position: i64) {
        POSITION.set(position);
    }

    pub fn action_budget_set(used: u32) {
        ACTION_BUDGET_USED.set(i64::from(used));
    }

    pub fn quote_target(side: &str, price_ticks: i64) {
        QUOTE_TARGET_PRICE
            .with_label_values(&[side])
            .set(price_ticks as f64);
    }
}
