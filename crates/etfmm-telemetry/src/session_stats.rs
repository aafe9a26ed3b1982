//! Session statistics summary.
//!
//! Reads the process-wide Prometheus counters and logs a compact summary:
//! - book updates accepted / dropped as stale, per instrument
//! - pricing cycles computed / skipped
//! - inserts, cancels and skipped quotes
//! - filled lots, exchange errors, position and action budget

use crate::metrics::{
    ACTION_BUDGET_USED, BOOK_UPDATES_TOTAL, FILLED_LOTS_TOTAL, ORDER_COMMANDS_TOTAL,
    ORDER_ERRORS_TOTAL, POSITION, PRICING_CYCLES_TOTAL, QUOTE_SKIPS_TOTAL,
};
use chrono::{DateTime, Utc};
use prometheus::core::Collector;
use serde::Serialize;
use tracing::info;

/// Point-in-time view of the session counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub book_updates_accepted: u64,
    pub book_updates_stale: u64,
    pub pricing_cycles_computed: u64,
    pub pricing_cycles_skipped: u64,
    pub inserts: u64,
    pub cancels: u64,
    pub quote_skips: u64,
    pub filled_bid_lots: u64,
    pub filled_ask_lots: u64,
    pub order_errors: u64,
    pub position: i64,
    pub action_budget_used: i64,
}

/// Session statistics reporter.
pub struct SessionStatsReporter {
    start_time: DateTime<Utc>,
}

impl SessionStatsReporter {
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
        }
    }

    /// Collect current statistics.
    pub fn get_stats(&self) -> SessionStats {
        let mut stats = SessionStats::default();

        for instrument in ["tracked", "reference"] {
            stats.book_updates_accepted +=
                counter_value(&BOOK_UPDATES_TOTAL, &[instrument, "accepted"]);
            stats.book_updates_stale += counter_value(&BOOK_UPDATES_TOTAL, &[instrument, "stale"]);
        }
        for mode in ["spread_bound", "fair_value"] {
            stats.pricing_cycles_computed +=
                counter_value(&PRICING_CYCLES_TOTAL, &[mode, "computed"]);
            stats.pricing_cycles_skipped +=
                counter_value(&PRICING_CYCLES_TOTAL, &[mode, "skipped"]);
        }
        for side in ["buy", "sell"] {
            stats.inserts += counter_value(&ORDER_COMMANDS_TOTAL, &["insert", side]);
            stats.cancels += counter_value(&ORDER_COMMANDS_TOTAL, &["cancel", side]);
        }
        stats.quote_skips = counter_family_total(&*QUOTE_SKIPS_TOTAL);
        stats.filled_bid_lots = counter_value(&FILLED_LOTS_TOTAL, &["buy"]);
        stats.filled_ask_lots = counter_value(&FILLED_LOTS_TOTAL, &["sell"]);
        stats.order_errors = counter_family_total(&*ORDER_ERRORS_TOTAL);
        stats.position = POSITION.get();
        stats.action_budget_used = ACTION_BUDGET_USED.get();

        stats
    }

    /// Output statistics to logs.
    pub fn output_summary(&self) {
        let s = self.get_stats();
        let duration = Utc::now() - self.start_time;
        let hours = duration.num_hours();
        let minutes = duration.num_minutes() % 60;

        info!("========== Session Statistics Summary ==========");
        info!(
            "Period: {} ({} hours {} minutes)",
            self.start_time.format("%Y-%m-%d %H:%M:%S UTC"),
            hours,
            minutes
        );
        info!(
            "  Book updates: {} accepted, {} stale",
            s.book_updates_accepted, s.book_updates_stale
        );
        info!(
            "  Pricing cycles: {} computed, {} skipped",
            s.pricing_cycles_computed, s.pricing_cycles_skipped
        );
        info!(
            "  Orders: {} inserts, {} cancels, {} skipped quotes",
            s.inserts, s.cancels, s.quote_skips
        );
        info!(
            "  Filled lots: bid={}, ask={}",
            s.filled_bid_lots, s.filled_ask_lots
        );
        info!(
            "  Position: {}, action budget used: {}, errors: {}",
            s.position, s.action_budget_used, s.order_errors
        );
        info!("================================================");
    }
}

impl Default for SessionStatsReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn counter_value(counter: &prometheus::CounterVec, labels: &[&str]) -> u64 {
    counter.with_label_values(labels).get() as u64
}

/// Sum of every labelled series in a counter family.
fn counter_family_total(counter: &prometheus::CounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value())
        .sum::<f64>() as u64
}
