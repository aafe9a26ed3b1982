//! Prometheus metrics and structured logging for the market maker.
//!
//! - Prometheus counters and gauges for book updates, order commands,
//!   quote skips, fills, position and action budget
//! - Structured logging with tracing (pretty or JSON)
//! - Periodic session statistics summary

pub mod error;
pub mod logging;
pub mod metrics;
pub mod session_stats;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use session_stats::{SessionStats, SessionStatsReporter};
