//! ETF/future market maker runtime.
//!
//! Runs the quoting engine as a process:
//! - TOML configuration
//! - Exchange events in as JSON lines on stdin
//! - Order commands out as JSON lines on stdout
//! - Session statistics on the log stream

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
