//! Market data intake for the market maker.
//!
//! Decodes exchange events and keeps the latest sequence-gated book of
//! both instruments in an `OrderBookCache`.

pub mod book_cache;
pub mod error;
pub mod parser;

pub use book_cache::{OrderBookCache, SnapshotOutcome};
pub use error::{FeedError, FeedResult};
pub use parser::{EventParser, ParseStats};
