//! Core domain types for the ETF/future market maker.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Instrument`: the tracked (quoted) and reference (hedge) products
//! - `Price`: integer tick prices
//! - `Ladder`, `BookSnapshot`: fixed five-level order books
//! - `OrderSide`, `Lifespan`, `OrderId`: order enums and identifiers
//! - `OrderCommand`, `ExchangeEvent`: the connectivity-layer contract

pub mod book;
pub mod error;
pub mod execution;
pub mod instrument;
pub mod order;
pub mod price;

pub use book::{weighted_mid, BookSnapshot, BookState, Ladder, PriceLevel, BOOK_DEPTH};
pub use error::{CoreError, Result};
pub use instrument::Instrument;
pub use order::{Lifespan, OrderId, OrderIdGenerator, OrderSide};
pub use price::Price;

// Execution types
pub use execution::{
    CancelOrder, ExchangeEvent, InsertOrder, OrderBookUpdate, OrderCommand, SkipReason, TradeTick,
};
