//! Quoting strategy for the ETF/future market maker.
//!
//! Provides:
//! - Spread-bound pricing against the reference instrument
//! - Fair-value pricing from volume-weighted log returns
//! - Quote placement with inventory and action-budget limits
//! - Resting-order and position bookkeeping
//!
//! # Architecture
//!
//! ```text
//! ExchangeEvent → MarketMaker.handle()
//!                  ├─ OrderBookCache: sequence gating, joint readiness
//!                  ├─ PricingModel: SpreadBoundTracker | FairValueEstimator
//!                  ├─ QuoteManager: targets → cancel/insert
//!                  └─ OrderLedger: status, errors, position
//!                       ↓
//!                  Vec<OrderCommand>
//! ```

pub mod config;
pub mod engine;
pub mod fair_value;
pub mod ledger;
pub mod quote_manager;
pub mod spread_bound;

pub use config::{PricingMode, QuoterConfig};
pub use engine::{MarketMaker, PricingModel};
pub use fair_value::{FairValueEstimator, FairValueOutcome, FairValueSignal, RunningMoments};
pub use ledger::{OrderLedger, RestingOrder, StatusUpdate};
pub use quote_manager::{ActionBudget, QuoteAction, QuoteManager, QuoteOutcome, QuoteTarget};
pub use spread_bound::{ExtremumWindow, QuoteBounds, SpreadBoundTracker};
