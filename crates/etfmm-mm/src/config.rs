//! Quoting configuration.

use etfmm_core::{CoreError, Lifespan};
use serde::{Deserialize, Serialize};

/// How target quote prices are derived.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Quote at the rolling tracked-vs-reference spread bounds.
    #[default]
    SpreadBound,
    /// Quote one side at a forecast fair value.
    FairValue,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpreadBound => "spread_bound",
            Self::FairValue => "fair_value",
        }
    }
}

impl std::fmt::Display for PricingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quoting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoterConfig {
    /// Pricing model driving the quotes.
    #[serde(default)]
    pub pricing_mode: PricingMode,

    /// Absolute position limit on the tracked instrument, in lots.
    #[serde(default = "default_max_inventory")]
    pub max_inventory: i64,

    /// Lots per quote. When unset, the spread-bound model quotes the full
    /// inventory headroom and the fair-value model quotes a single lot.
    #[serde(default)]
    pub lot_size: Option<i64>,

    /// Exchange ceiling on insert and cancel actions per period.
    #[serde(default = "default_max_order_actions")]
    pub max_order_actions: u32,

    /// Actions held back below the ceiling.
    #[serde(default = "default_action_safety_margin")]
    pub action_safety_margin: u32,

    /// Lifespan for every quote.
    #[serde(default)]
    pub lifespan: Lifespan,
}

impl Default for QuoterConfig {
    fn default() -> Self {
        Self {
            pricing_mode: PricingMode::default(),
            max_inventory: default_max_inventory(),
            lot_size: None,
            max_order_actions: default_max_order_actions(),
            action_safety_margin: default_action_safety_margin(),
            lifespan: Lifespan::default(),
        }
    }
}

fn default_max_inventory() -> i64 {
    100
}
fn default_max_order_actions() -> u32 {
    50
}
fn default_action_safety_margin() -> u32 {
    2
}

impl QuoterConfig {
    /// Effective lot size for the configured pricing mode.
    pub fn lot(&self) -> i64 {
        self.lot_size.unwrap_or(match self.pricing_mode {
            PricingMode::SpreadBound => self.max_inventory,
            PricingMode::FairValue => 1,
        })
    }

    /// Number of actions that may be spent per period.
    pub fn action_ceiling(&self) -> u32 {
        self.max_order_actions
            .saturating_sub(self.action_safety_margin)
    }

    /// Reject settings under which no quote could ever be placed.
    pub fn validate(&self) -> etfmm_core::Result<()> {
        if self.max_inventory <= 0 {
            return Err(CoreError::InvalidConfig(format!(
                "max_inventory must be positive, got {}",
                self.max_inventory
            )));
        }
        if let Some(lot) = self.lot_size {
            if lot <= 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "lot_size must be positive, got {lot}"
                )));
            }
        }
        if self.max_order_actions <= self.action_safety_margin {
            return Err(CoreError::InvalidConfig(format!(
                "max_order_actions ({}) must exceed action_safety_margin ({})",
                self.max_order_actions, self.action_safety_margin
            )));
        }
        Ok(())
    }
}
