//! Instrument identification.
//!
//! The strategy trades exactly two correlated products: the tracked
//! instrument it quotes (ETF-like) and the reference instrument (future)
//! whose book anchors fair value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two instruments the engine follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    /// The quoted product.
    Tracked,
    /// The correlated hedge product.
    Reference,
}

impl Instrument {
    /// Both instruments, tracked first.
    pub const ALL: [Instrument; 2] = [Instrument::Tracked, Instrument::Reference];

    /// Returns the other instrument of the pair.
    pub fn counterpart(&self) -> Self {
        match self {
            Self::Tracked => Self::Reference,
            Self::Reference => Self::Tracked,
        }
    }

    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tracked => "tracked",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart() {
        assert_eq!(Instrument::Tracked.counterpart(), Instrument::Reference);
        assert_eq!(Instrument::Reference.counterpart(), Instrument::Tracked);
    }

    #[test]
    fn test_instrument_serde() {
        let json = serde_json::to_string(&Instrument::Reference).unwrap();
        assert_eq!(json, "\"reference\"");
    }
}
