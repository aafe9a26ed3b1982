//! Integer tick prices.
//!
//! Both instruments quote in whole ticks, so prices are carried as `i64`
//! tick counts rather than decimals. A price of zero marks an empty level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Price expressed in ticks.
///
/// Wraps `i64` to keep prices from being mixed with volumes or positions.
/// Differences between two prices are plain `i64` offsets (see [`Price::diff`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    #[inline]
    pub fn ticks(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Signed offset `self - other` in ticks.
    #[inline]
    pub fn diff(&self, other: Price) -> i64 {
        self.0 - other.0
    }

    /// Shift this price by a signed tick offset.
    #[inline]
    pub fn offset(&self, ticks: i64) -> Self {
        Self(self.0 + ticks)
    }

    /// Round a fractional price down to a whole tick.
    ///
    /// `None` for NaN, infinities and values outside the `i64` range.
    #[inline]
    pub fn checked_floor(value: f64) -> Option<Self> {
        Self::from_whole(value.floor())
    }

    /// Round a fractional price up to a whole tick.
    ///
    /// `None` for NaN, infinities and values outside the `i64` range.
    #[inline]
    pub fn checked_ceil(value: f64) -> Option<Self> {
        Self::from_whole(value.ceil())
    }

    fn from_whole(value: f64) -> Option<Self> {
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
        let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
        (value.is_finite() && in_range).then(|| Self(value as i64))
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(ticks: i64) -> Self {
        Self(ticks)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_diff_and_offset() {
        let p = Price::new(101);
        let reference = Price::new(100);

        assert_eq!(p.diff(reference), 1);
        assert_eq!(reference.diff(p), -1);
        assert_eq!(reference.offset(-3), Price::new(97));
    }

    #[test]
    fn test_price_rounding() {
        assert_eq!(Price::checked_floor(100.9), Some(Price::new(100)));
        assert_eq!(Price::checked_ceil(100.1), Some(Price::new(101)));
        assert_eq!(Price::checked_ceil(100.0), Some(Price::new(100)));
        assert_eq!(Price::checked_floor(-0.5), Some(Price::new(-1)));
    }

    #[test]
    fn test_price_rounding_rejects_unrepresentable() {
        assert_eq!(Price::checked_floor(f64::INFINITY), None);
        assert_eq!(Price::checked_ceil(f64::NEG_INFINITY), None);
        assert_eq!(Price::checked_floor(f64::NAN), None);
        assert_eq!(Price::checked_floor(1e19), None);
        assert_eq!(Price::checked_ceil(i64::MAX as f64), None);
    }

    #[test]
    fn test_price_serde_transparent() {
        let json = serde_json::to_string(&Price::new(12_300)).unwrap();
        assert_eq!(json, "12300");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::new(12_300));
    }
}
