//! Latest-snapshot cache for both instruments.
//!
//! Holds the most recent five-level book of the tracked and reference
//! instruments. The exchange stamps both books of one tick with the same
//! sequence number, so an update is accepted only when it is not behind
//! either stored book; a lagging instrument never overwrites state once
//! its counterpart has moved on. A re-sent book at the current sequence
//! replaces the stored one.

use etfmm_core::{BookSnapshot, Instrument};
use tracing::{debug, warn};

/// Result of offering a snapshot to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Stored; replaces the previous book for that instrument.
    Accepted,
    /// Older than a stored book. Nothing changed.
    Stale { stored: u64 },
}

impl SnapshotOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Latest book per instrument, sequence-gated.
#[derive(Debug, Default)]
pub struct OrderBookCache {
    tracked: Option<BookSnapshot>,
    reference: Option<BookSnapshot>,
}

impl OrderBookCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, instrument: Instrument) -> Option<&BookSnapshot> {
        match instrument {
            Instrument::Tracked => self.tracked.as_ref(),
            Instrument::Reference => self.reference.as_ref(),
        }
    }

    fn slot_mut(&mut self, instrument: Instrument) -> &mut Option<BookSnapshot> {
        match instrument {
            Instrument::Tracked => &mut self.tracked,
            Instrument::Reference => &mut self.reference,
        }
    }

    /// Latest stored book for an instrument.
    pub fn get(&self, instrument: Instrument) -> Option<&BookSnapshot> {
        self.slot(instrument)
    }

    /// Stored sequence number for an instrument.
    pub fn sequence(&self, instrument: Instrument) -> Option<u64> {
        self.slot(instrument).map(|s| s.sequence)
    }

    /// Offer a new snapshot.
    ///
    /// Rejected when its sequence number is below the stored sequence of
    /// either instrument.
    pub fn apply_snapshot(&mut self, snapshot: BookSnapshot) -> SnapshotOutcome {
        let instrument = snapshot.instrument;
        let high_water = self
            .sequence(instrument)
            .into_iter()
            .chain(self.sequence(instrument.counterpart()))
            .max();

        if let Some(stored) = high_water {
            if snapshot.sequence < stored {
                debug!(
                    instrument = %instrument,
                    sequence = snapshot.sequence,
                    stored,
                    "Dropping stale book update"
                );
                return SnapshotOutcome::Stale { stored };
            }
        }
        if !snapshot.is_well_formed() {
            warn!(
                instrument = %instrument,
                sequence = snapshot.sequence,
                "Book update has non-monotonic price levels"
            );
        }

        *self.slot_mut(instrument) = Some(snapshot);
        SnapshotOutcome::Accepted
    }

    /// Both books present, at the same sequence number, and two-sided.
    pub fn joint_ready(&self) -> bool {
        self.joint().is_some()
    }

    /// `(tracked, reference)` when [`joint_ready`](Self::joint_ready) holds.
    pub fn joint(&self) -> Option<(&BookSnapshot, &BookSnapshot)> {
        let tracked = self.tracked.as_ref()?;
        let reference = self.reference.as_ref()?;
        if tracked.sequence != reference.sequence {
            return None;
        }
        if !tracked.state().is_tradeable() || !reference.state().is_tradeable() {
            return None;
        }
        Some((tracked, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfmm_core::Ladder;

    fn snap(instrument: Instrument, sequence: u64, best_ask: i64, best_bid: i64) -> BookSnapshot {
        let asks = Ladder::from_ticks(
            [best_ask, best_ask + 1, best_ask + 2, best_ask + 3, best_ask + 4],
            [10; 5],
        );
        let bids = Ladder::from_ticks(
            [best_bid, best_bid - 1, best_bid - 2, best_bid - 3, best_bid - 4],
            [10; 5],
        );
        BookSnapshot::new(instrument, sequence, asks, bids)
    }

    #[test]
    fn test_first_update_accepted() {
        let mut cache = OrderBookCache::new();
        let outcome = cache.apply_snapshot(snap(Instrument::Tracked, 1, 101, 99));
        assert_eq!(outcome, SnapshotOutcome::Accepted);
        assert_eq!(cache.sequence(Instrument::Tracked), Some(1));
        assert!(!cache.joint_ready());
    }

    #[test]
    fn test_joint_ready_on_matching_sequence() {
        let mut cache = OrderBookCache::new();
        cache.apply_snapshot(snap(Instrument::Reference, 3, 100, 99));
        assert!(!cache.joint_ready());

        cache.apply_snapshot(snap(Instrument::Tracked, 3, 101, 99));
        assert!(cache.joint_ready());
        let (tracked, reference) = cache.joint().unwrap();
        assert_eq!(tracked.instrument, Instrument::Tracked);
        assert_eq!(reference.instrument, Instrument::Reference);
    }

    #[test]
    fn test_not_joint_ready_on_sequence_mismatch() {
        let mut cache = OrderBookCache::new();
        cache.apply_snapshot(snap(Instrument::Reference, 3, 100, 99));
        cache.apply_snapshot(snap(Instrument::Tracked, 4, 101, 99));
        assert!(!cache.joint_ready());
    }

    #[test]
    fn test_stale_update_changes_nothing() {
        let mut cache = OrderBookCache::new();
        cache.apply_snapshot(snap(Instrument::Tracked, 5, 101, 99));
        let before = cache.get(Instrument::Tracked).cloned();

        let outcome = cache.apply_snapshot(snap(Instrument::Tracked, 4, 200, 198));
        assert_eq!(outcome, SnapshotOutcome::Stale { stored: 5 });
        assert_eq!(cache.get(Instrument::Tracked).cloned(), before);
    }

    #[test]
    fn test_lagging_instrument_rejected() {
        let mut cache = OrderBookCache::new();
        cache.apply_snapshot(snap(Instrument::Reference, 7, 100, 99));

        // The tracked book is behind the reference book.
        let outcome = cache.apply_snapshot(snap(Instrument::Tracked, 6, 101, 99));
        assert_eq!(outcome, SnapshotOutcome::Stale { stored: 7 });
        assert!(cache.get(Instrument::Tracked).is_none());
    }

    #[test]
    fn test_resent_book_at_same_sequence_replaces() {
        let mut cache = OrderBookCache::new();
        cache.apply_snapshot(snap(Instrument::Reference, 2, 100, 99));
        cache.apply_snapshot(snap(Instrument::Tracked, 2, 101, 99));

        let outcome = cache.apply_snapshot(snap(Instrument::Tracked, 2, 150, 149));
        assert_eq!(outcome, SnapshotOutcome::Accepted);
        assert_eq!(
            cache.get(Instrument::Tracked).unwrap().best_ask(),
            etfmm_core::Price::new(150)
        );
        assert!(cache.joint_ready());
    }

    #[test]
    fn test_one_sided_book_blocks_joint_ready() {
        let mut cache = OrderBookCache::new();
        cache.apply_snapshot(snap(Instrument::Tracked, 1, 101, 99));
        let empty_bids = BookSnapshot::new(
            Instrument::Reference,
            1,
            Ladder::from_ticks([100, 101, 102, 103, 104], [1; 5]),
            Ladder::default(),
        );
        cache.apply_snapshot(empty_bids);
        assert!(!cache.joint_ready());
    }
}
