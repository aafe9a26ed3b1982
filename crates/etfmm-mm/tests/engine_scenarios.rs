//! End-to-end engine scenarios.

mod integration;
use integration::common::events::{
    book, book_with_volumes, cancel_count, error, inserts, position, status, ticks,
};

use etfmm_core::{Instrument, OrderCommand, OrderSide, Price};
use etfmm_mm::{MarketMaker, PricingMode, PricingModel, QuoterConfig};

fn spread_bound() -> MarketMaker {
    MarketMaker::new(QuoterConfig::default())
}

/// Reference at 100/100, tracked asks 101..105 and bids 99..95.
fn scenario_cycle(mm: &mut MarketMaker, sequence: u64) -> Vec<OrderCommand> {
    let mut commands = mm.handle(book(Instrument::Reference, sequence, 100, 100));
    commands.extend(mm.handle(book(Instrument::Tracked, sequence, 101, 99)));
    commands
}

#[test]
fn test_scenario_bid_at_reference_with_full_headroom() {
    for pos in [0, 30, -30, 99] {
        let mut mm = spread_bound();
        mm.handle(position(pos));

        let commands = scenario_cycle(&mut mm, 1);
        let bids = inserts(&commands, OrderSide::Buy);
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].price, Price::new(100));
        assert_eq!(bids[0].volume, (100 - pos).min(100));

        let asks = inserts(&commands, OrderSide::Sell);
        assert_eq!(asks[0].price, Price::new(100));
        assert_eq!(asks[0].volume, (100 + pos).min(100));
    }
}

#[test]
fn test_unchanged_bounds_do_not_requote() {
    let mut mm = spread_bound();
    let first = scenario_cycle(&mut mm, 1);
    assert_eq!(first.len(), 2);

    let second = scenario_cycle(&mut mm, 2);
    assert!(second.is_empty());
    assert_eq!(mm.quote_manager().budget().used(), 2);
}

#[test]
fn test_moved_bounds_cancel_then_insert() {
    let mut mm = spread_bound();
    let first = scenario_cycle(&mut mm, 1);
    let old_bid = inserts(&first, OrderSide::Buy)[0].id;

    // Tracked book falls below the reference bid.
    mm.handle(book(Instrument::Reference, 2, 100, 100));
    let commands = mm.handle(book(Instrument::Tracked, 2, 97, 95));

    assert_eq!(commands[0], OrderCommand::Cancel(etfmm_core::CancelOrder::new(old_bid)));
    let bids = inserts(&commands, OrderSide::Buy);
    assert_eq!(bids[0].price, Price::new(97));
    assert_ne!(bids[0].id, old_bid);
    assert_eq!(mm.ledger().bid().id, Some(bids[0].id));
}

#[test]
fn test_resent_tracked_book_reprices() {
    let mut mm = spread_bound();
    let first = scenario_cycle(&mut mm, 1);
    let old_bid = inserts(&first, OrderSide::Buy)[0].id;

    // Corrected tracked ladder at the same sequence.
    let commands = mm.handle(book(Instrument::Tracked, 1, 97, 95));

    assert_eq!(commands[0], OrderCommand::Cancel(etfmm_core::CancelOrder::new(old_bid)));
    let bids = inserts(&commands, OrderSide::Buy);
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].price, Price::new(97));
    assert_eq!(mm.books().sequence(Instrument::Tracked), Some(1));
}

#[test]
fn test_stale_update_is_a_no_op() {
    let mut mm = spread_bound();
    scenario_cycle(&mut mm, 5);
    let used = mm.quote_manager().budget().used();

    let commands = mm.handle(book(Instrument::Tracked, 4, 150, 149));
    assert!(commands.is_empty());
    assert_eq!(mm.books().sequence(Instrument::Tracked), Some(5));
    assert_eq!(mm.quote_manager().budget().used(), used);
}

#[test]
fn test_one_sided_reference_skips_pricing() {
    let mut mm = spread_bound();
    mm.handle(book_with_volumes(
        Instrument::Reference,
        1,
        100,
        100,
        [10; 5],
        [0; 5],
    ));
    let commands = mm.handle(book(Instrument::Tracked, 1, 101, 99));
    assert!(commands.is_empty());
    let PricingModel::SpreadBound(tracker) = mm.model() else {
        panic!("spread bound model expected");
    };
    assert!(tracker.bounds().is_none());
}

#[test]
fn test_budget_blocks_until_trade_ticks() {
    let config = QuoterConfig {
        max_order_actions: 5,
        ..Default::default()
    };
    let mut mm = MarketMaker::new(config);
    scenario_cycle(&mut mm, 1);
    assert_eq!(mm.quote_manager().budget().used(), 2);

    // Both bounds move. The bid requote spends the rest of the budget.
    mm.handle(book(Instrument::Reference, 2, 101, 99));
    let commands = mm.handle(book(Instrument::Tracked, 2, 102, 98));
    assert_eq!(cancel_count(&commands), 1);
    assert_eq!(inserts(&commands, OrderSide::Buy)[0].price, Price::new(99));
    assert!(inserts(&commands, OrderSide::Sell).is_empty());
    assert_eq!(mm.ledger().ask().price, Price::new(100));

    mm.handle(ticks());
    assert_eq!(mm.quote_manager().budget().used(), 0);

    mm.handle(book(Instrument::Reference, 3, 101, 99));
    let commands = mm.handle(book(Instrument::Tracked, 3, 102, 98));
    let asks = inserts(&commands, OrderSide::Sell);
    assert_eq!(asks[0].price, Price::new(101));
    assert!(inserts(&commands, OrderSide::Buy).is_empty());
}

#[test]
fn test_fill_then_position_limits_next_bid() {
    let mut mm = spread_bound();
    let commands = scenario_cycle(&mut mm, 1);
    let bid = inserts(&commands, OrderSide::Buy)[0].clone();

    mm.handle(status(bid.id.get(), 100, 0));
    mm.handle(position(100));
    assert!(!mm.ledger().bid().is_live());
    assert_eq!(mm.position(), 100);

    let commands = scenario_cycle(&mut mm, 2);
    assert!(inserts(&commands, OrderSide::Buy).is_empty());
}

#[test]
fn test_resting_bid_plus_position_within_limit() {
    let mut mm = spread_bound();
    let commands = scenario_cycle(&mut mm, 1);
    let bid = inserts(&commands, OrderSide::Buy)[0].clone();

    // Partial fill of 40 lots.
    mm.handle(status(bid.id.get(), 40, 60));
    mm.handle(position(40));
    let resting = mm.ledger().bid();
    assert!(resting.volume + mm.position() <= mm.config().max_inventory);
}

#[test]
fn test_error_clears_order_and_allows_requote() {
    let mut mm = spread_bound();
    let commands = scenario_cycle(&mut mm, 1);
    let ask = inserts(&commands, OrderSide::Sell)[0].clone();

    mm.handle(error(ask.id.get(), "order rejected"));
    assert!(!mm.ledger().ask().is_live());

    let commands = scenario_cycle(&mut mm, 2);
    let asks = inserts(&commands, OrderSide::Sell);
    assert_eq!(asks.len(), 1);
    assert_eq!(cancel_count(&commands), 0);
}

#[test]
fn test_general_error_changes_nothing() {
    let mut mm = spread_bound();
    scenario_cycle(&mut mm, 1);
    mm.handle(error(0, "throttled"));
    assert!(mm.ledger().bid().is_live());
    assert!(mm.ledger().ask().is_live());
}

#[test]
fn test_fair_value_quotes_single_lot_after_warmup() {
    let config = QuoterConfig {
        pricing_mode: PricingMode::FairValue,
        ..Default::default()
    };
    let mut mm = MarketMaker::new(config);

    // Tracked price climbs each cycle with a balanced book.
    let mut placed = Vec::new();
    for (seq, best) in [(1, 101), (2, 111), (3, 122), (4, 134)] {
        mm.handle(book(Instrument::Reference, seq, 101, 99));
        placed.extend(mm.handle(book(Instrument::Tracked, seq, best, best - 2)));
    }

    let PricingModel::FairValue(estimator) = mm.model() else {
        panic!("fair value model expected");
    };
    assert_eq!(estimator.moments().index(), 5);

    let bids = inserts(&placed, OrderSide::Buy);
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].volume, 1);
    assert!(inserts(&placed, OrderSide::Sell).is_empty());
}
