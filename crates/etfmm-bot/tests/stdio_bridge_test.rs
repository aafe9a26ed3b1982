//! Stdio bridge integration tests.
//!
//! Feeds JSON-lines exchange events through the application loop and
//! checks the JSON-lines commands it writes back.

use etfmm_bot::{AppConfig, Application};
use etfmm_core::{OrderCommand, OrderSide, Price};

const REFERENCE_BOOK: &[u8] = br#"{"type":"order_book","instrument":"reference","sequence":1,"ask_prices":[100,101,102,103,104],"ask_volumes":[10,10,10,10,10],"bid_prices":[100,99,98,97,96],"bid_volumes":[10,10,10,10,10]}
"#;

const TRACKED_BOOK: &[u8] = br#"{"type":"order_book","instrument":"tracked","sequence":1,"ask_prices":[101,102,103,104,105],"ask_volumes":[10,10,10,10,10],"bid_prices":[99,98,97,96,95],"bid_volumes":[10,10,10,10,10]}
"#;

fn decode(out: &[u8]) -> Vec<OrderCommand> {
    std::str::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_joint_books_produce_quotes() {
    let input = tokio_test::io::Builder::new()
        .read(REFERENCE_BOOK)
        .read(TRACKED_BOOK)
        .build();
    let mut out = Vec::new();

    let app = Application::new(AppConfig::default()).unwrap();
    let engine = app.run_with(input, &mut out).await.unwrap();

    let commands = decode(&out);
    assert_eq!(commands.len(), 2);
    for command in &commands {
        let OrderCommand::Insert(order) = command else {
            panic!("expected inserts only, got {command:?}");
        };
        assert_eq!(order.price, Price::new(100));
        assert_eq!(order.volume, 100);
    }
    assert!(engine.ledger().order(OrderSide::Buy).is_live());
    assert!(engine.ledger().order(OrderSide::Sell).is_live());
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let input = tokio_test::io::Builder::new()
        .read(b"{\"type\":\"bogus\"}\n")
        .read(REFERENCE_BOOK)
        .read(b"garbage\n")
        .read(TRACKED_BOOK)
        .build();
    let mut out = Vec::new();

    let app = Application::new(AppConfig::default()).unwrap();
    app.run_with(input, &mut out).await.unwrap();

    assert_eq!(decode(&out).len(), 2);
}

#[tokio::test]
async fn test_error_event_frees_quote_side() {
    let mut input = Vec::new();
    input.extend_from_slice(REFERENCE_BOOK);
    input.extend_from_slice(TRACKED_BOOK);
    // Order ids start at 1; the bid is inserted first.
    input.extend_from_slice(b"{\"type\":\"error\",\"order_id\":1,\"message\":\"rejected\"}\n");
    let mut out = Vec::new();

    let app = Application::new(AppConfig::default()).unwrap();
    let engine = app
        .run_with(std::io::Cursor::new(input), &mut out)
        .await
        .unwrap();

    assert!(!engine.ledger().bid().is_live());
    assert!(engine.ledger().ask().is_live());
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = AppConfig::default();
    config.quoter.max_order_actions = 1;
    assert!(Application::new(config).is_err());
}
