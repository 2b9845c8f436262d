//! Property-based tests for loader invariants.
//!
//! These tests use proptest to verify that row validation is isolated,
//! order-preserving, and applies defaults consistently across randomly
//! generated order files.

use orderbridge::{loader, Action, Decimal, OrderType, TimeInForce, ValidationError};
use proptest::prelude::*;

const HEADER: &str =
    "Action,Quantity,Symbol,SecType,Exchange,Currency,TimeInForce,OrderType,LmtPrice,AuxPrice,Account";

/// Generate an action cell, in any casing
fn action_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("BUY".to_string()),
        Just("SELL".to_string()),
        Just("buy".to_string()),
        Just("Sell".to_string()),
    ]
}

/// Generate a positive quantity with up to 4 decimal places
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64, 0u32..=4u32).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generate a ticker
fn symbol_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{1,5}"
}

/// Generate a time-in-force cell, including junk that should fall back to DAY
fn tif_strategy() -> impl Strategy<Value = (String, TimeInForce)> {
    prop_oneof![
        Just((String::new(), TimeInForce::DAY)),
        Just(("DAY".to_string(), TimeInForce::DAY)),
        Just(("gtc".to_string(), TimeInForce::GTC)),
        Just(("IOC".to_string(), TimeInForce::IOC)),
        Just(("FOK".to_string(), TimeInForce::FOK)),
        Just(("OPG".to_string(), TimeInForce::DAY)),
        "[a-z]{3,6}".prop_map(|s| {
            let expected = TimeInForce::parse_lenient(&s);
            (s, expected)
        }),
    ]
}

/// A row that is either valid or broken in one known way.
#[derive(Clone, Debug)]
enum RowKind {
    Valid,
    MissingAction,
    MissingQuantity,
    MissingSymbol,
    ZeroQuantity,
    LimitWithoutPrice,
    StopWithoutPrice,
}

fn row_kind_strategy() -> impl Strategy<Value = RowKind> {
    prop_oneof![
        4 => Just(RowKind::Valid),
        1 => Just(RowKind::MissingAction),
        1 => Just(RowKind::MissingQuantity),
        1 => Just(RowKind::MissingSymbol),
        1 => Just(RowKind::ZeroQuantity),
        1 => Just(RowKind::LimitWithoutPrice),
        1 => Just(RowKind::StopWithoutPrice),
    ]
}

fn render(kind: &RowKind, action: &str, qty: Decimal, symbol: &str) -> String {
    match kind {
        RowKind::Valid => format!("{action},{qty},{symbol},,,,,,,,"),
        RowKind::MissingAction => format!(",{qty},{symbol},,,,,,,,"),
        RowKind::MissingQuantity => format!("{action},,{symbol},,,,,,,,"),
        RowKind::MissingSymbol => format!("{action},{qty},,,,,,,,,"),
        RowKind::ZeroQuantity => format!("{action},0,{symbol},,,,,,,,"),
        RowKind::LimitWithoutPrice => format!("{action},{qty},{symbol},,,,,LMT,,,"),
        RowKind::StopWithoutPrice => format!("{action},{qty},{symbol},,,,,STP,,,"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ========================================================================
    // DEFAULTS
    // ========================================================================

    /// Valid market rows get every documented default
    #[test]
    fn defaults_applied(
        action in action_strategy(),
        qty in quantity_strategy(),
        symbol in symbol_strategy(),
    ) {
        let csv = format!("{HEADER}\n{action},{qty},{symbol},,,,,,,,\n");
        let rows = loader::load_str(&csv).unwrap();
        prop_assert_eq!(rows.len(), 1);

        let order = rows[0].order().expect("row should be valid");
        let expected_action: Action = action.parse().unwrap();
        prop_assert_eq!(order.action(), expected_action);
        prop_assert_eq!(order.quantity(), qty);
        prop_assert_eq!(order.symbol(), symbol.as_str());
        prop_assert_eq!(order.sec_type(), "STK");
        prop_assert_eq!(order.exchange(), "SMART");
        prop_assert_eq!(order.currency(), "USD");
        prop_assert_eq!(order.time_in_force(), TimeInForce::DAY);
        prop_assert_eq!(order.order_type(), OrderType::Market);
    }

    /// Time-in-force never fails validation
    #[test]
    fn tif_is_permissive(
        (tif, expected) in tif_strategy(),
        symbol in symbol_strategy(),
    ) {
        let csv = format!("{HEADER}\nBUY,1,{symbol},,,,{tif},,,,\n");
        let rows = loader::load_str(&csv).unwrap();
        let order = rows[0].order().expect("tif must not fail validation");
        prop_assert_eq!(order.time_in_force(), expected);
    }

    /// Limit prices survive exactly when positive
    #[test]
    fn limit_price_round_trips(
        price in quantity_strategy(),
        symbol in symbol_strategy(),
    ) {
        let csv = format!("{HEADER}\nSELL,1,{symbol},,,,GTC,LMT,{price},,\n");
        let rows = loader::load_str(&csv).unwrap();
        let order = rows[0].order().expect("positive limit price is valid");
        prop_assert_eq!(order.limit_price(), Some(price));
        prop_assert_eq!(order.stop_price(), None);
    }

    // ========================================================================
    // ISOLATION AND ORDERING
    // ========================================================================

    /// One outcome per data row, in file order, with each row judged on its own
    #[test]
    fn rows_are_isolated(
        rows in prop::collection::vec(
            (row_kind_strategy(), action_strategy(), quantity_strategy(), symbol_strategy()),
            0..40
        )
    ) {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for (kind, action, qty, symbol) in &rows {
            csv.push_str(&render(kind, action, *qty, symbol));
            csv.push('\n');
        }

        let outcomes = loader::load_str(&csv).unwrap();
        prop_assert_eq!(outcomes.len(), rows.len(), "every data row must produce an outcome");

        for (i, (outcome, (kind, _, qty, symbol))) in outcomes.iter().zip(&rows).enumerate() {
            prop_assert_eq!(outcome.row, i + 2, "row numbers follow the file");
            match kind {
                RowKind::Valid => {
                    let order = outcome.order().expect("valid row rejected");
                    prop_assert_eq!(order.symbol(), symbol.as_str());
                    prop_assert_eq!(order.quantity(), *qty);
                }
                RowKind::MissingAction => prop_assert_eq!(
                    outcome.error(), Some(&ValidationError::MissingField("Action"))),
                RowKind::MissingQuantity => prop_assert_eq!(
                    outcome.error(), Some(&ValidationError::MissingField("Quantity"))),
                RowKind::MissingSymbol => prop_assert_eq!(
                    outcome.error(), Some(&ValidationError::MissingField("Symbol"))),
                RowKind::ZeroQuantity => prop_assert!(matches!(
                    outcome.error(), Some(ValidationError::NonPositiveQuantity(_)))),
                RowKind::LimitWithoutPrice => prop_assert!(matches!(
                    outcome.error(), Some(ValidationError::InvalidLimitPrice(_)))),
                RowKind::StopWithoutPrice => prop_assert!(matches!(
                    outcome.error(), Some(ValidationError::InvalidStopPrice(_)))),
            }
        }
    }

    /// Arbitrary cell contents never panic and never lose a row
    #[test]
    fn junk_never_drops_rows(
        cells in prop::collection::vec(prop::collection::vec("[ +.a-zA-Z0-9-]{0,8}", 0..12), 0..20)
    ) {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        let mut expected = 0;
        for row in &cells {
            let line = row
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",");
            // The CSV reader skips blank lines entirely.
            if line.is_empty() {
                continue;
            }
            expected += 1;
            csv.push_str(&line);
            csv.push('\n');
        }

        let outcomes = loader::load_str(&csv).unwrap();
        prop_assert_eq!(outcomes.len(), expected);
    }
}
