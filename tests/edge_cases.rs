//! Edge-case tests: order files as they show up on disk.

use std::io::Write;

use orderbridge::loader::{self, load_file};
use orderbridge::{Action, Decimal, LoadError, OrderType, TimeInForce, ValidationError};

const HEADER: &str =
    "Action,Quantity,Symbol,SecType,Exchange,Currency,TimeInForce,OrderType,LmtPrice,AuxPrice,Account";

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Documented scenarios
// ============================================================================

#[test]
fn market_and_limit_rows() {
    let file = write_csv(&format!(
        "{HEADER}\nBUY,10,AAPL,,,,,,,,\nSELL,5,TSLA,,,,GTC,LMT,250.50,,\n"
    ));
    let loaded = load_file(file.path()).unwrap();
    assert_eq!(loaded.rows.len(), 2);

    let first = &loaded.rows[0];
    assert_eq!(first.row, 2);
    let buy = first.order().unwrap();
    assert_eq!(buy.action(), Action::Buy);
    assert_eq!(buy.order_type(), OrderType::Market);
    assert_eq!(buy.time_in_force(), TimeInForce::DAY);

    let second = &loaded.rows[1];
    assert_eq!(second.row, 3);
    let sell = second.order().unwrap();
    assert_eq!(sell.action(), Action::Sell);
    assert_eq!(sell.order_type(), OrderType::Limit(Decimal::new(25050, 2)));
    assert_eq!(sell.time_in_force(), TimeInForce::GTC);
}

#[test]
fn zero_quantity_row() {
    let file = write_csv(&format!("{HEADER}\nBUY,0,AAPL,,,,,,,,\n"));
    let loaded = load_file(file.path()).unwrap();
    assert_eq!(loaded.rows.len(), 1);
    assert!(matches!(
        loaded.rows[0].error(),
        Some(ValidationError::NonPositiveQuantity(_))
    ));
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn bad_rows_do_not_affect_neighbours() {
    let csv = format!(
        "{HEADER}\n\
         BUY,10,AAPL,,,,,,,,\n\
         ,10,MSFT,,,,,,,,\n\
         BUY,,MSFT,,,,,,,,\n\
         BUY,10,,,,,,,,,\n\
         SELL,3,NVDA,,,,,STP,,,\n\
         SELL,3,NVDA,,,,,STP,,95.5,\n"
    );
    let rows = loader::load_str(&csv).unwrap();
    let verdicts: Vec<bool> = rows.iter().map(|r| r.is_valid()).collect();
    assert_eq!(verdicts, vec![true, false, false, false, false, true]);

    let numbers: Vec<usize> = rows.iter().map(|r| r.row).collect();
    assert_eq!(numbers, vec![2, 3, 4, 5, 6, 7]);
}

#[test]
fn raw_cells_are_kept_for_reporting() {
    let rows = loader::load_str(&format!("{HEADER}\nHOLD, 10 ,AAPL,,,,,,,,\n")).unwrap();
    assert_eq!(rows[0].raw[0], "HOLD");
    assert_eq!(rows[0].raw[1], " 10 ");
    assert_eq!(rows[0].raw.len(), 11);
}

#[test]
fn duplicate_rows_are_not_merged() {
    let rows =
        loader::load_str(&format!("{HEADER}\nBUY,1,SPY,,,,,,,,\nBUY,1,SPY,,,,,,,,\n")).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.is_valid()));
}

// ============================================================================
// File-level cases
// ============================================================================

#[test]
fn empty_file_is_not_an_error() {
    let file = write_csv("");
    let loaded = load_file(file.path()).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn header_only_file_is_not_an_error() {
    let file = write_csv(&format!("{HEADER}\n"));
    let loaded = load_file(file.path()).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.valid_count(), 0);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("orders.csv")).unwrap_err();
    match err {
        LoadError::Open { path, .. } => assert!(path.ends_with("orders.csv")),
        other => panic!("expected Open error, got {other:?}"),
    }
}

#[test]
fn crlf_line_endings() {
    let csv = format!("{HEADER}\r\nBUY,10,AAPL,,,,,,,,\r\nSELL,1,MSFT,,,,,,,,\r\n");
    let rows = loader::load_str(&csv).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.is_valid()));
}

#[test]
fn quoted_cells() {
    let csv = format!("{HEADER}\n\"BUY\",\"10\",\"BRK B\",,,,,,,,\"U 1\"\n");
    let rows = loader::load_str(&csv).unwrap();
    let order = rows[0].order().unwrap();
    assert_eq!(order.symbol(), "BRK B");
    assert_eq!(order.account(), Some("U 1"));
}

#[test]
fn extra_columns_are_ignored() {
    let csv = "Notes,Action,Quantity,Symbol,Strategy\nrebalance,SELL,2,QQQ,momentum\n";
    let rows = loader::load_str(csv).unwrap();
    let order = rows[0].order().unwrap();
    assert_eq!(order.action(), Action::Sell);
    assert_eq!(order.symbol(), "QQQ");
}

#[test]
fn scientific_quantity() {
    let rows = loader::load_str("Action,Quantity,Symbol\nBUY,1e2,SPY\n").unwrap();
    assert_eq!(rows[0].order().unwrap().quantity(), Decimal::new(100, 0));
}
