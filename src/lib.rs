//! # orderbridge
//!
//! Typed order records and a validating CSV loader for bridging spreadsheet
//! trade instructions to a brokerage API.
//!
//! ## Features
//!
//! - **Actions**: BUY, SELL (case-insensitive)
//! - **Order types**: Market, Limit (`LmtPrice`), Stop (`AuxPrice`)
//! - **Time-in-force**: DAY, GTC, IOC, FOK (unknown values fall back to DAY)
//! - **Decimal quantities and prices**: no floating-point rounding
//! - **Per-row isolation**: one bad row never hides or aborts the others
//!
//! ## Quick Start
//!
//! ```
//! use orderbridge::{loader, Action, OrderType, TimeInForce};
//! use rust_decimal::Decimal;
//!
//! let csv = "\
//! Action,Quantity,Symbol,SecType,Exchange,Currency,TimeInForce,OrderType,LmtPrice,AuxPrice,Account
//! BUY,10,AAPL,,,,,,,,
//! SELL,5,TSLA,,,,GTC,LMT,250.50,,
//! ";
//! let rows = loader::load_str(csv).unwrap();
//!
//! let buy = rows[0].order().unwrap();
//! assert_eq!(buy.action(), Action::Buy);
//! assert_eq!(buy.order_type(), OrderType::Market);
//! assert_eq!(buy.time_in_force(), TimeInForce::DAY);
//!
//! let sell = rows[1].order().unwrap();
//! assert_eq!(sell.limit_price(), Some(Decimal::new(25050, 2)));
//! assert_eq!(sell.time_in_force(), TimeInForce::GTC);
//! ```
//!
//! ## Columns
//!
//! | Column | Required | Default |
//! |--------|----------|---------|
//! | `Action` | yes | |
//! | `Quantity` | yes | |
//! | `Symbol` | yes | |
//! | `SecType` | no | `STK` |
//! | `Exchange` | no | `SMART` |
//! | `Currency` | no | `USD` |
//! | `TimeInForce` | no | `DAY` |
//! | `OrderType` | no | `MKT` |
//! | `LmtPrice` | for `LMT` | |
//! | `AuxPrice` | for `STP` | |
//! | `Account` | no | the only connected account |

pub mod action;
pub mod error;
pub mod loader;
pub mod order;
pub mod tif;

pub use action::Action;
pub use error::{LoadError, ValidationError};
pub use loader::{OrderFile, RowOutcome};
pub use order::{OrderRecord, OrderType};
pub use tif::TimeInForce;

/// Re-exported so downstream crates agree on the decimal type.
pub use rust_decimal::Decimal;
