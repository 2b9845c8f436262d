//! Shared broker types: accounts, symbol matches, order requests.

use std::fmt;

use orderbridge::{Action, OrderType, TimeInForce};
use rust_decimal::Decimal;

/// A brokerage account connected through the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Aggregator-assigned account id (used in API paths).
    pub id: String,
    pub name: Option<String>,
    /// Brokerage account number, e.g. `U1234567` at IBKR.
    pub number: Option<String>,
    pub institution: Option<String>,
}

impl Account {
    /// True if `key` names this account, by aggregator id or brokerage number.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id == key
            || self
                .number
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or("(unnamed)"))?;
        if let Some(number) = &self.number {
            write!(f, " #{number}")?;
        }
        if let Some(institution) = &self.institution {
            write!(f, " @ {institution}")?;
        }
        write!(f, " [{}]", self.id)
    }
}

/// One candidate returned by a symbol search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatch {
    /// Universal symbol id used when placing orders.
    pub id: String,
    pub ticker: String,
    /// Ticker as listed at the venue, when it differs (e.g. `BRK.B` vs `BRK/B`).
    pub raw_ticker: Option<String>,
    /// Exchange code, e.g. `NASDAQ` or `TSX`.
    pub exchange: Option<String>,
    pub description: Option<String>,
}

impl SymbolMatch {
    /// True if this candidate's ticker is exactly `ticker` (case-insensitive).
    pub fn is_exact(&self, ticker: &str) -> bool {
        self.ticker.eq_ignore_ascii_case(ticker)
            || self
                .raw_ticker
                .as_deref()
                .is_some_and(|raw| raw.eq_ignore_ascii_case(ticker))
    }

    /// True if this candidate trades on `exchange` (case-insensitive).
    pub fn on_exchange(&self, exchange: &str) -> bool {
        self.exchange
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(exchange))
    }
}

/// Order to submit through the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub account_id: String,
    pub action: Action,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub universal_symbol_id: String,
    pub units: Decimal,
}

impl OrderRequest {
    pub fn limit_price(&self) -> Option<Decimal> {
        self.order_type.limit_price()
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        self.order_type.stop_price()
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x {} ({}, {})",
            self.action,
            self.units,
            self.universal_symbol_id,
            self.order_type,
            self.time_in_force
        )
    }
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Order id assigned by the brokerage.
    pub order_id: String,
    /// Status string as reported by the service, e.g. `EXECUTED` or `PENDING`.
    pub status: String,
}

/// Service health as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiStatus {
    pub online: bool,
    pub version: Option<String>,
}
