//! Validated order records and their pricing

use std::fmt;

use rust_decimal::Decimal;

use crate::{Action, TimeInForce};

/// Default security type when the CSV leaves `SecType` blank.
pub const DEFAULT_SEC_TYPE: &str = "STK";
/// Default routing destination when the CSV leaves `Exchange` blank.
pub const DEFAULT_EXCHANGE: &str = "SMART";
/// Default currency when the CSV leaves `Currency` blank.
pub const DEFAULT_CURRENCY: &str = "USD";

/// How an order is priced.
///
/// The price travels inside the variant, so a limit price exists exactly
/// when the order is a limit order (and likewise for stops).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderType {
    /// Execute at the prevailing market price.
    #[default]
    Market,
    /// Execute at the given price or better.
    Limit(Decimal),
    /// Becomes a market order once the given price trades.
    Stop(Decimal),
}

impl OrderType {
    /// Limit price, if this is a limit order.
    #[inline]
    pub fn limit_price(&self) -> Option<Decimal> {
        match self {
            OrderType::Limit(p) => Some(*p),
            _ => None,
        }
    }

    /// Stop (trigger) price, if this is a stop order.
    #[inline]
    pub fn stop_price(&self) -> Option<Decimal> {
        match self {
            OrderType::Stop(p) => Some(*p),
            _ => None,
        }
    }

    /// Title-case label used by the brokerage API (`Market`, `Limit`, `Stop`).
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::Market => "Market",
            OrderType::Limit(_) => "Limit",
            OrderType::Stop(_) => "Stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MKT"),
            OrderType::Limit(p) => write!(f, "LMT @ {p}"),
            OrderType::Stop(p) => write!(f, "STP @ {p}"),
        }
    }
}

/// One validated trade instruction from the order file.
///
/// Only the loader constructs records, so every instance upholds:
/// quantity > 0, non-empty uppercase symbol, and prices tied to the
/// order type. Records are read-only after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderRecord {
    action: Action,
    quantity: Decimal,
    symbol: String,
    sec_type: String,
    exchange: String,
    currency: String,
    time_in_force: TimeInForce,
    order_type: OrderType,
    account: Option<String>,
}

/// Raw-but-trimmed pieces the loader has already checked.
pub(crate) struct RecordParts {
    pub action: Action,
    pub quantity: Decimal,
    pub symbol: String,
    pub sec_type: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub time_in_force: TimeInForce,
    pub order_type: OrderType,
    pub account: Option<String>,
}

impl OrderRecord {
    pub(crate) fn from_parts(parts: RecordParts) -> Self {
        Self {
            action: parts.action,
            quantity: parts.quantity,
            symbol: parts.symbol,
            sec_type: parts
                .sec_type
                .unwrap_or_else(|| DEFAULT_SEC_TYPE.to_string()),
            exchange: parts
                .exchange
                .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
            currency: parts
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            time_in_force: parts.time_in_force,
            order_type: parts.order_type,
            account: parts.account,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Number of units to trade. Always positive.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Ticker symbol, uppercased.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn sec_type(&self) -> &str {
        &self.sec_type
    }

    /// Routing destination (first segment of e.g. `SMART/AMEX`).
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn limit_price(&self) -> Option<Decimal> {
        self.order_type.limit_price()
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        self.order_type.stop_price()
    }

    /// Account named in the row, if any. `None` means "the only connected account".
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }
}

impl fmt::Display for OrderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.action, self.quantity, self.symbol, self.order_type, self.time_in_force
        )
    }
}
