//! SnapTrade wire types.
//!
//! Responses ignore unknown fields and default anything optional, since the
//! service adds fields freely and brokerages fill them unevenly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use orderbridge::{Action, OrderType, TimeInForce};

use crate::types::{Account, ApiStatus, OrderRequest, PlacedOrder, SymbolMatch};

/// `GET /` response.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub online: bool,
    /// Sometimes a number, sometimes a string.
    #[serde(default)]
    pub version: Option<Value>,
}

impl From<StatusResponse> for ApiStatus {
    fn from(wire: StatusResponse) -> Self {
        ApiStatus {
            online: wire.online,
            version: wire.version.and_then(|v| scalar_to_string(&v)),
        }
    }
}

/// One entry of `GET /accounts`.
#[derive(Debug, Deserialize)]
pub struct AccountWire {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
}

impl From<AccountWire> for Account {
    fn from(wire: AccountWire) -> Self {
        Account {
            id: wire.id,
            name: wire.name,
            number: wire.number,
            institution: wire.institution_name,
        }
    }
}

/// Exchange block nested in a universal symbol.
#[derive(Debug, Default, Deserialize)]
pub struct ExchangeWire {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub mic_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `POST /accounts/{id}/symbols`.
#[derive(Debug, Deserialize)]
pub struct UniversalSymbolWire {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub raw_symbol: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exchange: Option<ExchangeWire>,
}

impl From<UniversalSymbolWire> for SymbolMatch {
    fn from(wire: UniversalSymbolWire) -> Self {
        let exchange = wire
            .exchange
            .and_then(|e| e.code.or(e.mic_code).or(e.name));
        SymbolMatch {
            id: wire.id,
            ticker: wire.symbol,
            raw_ticker: wire.raw_symbol,
            exchange,
            description: wire.description,
        }
    }
}

/// `POST /accounts/{id}/symbols` request body.
#[derive(Debug, Serialize)]
pub struct SymbolSearchBody<'a> {
    pub substring: &'a str,
}

/// `POST /trade/place` request body.
#[derive(Debug, Serialize)]
pub struct PlaceOrderBody {
    pub account_id: String,
    pub action: &'static str,
    pub order_type: &'static str,
    pub time_in_force: &'static str,
    pub universal_symbol_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub units: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop: Option<Decimal>,
}

impl From<&OrderRequest> for PlaceOrderBody {
    fn from(order: &OrderRequest) -> Self {
        PlaceOrderBody {
            account_id: order.account_id.clone(),
            action: action_label(order.action),
            order_type: order.order_type.label(),
            time_in_force: tif_label(order.time_in_force),
            universal_symbol_id: order.universal_symbol_id.clone(),
            units: order.units,
            price: match order.order_type {
                OrderType::Limit(p) => Some(p),
                _ => None,
            },
            stop: match order.order_type {
                OrderType::Stop(p) => Some(p),
                _ => None,
            },
        }
    }
}

/// `POST /trade/place` response.
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub brokerage_order_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
}

impl OrderResponse {
    /// Brokerage order id, falling back to the aggregator's own id.
    pub fn order_id(&self) -> Option<String> {
        self.brokerage_order_id
            .as_ref()
            .and_then(scalar_to_string)
            .or_else(|| self.id.as_ref().and_then(scalar_to_string))
    }
}

impl From<OrderResponse> for PlacedOrder {
    fn from(wire: OrderResponse) -> Self {
        PlacedOrder {
            order_id: wire.order_id().unwrap_or_default(),
            status: wire.status.unwrap_or_else(|| "UNKNOWN".into()),
        }
    }
}

/// `POST /snapTrade/login` request body.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_redirect: Option<String>,
}

/// `POST /snapTrade/login` response.
#[derive(Debug, Deserialize)]
pub struct LoginRedirect {
    #[serde(rename = "redirectURI")]
    pub redirect_uri: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message for a failed response body.
    pub fn describe(raw: &str) -> String {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|b| b.detail.or(b.message))
            .unwrap_or_else(|| raw.trim().to_string())
    }
}

pub fn action_label(action: Action) -> &'static str {
    match action {
        Action::Buy => "BUY",
        Action::Sell => "SELL",
    }
}

pub fn tif_label(tif: TimeInForce) -> &'static str {
    match tif {
        TimeInForce::DAY => "Day",
        TimeInForce::GTC => "GTC",
        TimeInForce::IOC => "IOC",
        TimeInForce::FOK => "FOK",
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
