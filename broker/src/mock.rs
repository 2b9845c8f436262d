//! Mock broker for testing: implements the `Broker` trait with configurable behavior.
//!
//! Use this in integration tests to simulate aggregator responses without network calls.
//!
//! ```
//! use orderbridge_broker::mock::MockBroker;
//! use orderbridge_broker::Broker;
//!
//! let broker = MockBroker::builder()
//!     .with_account("acct-1", "U1234567")
//!     .with_symbol("uid-aapl", "AAPL", "NASDAQ")
//!     .build();
//!
//! let accounts = broker.accounts().unwrap();
//! let matches = broker.search_symbols(&accounts[0].id, "AAPL").unwrap();
//! assert_eq!(matches[0].id, "uid-aapl");
//! ```

use std::sync::Mutex;

use crate::error::BrokerError;
use crate::types::*;
use crate::Broker;

/// How the mock broker handles placed orders.
#[derive(Clone, Debug, Default)]
pub enum OrderMode {
    /// Orders are accepted with status `EXECUTED`.
    #[default]
    Accept,
    /// All orders are rejected with the given message.
    Reject(String),
    /// Orders for the listed universal ids are rejected; others are accepted.
    RejectSymbols(Vec<String>),
}

/// A recorded symbol search for assertion in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedSearch {
    pub account_id: String,
    pub query: String,
}

/// Builder for `MockBroker`.
pub struct MockBrokerBuilder {
    order_mode: OrderMode,
    accounts: Vec<Account>,
    symbols: Vec<SymbolMatch>,
    accounts_error: Option<BrokerError>,
    search_error: Option<BrokerError>,
    online: bool,
}

impl MockBrokerBuilder {
    pub fn order_mode(mut self, mode: OrderMode) -> Self {
        self.order_mode = mode;
        self
    }

    pub fn with_account(mut self, id: &str, number: &str) -> Self {
        self.accounts.push(Account {
            id: id.to_string(),
            name: Some(format!("Mock {number}")),
            number: Some(number.to_string()),
            institution: Some("Mock Brokerage".to_string()),
        });
        self
    }

    pub fn with_symbol(mut self, id: &str, ticker: &str, exchange: &str) -> Self {
        self.symbols.push(SymbolMatch {
            id: id.to_string(),
            ticker: ticker.to_string(),
            raw_ticker: None,
            exchange: Some(exchange.to_string()),
            description: None,
        });
        self
    }

    /// Make `accounts()` fail, e.g. with [`BrokerError::Auth`].
    pub fn fail_accounts(mut self, error: BrokerError) -> Self {
        self.accounts_error = Some(error);
        self
    }

    /// Make every `search_symbols()` call fail.
    pub fn fail_search(mut self, error: BrokerError) -> Self {
        self.search_error = Some(error);
        self
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub fn build(self) -> MockBroker {
        MockBroker {
            order_mode: self.order_mode,
            accounts: self.accounts,
            symbols: self.symbols,
            accounts_error: self.accounts_error,
            search_error: self.search_error,
            online: self.online,
            next_order_id: Mutex::new(1),
            placed_orders: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
        }
    }
}

/// A mock broker that records calls and returns configurable responses.
pub struct MockBroker {
    order_mode: OrderMode,
    accounts: Vec<Account>,
    symbols: Vec<SymbolMatch>,
    accounts_error: Option<BrokerError>,
    search_error: Option<BrokerError>,
    online: bool,
    next_order_id: Mutex<u64>,
    placed_orders: Mutex<Vec<OrderRequest>>,
    searches: Mutex<Vec<RecordedSearch>>,
}

impl MockBroker {
    pub fn builder() -> MockBrokerBuilder {
        MockBrokerBuilder {
            order_mode: OrderMode::Accept,
            accounts: Vec::new(),
            symbols: Vec::new(),
            accounts_error: None,
            search_error: None,
            online: true,
        }
    }

    /// Get all orders that reached `place_order` (for assertion in tests).
    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.placed_orders.lock().unwrap().clone()
    }

    /// Get all symbol searches performed (for assertion in tests).
    pub fn searches(&self) -> Vec<RecordedSearch> {
        self.searches.lock().unwrap().clone()
    }
}

impl Broker for MockBroker {
    fn status(&self) -> Result<ApiStatus, BrokerError> {
        if !self.online {
            return Err(BrokerError::Connection("mock: offline".into()));
        }
        Ok(ApiStatus {
            online: true,
            version: Some("mock".into()),
        })
    }

    fn accounts(&self) -> Result<Vec<Account>, BrokerError> {
        if let Some(err) = &self.accounts_error {
            return Err(err.clone());
        }
        Ok(self.accounts.clone())
    }

    fn search_symbols(
        &self,
        account_id: &str,
        query: &str,
    ) -> Result<Vec<SymbolMatch>, BrokerError> {
        self.searches.lock().unwrap().push(RecordedSearch {
            account_id: account_id.to_string(),
            query: query.to_string(),
        });

        if let Some(err) = &self.search_error {
            return Err(err.clone());
        }

        // Substring search, like the real endpoint
        let needle = query.to_ascii_uppercase();
        Ok(self
            .symbols
            .iter()
            .filter(|s| s.ticker.to_ascii_uppercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder, BrokerError> {
        self.placed_orders.lock().unwrap().push(order.clone());

        match &self.order_mode {
            OrderMode::Reject(msg) => return Err(BrokerError::Order(msg.clone())),
            OrderMode::RejectSymbols(ids) if ids.contains(&order.universal_symbol_id) => {
                return Err(BrokerError::Order(format!(
                    "mock: order for {} rejected",
                    order.universal_symbol_id
                )));
            }
            _ => {}
        }

        let mut next = self.next_order_id.lock().unwrap();
        let id = *next;
        *next += 1;
        Ok(PlacedOrder {
            order_id: format!("mock-{id}"),
            status: "EXECUTED".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderbridge::{Action, OrderType, TimeInForce};
    use rust_decimal_macros::dec;

    fn order(symbol_id: &str) -> OrderRequest {
        OrderRequest {
            account_id: "acct-1".into(),
            action: Action::Buy,
            order_type: OrderType::Limit(dec!(150.50)),
            time_in_force: TimeInForce::DAY,
            universal_symbol_id: symbol_id.into(),
            units: dec!(10),
        }
    }

    #[test]
    fn builder_basic() {
        let broker = MockBroker::builder()
            .with_account("acct-1", "U1")
            .with_account("acct-2", "U2")
            .with_symbol("uid-aapl", "AAPL", "NASDAQ")
            .build();

        let accounts = broker.accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].number.as_deref(), Some("U2"));
        assert!(broker.status().unwrap().online);
    }

    #[test]
    fn search_is_substring_and_recorded() {
        let broker = MockBroker::builder()
            .with_symbol("uid-aapl", "AAPL", "NASDAQ")
            .with_symbol("uid-aap", "AAP", "NYSE")
            .with_symbol("uid-msft", "MSFT", "NASDAQ")
            .build();

        let matches = broker.search_symbols("acct-1", "aap").unwrap();
        assert_eq!(matches.len(), 2);

        let searches = broker.searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].account_id, "acct-1");
        assert_eq!(searches[0].query, "aap");
    }

    #[test]
    fn place_records_orders() {
        let broker = MockBroker::builder().build();

        let first = broker.place_order(&order("uid-aapl")).unwrap();
        let second = broker.place_order(&order("uid-msft")).unwrap();
        assert_eq!(first.order_id, "mock-1");
        assert_eq!(second.order_id, "mock-2");
        assert_eq!(first.status, "EXECUTED");

        let placed = broker.placed_orders();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].limit_price(), Some(dec!(150.50)));
    }

    #[test]
    fn reject_mode() {
        let broker = MockBroker::builder()
            .order_mode(OrderMode::Reject("insufficient buying power".into()))
            .build();

        let err = broker.place_order(&order("uid-aapl")).unwrap_err();
        assert_eq!(
            err,
            BrokerError::Order("insufficient buying power".into())
        );
        assert_eq!(broker.placed_orders().len(), 1);
    }

    #[test]
    fn reject_selected_symbols() {
        let broker = MockBroker::builder()
            .order_mode(OrderMode::RejectSymbols(vec!["uid-tsla".into()]))
            .build();

        assert!(broker.place_order(&order("uid-aapl")).is_ok());
        assert!(broker.place_order(&order("uid-tsla")).is_err());
    }

    #[test]
    fn configured_failures() {
        let broker = MockBroker::builder()
            .fail_accounts(BrokerError::Auth("invalid userSecret".into()))
            .fail_search(BrokerError::Timeout("search".into()))
            .offline()
            .build();

        assert!(broker.accounts().unwrap_err().is_auth());
        assert!(broker.search_symbols("a", "AAPL").is_err());
        assert!(broker.status().is_err());
    }
}
