//! Broker trait and implementations for orderbridge.
//!
//! Provides a generic `Broker` trait over a brokerage-aggregation service:
//! list the connected accounts, look up a ticker's universal identifier, and
//! place an order. Implementations:
//!
//! - **SnapTrade** (feature `snaptrade`): SnapTrade REST API (blocking)
//! - **Mock** (always available): in-memory broker for tests

pub mod error;
pub mod mock;
pub mod types;

#[cfg(feature = "snaptrade")]
pub mod snaptrade;

pub use error::BrokerError;
pub use types::*;

/// A brokerage-aggregator connection.
///
/// Every call is a single blocking request; implementations never retry.
pub trait Broker {
    /// Check that the service is reachable.
    fn status(&self) -> Result<ApiStatus, BrokerError>;

    /// List brokerage accounts connected for the configured user.
    fn accounts(&self) -> Result<Vec<Account>, BrokerError>;

    /// Search instruments tradable in `account_id` whose ticker contains `query`.
    fn search_symbols(&self, account_id: &str, query: &str)
    -> Result<Vec<SymbolMatch>, BrokerError>;

    /// Place an order. Mutates the brokerage account.
    fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder, BrokerError>;
}

impl<B: Broker + ?Sized> Broker for &B {
    fn status(&self) -> Result<ApiStatus, BrokerError> {
        (**self).status()
    }

    fn accounts(&self) -> Result<Vec<Account>, BrokerError> {
        (**self).accounts()
    }

    fn search_symbols(
        &self,
        account_id: &str,
        query: &str,
    ) -> Result<Vec<SymbolMatch>, BrokerError> {
        (**self).search_symbols(account_id, query)
    }

    fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder, BrokerError> {
        (**self).place_order(order)
    }
}
