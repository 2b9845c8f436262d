//! SnapTrade aggregator implementation.

pub mod auth;
pub mod client;
pub mod types;

use std::time::Duration;

use log::info;

use crate::Broker;
use crate::error::BrokerError;
use crate::types::*;
use client::SnapTradeClient;
pub use client::{Credentials, DEFAULT_BASE_URL};
use types::{LoginBody, PlaceOrderBody};

/// SnapTrade broker implementing the generic Broker trait.
///
/// Uses the REST API for all operations. Blocking (sync) via reqwest::blocking.
pub struct SnapTradeBroker {
    client: SnapTradeClient,
}

impl SnapTradeBroker {
    /// Create a broker handle. No request is made until the first call.
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, BrokerError> {
        Ok(Self {
            client: SnapTradeClient::new(credentials, base_url, timeout)?,
        })
    }

    /// Connection-portal URL the user opens to link a brokerage.
    pub fn login_link(
        &self,
        broker: Option<&str>,
        redirect: Option<&str>,
    ) -> Result<String, BrokerError> {
        let body = LoginBody {
            broker: broker.map(str::to_string),
            custom_redirect: redirect.map(str::to_string),
        };
        Ok(self.client.login_link(&body)?.redirect_uri)
    }
}

impl Broker for SnapTradeBroker {
    fn status(&self) -> Result<ApiStatus, BrokerError> {
        Ok(self.client.api_status()?.into())
    }

    fn accounts(&self) -> Result<Vec<Account>, BrokerError> {
        let accounts: Vec<Account> = self
            .client
            .list_accounts()?
            .into_iter()
            .map(Account::from)
            .collect();
        info!("SnapTrade: {} connected account(s)", accounts.len());
        Ok(accounts)
    }

    fn search_symbols(
        &self,
        account_id: &str,
        query: &str,
    ) -> Result<Vec<SymbolMatch>, BrokerError> {
        Ok(self
            .client
            .symbol_search(account_id, query)?
            .into_iter()
            .map(SymbolMatch::from)
            .collect())
    }

    fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder, BrokerError> {
        let body = PlaceOrderBody::from(order);
        let placed: PlacedOrder = self
            .client
            .place_order(&body)
            .map_err(|e| match e {
                BrokerError::Api { status, message } if status < 500 => {
                    BrokerError::Order(format!("{status}: {message}"))
                }
                other => other,
            })?
            .into();
        info!(
            "SnapTrade order accepted: {order} -> id={} status={}",
            placed.order_id, placed.status
        );
        Ok(placed)
    }
}
