//! SnapTrade REST API client.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroize;

use super::auth;
use super::types::{
    AccountWire, ErrorBody, LoginBody, LoginRedirect, OrderResponse, PlaceOrderBody,
    StatusResponse, SymbolSearchBody, UniversalSymbolWire,
};
use crate::error::BrokerError;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.snaptrade.com/api/v1";

/// Partner and user credentials. Secrets are wiped on drop and never printed.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub consumer_key: String,
    pub user_id: String,
    pub user_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("consumer_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("user_secret", &"<redacted>")
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.consumer_key.zeroize();
        self.user_secret.zeroize();
    }
}

/// Blocking SnapTrade REST client.
pub struct SnapTradeClient {
    client: Client,
    credentials: Credentials,
    base_url: Url,
}

impl SnapTradeClient {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, BrokerError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| BrokerError::Other(format!("invalid base URL {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    /// Service status (GET /). Signed with partner credentials only.
    pub fn api_status(&self) -> Result<StatusResponse, BrokerError> {
        self.send::<StatusResponse, ()>(Method::Get, "/", None, false)
    }

    /// Accounts connected for the user (GET /accounts).
    pub fn list_accounts(&self) -> Result<Vec<AccountWire>, BrokerError> {
        self.send::<Vec<AccountWire>, ()>(Method::Get, "/accounts", None, true)
    }

    /// Symbols tradable in an account matching `substring`
    /// (POST /accounts/{id}/symbols).
    pub fn symbol_search(
        &self,
        account_id: &str,
        substring: &str,
    ) -> Result<Vec<UniversalSymbolWire>, BrokerError> {
        let path = format!("/accounts/{account_id}/symbols");
        self.send(
            Method::Post,
            &path,
            Some(&SymbolSearchBody { substring }),
            true,
        )
    }

    /// Place a trade immediately (POST /trade/place).
    pub fn place_order(&self, body: &PlaceOrderBody) -> Result<OrderResponse, BrokerError> {
        debug!(
            "Placing SnapTrade order: {} {} {} ({}, {})",
            body.action, body.units, body.universal_symbol_id, body.order_type, body.time_in_force
        );
        self.send(Method::Post, "/trade/place", Some(body), true)
    }

    /// Connection-portal link for linking a brokerage (POST /snapTrade/login).
    pub fn login_link(&self, body: &LoginBody) -> Result<LoginRedirect, BrokerError> {
        self.send(Method::Post, "/snapTrade/login", Some(body), true)
    }

    /// Build the full URL for `path` with the signed query parameters.
    fn url_for(&self, path: &str, user_scoped: bool) -> Url {
        let mut url = self.base_url.clone();
        let full_path = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&full_path);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("clientId", &self.credentials.client_id);
            query.append_pair("timestamp", &current_timestamp_secs().to_string());
            if user_scoped {
                query.append_pair("userId", &self.credentials.user_id);
                query.append_pair("userSecret", &self.credentials.user_secret);
            }
        }
        url
    }

    fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        user_scoped: bool,
    ) -> Result<T, BrokerError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url_for(path, user_scoped);
        let content = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| BrokerError::Other(format!("failed to encode request: {e}")))?;
        let signature = auth::sign(
            &self.credentials.consumer_key,
            url.path(),
            url.query().unwrap_or_default(),
            content.as_ref(),
        );

        debug!("SnapTrade {} {}", method.as_str(), url.path());

        let request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let request = request.header("Signature", signature);
        let request = match &content {
            Some(json) => request.json(json),
            None => request,
        };

        let resp = request.send().map_err(|e| send_error(path, e))?;
        let resp = check_status(resp)?;
        resp.json::<T>()
            .map_err(|e| BrokerError::Decode(format!("{path}: {e}")))
    }
}

#[derive(Clone, Copy)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

fn send_error(path: &str, e: reqwest::Error) -> BrokerError {
    if e.is_timeout() {
        BrokerError::Timeout(format!("{path}: {e}"))
    } else {
        BrokerError::Connection(format!("{path}: {e}"))
    }
}

/// Map non-success statuses to [`BrokerError`].
fn check_status(resp: Response) -> Result<Response, BrokerError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = ErrorBody::describe(&resp.text().unwrap_or_default());
    Err(map_status(status.as_u16(), message))
}

pub(crate) fn map_status(status: u16, message: String) -> BrokerError {
    match status {
        401 | 403 => BrokerError::Auth(message),
        429 => BrokerError::RateLimit,
        _ => BrokerError::Api { status, message },
    }
}

/// Current timestamp in seconds.
fn current_timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
