//! Construction of the live SnapTrade connection from config.

use std::time::Duration;

use log::debug;
use orderbridge_broker::snaptrade::SnapTradeBroker;

use crate::config::Config;
use crate::error::{Error, Result};

/// Build a SnapTrade broker from the config's credentials and connection
/// settings. No request is made here.
pub fn connect(config: &Config) -> Result<SnapTradeBroker> {
    let credentials = config.broker_credentials()?;
    debug!(
        "SnapTrade client for user {} at {} (timeout {}s)",
        credentials.user_id, config.connection.base_url, config.connection.timeout_secs
    );
    SnapTradeBroker::new(
        credentials,
        &config.connection.base_url,
        Duration::from_secs(config.connection.timeout_secs),
    )
    .map_err(|e| Error::Config(e.to_string()))
}
