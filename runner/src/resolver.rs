//! Ticker → universal symbol id resolution.
//!
//! Resolution searches the symbols tradable in one account, keeps the exact
//! ticker matches, and settles ties with the configured [`SymbolPolicy`].

use log::debug;
use orderbridge::order::DEFAULT_EXCHANGE;
use orderbridge_broker::{Broker, BrokerError, SymbolMatch};
use rustc_hash::FxHashMap;

use crate::config::SymbolPolicy;

/// Why a ticker could not be resolved. Always a per-row failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("symbol not found: {0}")]
    NotFound(String),

    #[error("symbol {ticker} is ambiguous: {}", candidates.join(", "))]
    Ambiguous {
        ticker: String,
        candidates: Vec<String>,
    },

    #[error("symbol search failed: {0}")]
    Broker(#[from] BrokerError),
}

/// Resolves tickers for one run, optionally caching search results.
pub struct SymbolResolver {
    policy: SymbolPolicy,
    cache: Option<FxHashMap<(String, String), Vec<SymbolMatch>>>,
}

impl SymbolResolver {
    pub fn new(policy: SymbolPolicy, cache: bool) -> Self {
        Self {
            policy,
            cache: cache.then(FxHashMap::default),
        }
    }

    /// Resolve `ticker` in `account_id` to a universal symbol id.
    ///
    /// `exchange` is the row's exchange column; only
    /// [`SymbolPolicy::PreferExchange`] looks at it.
    pub fn resolve<B: Broker>(
        &mut self,
        broker: &B,
        account_id: &str,
        ticker: &str,
        exchange: &str,
    ) -> Result<String, ResolveError> {
        let exact = self.exact_matches(broker, account_id, ticker)?;
        let chosen = select(&exact, self.policy, ticker, exchange)?;
        debug!(
            "Resolved {ticker} -> {} ({})",
            chosen.id,
            chosen.exchange.as_deref().unwrap_or("?")
        );
        Ok(chosen.id.clone())
    }

    fn exact_matches<B: Broker>(
        &mut self,
        broker: &B,
        account_id: &str,
        ticker: &str,
    ) -> Result<Vec<SymbolMatch>, ResolveError> {
        let key = (account_id.to_string(), ticker.to_ascii_uppercase());
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            return Ok(hit.clone());
        }

        let exact: Vec<SymbolMatch> = broker
            .search_symbols(account_id, ticker)?
            .into_iter()
            .filter(|m| m.is_exact(ticker))
            .collect();

        if let Some(cache) = self.cache.as_mut() {
            cache.insert(key, exact.clone());
        }
        Ok(exact)
    }
}

/// Apply `policy` to the exact matches for `ticker`.
pub fn select<'a>(
    exact: &'a [SymbolMatch],
    policy: SymbolPolicy,
    ticker: &str,
    exchange: &str,
) -> Result<&'a SymbolMatch, ResolveError> {
    let first = exact
        .first()
        .ok_or_else(|| ResolveError::NotFound(ticker.to_string()))?;

    match policy {
        SymbolPolicy::First => Ok(first),
        SymbolPolicy::Unique if exact.len() > 1 => Err(ResolveError::Ambiguous {
            ticker: ticker.to_string(),
            candidates: exact.iter().map(describe).collect(),
        }),
        SymbolPolicy::Unique => Ok(first),
        SymbolPolicy::PreferExchange => {
            if exchange.is_empty() || exchange.eq_ignore_ascii_case(DEFAULT_EXCHANGE) {
                return Ok(first);
            }
            Ok(exact.iter().find(|m| m.on_exchange(exchange)).unwrap_or(first))
        }
    }
}

fn describe(m: &SymbolMatch) -> String {
    match &m.exchange {
        Some(exchange) => format!("{} on {exchange} ({})", m.ticker, m.id),
        None => format!("{} ({})", m.ticker, m.id),
    }
}
