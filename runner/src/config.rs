//! Layered configuration: TOML file, then environment, then CLI overrides.
//!
//! The result is one explicit [`Config`] value built at startup and passed by
//! reference; nothing reads the environment after that.

use std::fmt;
use std::path::{Path, PathBuf};

use orderbridge_broker::snaptrade::{Credentials, DEFAULT_BASE_URL};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "orderbridge.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: CredentialsConfig,
    pub connection: ConnectionConfig,
    pub run: RunConfig,
    pub logging: LoggingConfig,
}

/// SnapTrade partner and user credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub consumer_key: String,
    pub user_id: String,
    pub user_secret: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("consumer_key", &redacted(&self.consumer_key))
            .field("user_id", &self.user_id)
            .field("user_secret", &redacted(&self.user_secret))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "<redacted>" }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
    pub symbol_policy: SymbolPolicy,
    pub cache_symbols: bool,
    /// 0 means unlimited.
    pub max_orders_per_run: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("orders.csv"),
            dry_run: true,
            verbose: false,
            symbol_policy: SymbolPolicy::First,
            cache_symbols: true,
            max_orders_per_run: 0,
        }
    }
}

/// How to pick among several exact ticker matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolPolicy {
    /// First exact match in the order the service returned them.
    #[default]
    First,
    /// More than one exact match is an error.
    Unique,
    /// First exact match on the row's exchange, else the first exact match.
    PreferExchange,
}

impl fmt::Display for SymbolPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolPolicy::First => write!(f, "first"),
            SymbolPolicy::Unique => write!(f, "unique"),
            SymbolPolicy::PreferExchange => write!(f, "prefer-exchange"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub audit_file: String,
    pub audit: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            audit_file: "audit.jsonl".into(),
            audit: true,
        }
    }
}

impl Config {
    /// Load config from an optional TOML file and the process environment.
    ///
    /// With `path = None`, [`DEFAULT_CONFIG_FILE`] is read if it exists.
    /// An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let contents = match path {
            Some(path) => Some(read_file(path)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Some(read_file(default)?)
                } else {
                    None
                }
            }
        };
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build config from TOML text (if any) overlaid with `env` lookups.
    pub fn from_sources<F>(toml_text: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = match toml_text {
            Some(text) => toml::from_str(text)?,
            None => Config::default(),
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("SNAPTRADE_CLIENT_ID") {
            self.credentials.client_id = v;
        }
        if let Some(v) = get("SNAPTRADE_CONSUMER_KEY") {
            self.credentials.consumer_key = v;
        }
        if let Some(v) = get("SNAPTRADE_USER_ID") {
            self.credentials.user_id = v;
        }
        if let Some(v) = get("SNAPTRADE_USER_SECRET") {
            self.credentials.user_secret = v;
        }
        if let Some(v) = get("SNAPTRADE_BASE_URL") {
            self.connection.base_url = v;
        }
        if let Some(v) = get("SNAPTRADE_TIMEOUT_SECS") {
            self.connection.timeout_secs = v.parse().map_err(|_| {
                Error::Config(format!("SNAPTRADE_TIMEOUT_SECS must be a whole number, got {v:?}"))
            })?;
        }
        if let Some(v) = get("CSV_INPUT_FILE") {
            self.run.input_file = PathBuf::from(v);
        }
        if let Some(v) = get("DRY_RUN") {
            self.run.dry_run = parse_flag("DRY_RUN", &v)?;
        }
        if let Some(v) = get("VERBOSE") {
            self.run.verbose = parse_flag("VERBOSE", &v)?;
        }
        Ok(())
    }

    /// Validate config invariants that do not depend on the command.
    fn validate(&self) -> Result<()> {
        if self.connection.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be > 0".into()));
        }
        if self.connection.base_url.trim().is_empty() {
            return Err(Error::Config("base_url must not be empty".into()));
        }
        if self.logging.audit && self.logging.audit_file.trim().is_empty() {
            return Err(Error::Config(
                "audit_file must not be empty while audit is enabled".into(),
            ));
        }
        Ok(())
    }

    /// Credentials for the HTTP client, or an error naming every missing one.
    pub fn broker_credentials(&self) -> Result<Credentials> {
        let c = &self.credentials;
        let missing: Vec<&str> = [
            ("SNAPTRADE_CLIENT_ID", &c.client_id),
            ("SNAPTRADE_CONSUMER_KEY", &c.consumer_key),
            ("SNAPTRADE_USER_ID", &c.user_id),
            ("SNAPTRADE_USER_SECRET", &c.user_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing credentials: {} (set them in the environment, a .env file, or [credentials])",
                missing.join(", ")
            )));
        }

        Ok(Credentials {
            client_id: c.client_id.clone(),
            consumer_key: c.consumer_key.clone(),
            user_id: c.user_id.clone(),
            user_secret: c.user_secret.clone(),
        })
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        self.logging.dir.join(&self.logging.audit_file)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{name} must be true or false, got {value:?}"
        ))),
    }
}
