//! Error types for the runner.
//!
//! Everything here is fatal to a run. Per-row problems never become an
//! [`Error`]; they are recorded in the row's report instead.

use std::path::PathBuf;

use orderbridge::LoadError;
use orderbridge_broker::BrokerError;

/// All errors that stop a run before or instead of processing rows.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("input file error: {0}")]
    Input(#[from] LoadError),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("no brokerage accounts are connected for this user")]
    NoAccounts,

    #[error(
        "{accounts} accounts are connected but row {row} has no Account value; \
         fill the Account column (account id or number)"
    )]
    AmbiguousAccount { accounts: usize, row: usize },

    #[error("{count} valid orders exceed max_orders_per_run = {limit}")]
    TooManyOrders { count: usize, limit: usize },

    #[error("execution aborted: {0}")]
    Aborted(String),

    /// The confirmation prompt could not be shown or answered, e.g. no TTY.
    #[error("confirmation prompt failed: {0}; pass --force to run unattended")]
    Prompt(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl From<BrokerError> for Error {
    fn from(e: BrokerError) -> Self {
        match e {
            BrokerError::Auth(msg) => Error::Auth(msg),
            other => Error::Connection(other.to_string()),
        }
    }
}

impl Error {
    /// Process exit code: 0 only when the operator declined the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Aborted(_) => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
