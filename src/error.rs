//! Validation and loading errors for CSV order files.

use std::path::PathBuf;

/// Why a single CSV row could not become an [`OrderRecord`](crate::OrderRecord).
///
/// Row validation errors never abort a load; they are attached to the row's
/// [`RowOutcome`](crate::RowOutcome).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A mandatory column is absent from the header or blank in this row.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unrecognized action '{0}' (expected BUY or SELL)")]
    InvalidAction(String),

    #[error("quantity '{0}' is not a number")]
    InvalidQuantity(String),

    #[error("quantity '{0}' has more than 28 decimal places")]
    QuantityTooPrecise(String),

    /// Quantity must be greater than zero.
    #[error("quantity must be greater than zero (got {0})")]
    NonPositiveQuantity(String),

    #[error("unrecognized order type '{0}' (expected MKT, LMT or STP)")]
    InvalidOrderType(String),

    /// LIMIT orders need a positive `LmtPrice`.
    #[error("limit order requires a positive LmtPrice (got '{0}')")]
    InvalidLimitPrice(String),

    /// STOP orders need a positive `AuxPrice`.
    #[error("stop order requires a positive AuxPrice (got '{0}')")]
    InvalidStopPrice(String),

    /// The CSV reader could not decode the row at all.
    #[error("malformed row: {0}")]
    MalformedRow(String),
}

/// Failure to open or read an order file as a whole.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open order file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read order file: {0}")]
    Read(#[from] csv::Error),
}
