//! orderbridge-runner: CSV order files to SnapTrade.
//!
//! Loads accounts from SnapTrade, validates the rows of a CSV order file,
//! resolves each ticker to a universal symbol id, and places (or, in dry-run
//! mode, simulates) one order per valid row with per-row error isolation and
//! an audit trail.

pub mod audit;
pub mod broker;
pub mod config;
pub mod error;
pub mod execution;
pub mod report;
pub mod resolver;
pub mod submitter;
