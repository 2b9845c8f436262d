//! Per-row reports and the run summary.

use std::fmt;

use orderbridge_broker::OrderRequest;

/// Whether orders are placed or only simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DryRun,
    Live,
}

impl Mode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Mode::DryRun } else { Mode::Live }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::DryRun => "dry-run",
            Mode::Live => "live",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of one CSV data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Placed live; carries the remote order id and status.
    Submitted { order_id: String, status: String },
    /// Dry run; carries the request that would have been sent.
    Simulated(OrderRequest),
    ValidationFailed(String),
    ResolutionFailed(String),
    SubmissionFailed(String),
}

impl RowStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RowStatus::Submitted { .. } | RowStatus::Simulated(_))
    }

    /// Short machine-friendly name, used in the audit trail.
    pub fn kind(&self) -> &'static str {
        match self {
            RowStatus::Submitted { .. } => "submitted",
            RowStatus::Simulated(_) => "simulated",
            RowStatus::ValidationFailed(_) => "validation_failed",
            RowStatus::ResolutionFailed(_) => "resolution_failed",
            RowStatus::SubmissionFailed(_) => "submission_failed",
        }
    }

    /// Failure message, if the row failed.
    pub fn message(&self) -> Option<&str> {
        match self {
            RowStatus::ValidationFailed(m)
            | RowStatus::ResolutionFailed(m)
            | RowStatus::SubmissionFailed(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Submitted { order_id, status } => {
                write!(f, "SUBMITTED id={order_id} ({status})")
            }
            RowStatus::Simulated(req) => write!(f, "SIMULATED {req}"),
            RowStatus::ValidationFailed(m) => write!(f, "INVALID: {m}"),
            RowStatus::ResolutionFailed(m) => write!(f, "UNRESOLVED: {m}"),
            RowStatus::SubmissionFailed(m) => write!(f, "FAILED: {m}"),
        }
    }
}

/// Result for one CSV data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub row: usize,
    pub ticker: Option<String>,
    pub status: RowStatus,
}

impl fmt::Display for RowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {:>4}  {:8} {}",
            self.row,
            self.ticker.as_deref().unwrap_or("-"),
            self.status
        )
    }
}

/// Outcome of a completed run, rows in input order.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: Mode,
    pub rows: Vec<RowReport>,
    /// Audit events that could not be written once processing began.
    pub audit_failures: usize,
}

impl RunSummary {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            rows: Vec::new(),
            audit_failures: 0,
        }
    }

    pub fn processed(&self) -> usize {
        self.rows.len()
    }

    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    /// False if any row result or the completion event is missing from the
    /// audit trail.
    pub fn audit_complete(&self) -> bool {
        self.audit_failures == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RUN SUMMARY ({}):", self.mode)?;
        for report in &self.rows {
            writeln!(f, "  {report}")?;
        }
        writeln!(
            f,
            "\n  {} processed, {} succeeded, {} failed",
            self.processed(),
            self.succeeded(),
            self.failed()
        )?;
        if !self.audit_complete() {
            writeln!(
                f,
                "  WARNING: audit trail incomplete ({} event(s) not written)",
                self.audit_failures
            )?;
        }
        Ok(())
    }
}
