//! JSONL audit trail logging.
//!
//! Each run appends events to an audit.jsonl file, one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use orderbridge::loader::OrderFile;
use orderbridge_broker::Account;
use serde::Serialize;

use crate::error::Result;
use crate::report::{Mode, RowReport, RowStatus, RunSummary};

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger. A disabled log accepts events and drops them.
pub struct AuditLog {
    writer: Option<Box<dyn Write + Send>>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Write events to any sink, one JSON object per line.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Some(Box::new(writer)),
        }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Convenience: log a run start event.
pub fn log_run_started(audit: &mut AuditLog, input_file: &Path, mode: Mode) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "input_file": input_file.display().to_string(),
            "mode": mode.as_str(),
        }),
    )
}

/// Convenience: log the connected accounts.
pub fn log_accounts(audit: &mut AuditLog, accounts: &[Account]) -> Result<()> {
    let data: Vec<_> = accounts
        .iter()
        .map(|a| {
            serde_json::json!({
                "id": a.id,
                "number": a.number,
                "institution": a.institution,
            })
        })
        .collect();

    audit.log("accounts_fetched", serde_json::json!({ "accounts": data }))
}

/// Convenience: log the rows read from the order file.
pub fn log_orders_loaded(audit: &mut AuditLog, file: &OrderFile) -> Result<()> {
    let orders: Vec<_> = file
        .orders()
        .map(|(row, order)| serde_json::json!({ "row": row, "order": order }))
        .collect();

    audit.log(
        "orders_loaded",
        serde_json::json!({
            "rows": file.rows.len(),
            "invalid": file.invalid_count(),
            "orders": orders,
        }),
    )
}

/// Convenience: log one row's terminal result.
pub fn log_row(audit: &mut AuditLog, report: &RowReport) -> Result<()> {
    let mut data = serde_json::json!({
        "row": report.row,
        "symbol": report.ticker,
        "status": report.status.kind(),
    });
    match &report.status {
        RowStatus::Submitted { order_id, status } => {
            data["order_id"] = serde_json::json!(order_id);
            data["remote_status"] = serde_json::json!(status);
        }
        RowStatus::Simulated(req) => {
            data["request"] = serde_json::json!(req.to_string());
        }
        other => {
            data["error"] = serde_json::json!(other.message());
        }
    }
    audit.log("row_result", data)
}

/// Convenience: log run completion.
pub fn log_run_completed(audit: &mut AuditLog, summary: &RunSummary) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "mode": summary.mode.as_str(),
            "processed": summary.processed(),
            "succeeded": summary.succeeded(),
            "failed": summary.failed(),
        }),
    )
}
