//! Run orchestrator: accounts → load → confirm → resolve/submit per row → summary.
//!
//! This is the main workflow that ties together all components. The core
//! [`run_with`] is generic over [`Broker`] so it runs against the mock in tests.

use std::path::{Path, PathBuf};

use log::{info, warn};
use orderbridge::loader::{self, OrderFile, RowOutcome};
use orderbridge::OrderRecord;
use orderbridge_broker::{Account, Broker};

use crate::audit::{self, AuditLog};
use crate::broker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::{Mode, RowReport, RowStatus, RunSummary};
use crate::resolver::SymbolResolver;
use crate::submitter::{OrderSubmitter, Submission};

/// Options for one run, after CLI overrides are applied to the config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_file: PathBuf,
    pub dry_run: bool,
    /// Skip the confirmation prompt before live submission.
    pub force: bool,
}

impl RunOptions {
    /// Options taken from the config alone.
    pub fn from_config(config: &Config) -> Self {
        Self {
            input_file: config.run.input_file.clone(),
            dry_run: config.run.dry_run,
            force: false,
        }
    }
}

/// Execute a full run against SnapTrade, prompting on the terminal before a
/// live submission.
pub fn run(config: &Config, opts: &RunOptions) -> Result<RunSummary> {
    let broker = broker::connect(config)?;
    let mut audit = open_audit(config)?;
    run_with(&broker, config, opts, &mut audit, confirm_on_terminal)
}

/// Execute a run against any broker.
///
/// `confirm` is asked before a live, non-forced submission with the number of
/// valid orders; returning `false` aborts with [`Error::Aborted`].
///
/// Audit failures are fatal only before the first row is processed. After
/// that they are logged and counted in [`RunSummary::audit_failures`].
pub fn run_with<B, F>(
    broker: &B,
    config: &Config,
    opts: &RunOptions,
    audit: &mut AuditLog,
    confirm: F,
) -> Result<RunSummary>
where
    B: Broker,
    F: FnOnce(usize) -> Result<bool>,
{
    let mode = Mode::from_dry_run(opts.dry_run);
    audit::log_run_started(audit, &opts.input_file, mode)?;

    // 1. Accounts
    let accounts = broker.accounts()?;
    if accounts.is_empty() {
        return Err(Error::NoAccounts);
    }
    info!("{} connected account(s)", accounts.len());
    audit::log_accounts(audit, &accounts)?;

    // 2. Orders
    let file = loader::load_file(&opts.input_file)?;
    info!(
        "Loaded {} row(s) from {}: {} valid, {} invalid",
        file.rows.len(),
        opts.input_file.display(),
        file.valid_count(),
        file.invalid_count()
    );
    audit::log_orders_loaded(audit, &file)?;
    check_accounts(&file, &accounts)?;
    enforce_max_orders_per_run(file.valid_count(), config.run.max_orders_per_run)?;

    // 3. Confirm
    if mode == Mode::Live && !opts.force && file.valid_count() > 0 {
        display_plan(&file);
        let approved = confirm(file.valid_count())?;
        audit.log("user_confirmed", serde_json::json!({ "approved": approved }))?;
        if !approved {
            return Err(Error::Aborted("Aborted; no orders submitted.".into()));
        }
    }

    // 4. Process
    let mut resolver = SymbolResolver::new(config.run.symbol_policy, config.run.cache_symbols);
    let submitter = OrderSubmitter::new(opts.dry_run);
    let mut summary = RunSummary::new(mode);

    for outcome in &file.rows {
        let report = process_row(broker, &accounts, &file, outcome, &mut resolver, &submitter);
        if report.status.is_success() {
            info!("{report}");
        } else {
            warn!("{report}");
        }
        if let Err(e) = audit::log_row(audit, &report) {
            warn!("Audit write failed for row {}: {e}", report.row);
            summary.audit_failures += 1;
        }
        summary.rows.push(report);
    }

    // 5. Summarize
    if let Err(e) = audit::log_run_completed(audit, &summary) {
        warn!("Audit write failed for run completion: {e}");
        summary.audit_failures += 1;
    }
    Ok(summary)
}

/// Turn one row outcome into its terminal report. Never fails the run.
fn process_row<B: Broker>(
    broker: &B,
    accounts: &[Account],
    file: &OrderFile,
    outcome: &RowOutcome,
    resolver: &mut SymbolResolver,
    submitter: &OrderSubmitter,
) -> RowReport {
    let order = match &outcome.result {
        Ok(order) => order,
        Err(e) => {
            return RowReport {
                row: outcome.row,
                ticker: outcome.raw_symbol(&file.columns),
                status: RowStatus::ValidationFailed(e.to_string()),
            };
        }
    };

    RowReport {
        row: outcome.row,
        ticker: Some(order.symbol().to_string()),
        status: submit_order(broker, accounts, order, resolver, submitter),
    }
}

fn submit_order<B: Broker>(
    broker: &B,
    accounts: &[Account],
    order: &OrderRecord,
    resolver: &mut SymbolResolver,
    submitter: &OrderSubmitter,
) -> RowStatus {
    let account = match select_account(accounts, order.account()) {
        Some(account) => account,
        None => {
            return RowStatus::SubmissionFailed(format!(
                "account {} is not connected",
                order.account().unwrap_or_default()
            ));
        }
    };

    let symbol_id = match resolver.resolve(broker, &account.id, order.symbol(), order.exchange()) {
        Ok(id) => id,
        Err(e) => return RowStatus::ResolutionFailed(e.to_string()),
    };

    match submitter.submit(broker, order, &account.id, &symbol_id) {
        Ok(Submission::Placed(placed)) => RowStatus::Submitted {
            order_id: placed.order_id,
            status: placed.status,
        },
        Ok(Submission::Simulated(request)) => RowStatus::Simulated(request),
        Err(e) => RowStatus::SubmissionFailed(e.to_string()),
    }
}

/// The account a row targets: the named one, or the only connected account.
pub fn select_account<'a>(accounts: &'a [Account], key: Option<&str>) -> Option<&'a Account> {
    match key {
        Some(key) => accounts.iter().find(|a| a.matches(key)),
        None if accounts.len() == 1 => accounts.first(),
        None => None,
    }
}

/// With several accounts connected, every valid row must name one.
pub fn check_accounts(file: &OrderFile, accounts: &[Account]) -> Result<()> {
    if accounts.len() <= 1 {
        return Ok(());
    }
    match file.orders().find(|(_, order)| order.account().is_none()) {
        Some((row, _)) => Err(Error::AmbiguousAccount {
            accounts: accounts.len(),
            row,
        }),
        None => Ok(()),
    }
}

/// Reject runs with more valid orders than `limit` (0 = unlimited).
pub fn enforce_max_orders_per_run(count: usize, limit: usize) -> Result<()> {
    if limit > 0 && count > limit {
        return Err(Error::TooManyOrders { count, limit });
    }
    Ok(())
}

/// List connected accounts.
pub fn show_accounts(config: &Config) -> Result<()> {
    let broker = broker::connect(config)?;
    let accounts = broker.accounts()?;
    print!("{}", format_accounts(&accounts));
    Ok(())
}

pub fn format_accounts(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No connected accounts. Run `orderbridge connect-url` to link a brokerage.\n"
            .into();
    }
    let mut out = String::from("CONNECTED ACCOUNTS:\n");
    for account in accounts {
        out.push_str(&format!("  {account}\n"));
    }
    out
}

/// Check that the SnapTrade API is reachable.
pub fn check_status(config: &Config) -> Result<()> {
    print!("Checking SnapTrade at {}... ", config.connection.base_url);
    let broker = broker::connect(config)?;
    let status = broker.status()?;
    if status.online {
        println!(
            "OK (API version {})",
            status.version.as_deref().unwrap_or("unknown")
        );
        Ok(())
    } else {
        println!("OFFLINE");
        Err(Error::Connection("SnapTrade reports the API offline".into()))
    }
}

/// Print a connection-portal URL for linking a brokerage.
pub fn connect_url(config: &Config, broker_slug: Option<&str>, redirect: Option<&str>) -> Result<()> {
    let broker = broker::connect(config)?;
    let url = broker.login_link(broker_slug, redirect)?;
    println!("Open this link to connect a brokerage account:\n\n  {url}");
    Ok(())
}

/// Load and validate an order file without contacting the service.
pub fn validate(path: &Path) -> Result<OrderFile> {
    let file = loader::load_file(path)?;
    print!("{}", format_validation(&file));
    Ok(file)
}

pub fn format_validation(file: &OrderFile) -> String {
    let mut out = String::from("VALIDATION:\n");
    for outcome in &file.rows {
        let ticker = outcome.raw_symbol(&file.columns).unwrap_or_else(|| "-".into());
        match &outcome.result {
            Ok(order) => out.push_str(&format!("  row {:>4}  OK       {order}\n", outcome.row)),
            Err(e) => out.push_str(&format!("  row {:>4}  INVALID  {ticker}: {e}\n", outcome.row)),
        }
    }
    out.push_str(&format!(
        "\n  {} row(s): {} valid, {} invalid\n",
        file.rows.len(),
        file.valid_count(),
        file.invalid_count()
    ));
    out
}

// === Helpers ===

fn open_audit(config: &Config) -> Result<AuditLog> {
    if config.logging.audit {
        AuditLog::open(&config.audit_path())
    } else {
        Ok(AuditLog::disabled())
    }
}

fn display_plan(file: &OrderFile) {
    println!("\nORDERS TO PLACE (live):");
    for (row, order) in file.orders() {
        let account = order.account().unwrap_or("default account");
        println!("  row {row:>4}  {order}  [{account}]");
    }
    if file.invalid_count() > 0 {
        println!("  ({} invalid row(s) will be skipped)", file.invalid_count());
    }
    println!();
}

fn confirm_on_terminal(count: usize) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!("Place {count} live order(s)?"))
        .default(false)
        .interact()
        .map_err(|e| Error::Prompt(e.to_string()))
}
