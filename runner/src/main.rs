//! CLI entry point for orderbridge.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dotenv::dotenv;

use orderbridge_runner::config::Config;
use orderbridge_runner::error::Error;
use orderbridge_runner::execution::{self, RunOptions};

#[derive(Parser)]
#[command(name = "orderbridge")]
#[command(about = "Place orders from a CSV file through SnapTrade")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: orderbridge.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate, resolve and place (or simulate) every order in a CSV file
    Run {
        /// Path to the orders CSV (default: run.input_file / CSV_INPUT_FILE)
        csv: Option<PathBuf>,

        /// Simulate placement; no orders are sent
        #[arg(long, conflicts_with = "live")]
        dry_run: bool,

        /// Place real orders
        #[arg(long)]
        live: bool,

        /// Skip confirmation prompt (for automation/cron)
        #[arg(long)]
        force: bool,
    },

    /// Check a CSV file without contacting SnapTrade
    Validate {
        /// Path to the orders CSV
        csv: Option<PathBuf>,
    },

    /// List connected brokerage accounts
    Accounts,

    /// Check SnapTrade API status
    Status,

    /// Print a link for connecting a brokerage account
    ConnectUrl {
        /// Brokerage slug, e.g. ALPACA or QUESTRADE
        #[arg(long)]
        broker: Option<String>,

        /// URL to return to after connecting
        #[arg(long)]
        redirect: Option<String>,
    },
}

fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let level = if cli.verbose || config.run.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    let result = match cli.command {
        Command::Run {
            csv,
            dry_run,
            live,
            force,
        } => {
            let mut opts = RunOptions::from_config(&config);
            if let Some(csv) = csv {
                opts.input_file = csv;
            }
            if dry_run {
                opts.dry_run = true;
            } else if live {
                opts.dry_run = false;
            }
            opts.force = force;

            execution::run(&config, &opts).map(|summary| {
                print!("\n{summary}");
                if opts.dry_run {
                    println!("\n[DRY RUN] No orders submitted.");
                }
            })
        }
        Command::Validate { csv } => {
            let path = csv.unwrap_or_else(|| config.run.input_file.clone());
            execution::validate(&path).map(|_| ())
        }
        Command::Accounts => execution::show_accounts(&config),
        Command::Status => execution::check_status(&config),
        Command::ConnectUrl { broker, redirect } => {
            execution::connect_url(&config, broker.as_deref(), redirect.as_deref())
        }
    };

    if let Err(e) = result {
        match &e {
            Error::Aborted(msg) => eprintln!("{msg}"),
            _ => eprintln!("Error: {e}"),
        }
        process::exit(e.exit_code());
    }
}
