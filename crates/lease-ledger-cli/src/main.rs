mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::lease::{JournalArgs, ScheduleArgs};
use commands::portfolio::PortfolioArgs;

/// ASC 842 lease schedules, journal entries and portfolio rollforwards
#[derive(Parser)]
#[command(
    name = "lease",
    version,
    about = "ASC 842 lease schedules, journal entries and portfolio rollforwards",
    long_about = "Computes lessee lease accounting with decimal precision: escalating \
                  payment streams, present-value measurement of the lease liability and \
                  ROU asset, effective-interest amortization schedules, balanced monthly \
                  journal entries, and consolidated portfolio rollforwards."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log verbosity for diagnostics on stderr. Overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN, global = true)]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure a lease and print its amortization schedule
    Schedule(ScheduleArgs),
    /// Generate monthly journal entries for a lease
    Journal(JournalArgs),
    /// Consolidate many leases into a rollforward report
    Portfolio(PortfolioArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::lease::run_schedule(args),
        Commands::Journal(args) => commands::lease::run_journal(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Version => {
            println!("lease {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "lease_ledger_core={},{}={}",
            level,
            env!("CARGO_CRATE_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
