use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};

use lease_ledger_core::lease::LeaseInput;
use lease_ledger_core::portfolio::{
    aggregate_portfolio, DateRange, GroupMode, LeaseStore, MemoryLeaseStore, PortfolioRow,
    SavedLease,
};
use lease_ledger_core::with_metadata;

use crate::input;

const METHODOLOGY: &str =
    "Portfolio rollforward: schedules summed per group, beginning balance carried from the prior group";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupBy {
    Date,
    Period,
}

/// Arguments for the portfolio rollforward
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON or YAML map of lease name -> lease terms
    #[arg(long)]
    pub input: Option<String>,

    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Group rows by calendar date or by lease period
    #[arg(long, default_value = "date")]
    pub group_by: GroupBy,
}

#[derive(Serialize)]
struct PortfolioOutput {
    group_by: GroupMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<DateRange>,
    leases: Vec<String>,
    rows: Vec<PortfolioRow>,
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let leases: BTreeMap<String, LeaseInput> = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json|file.yaml> or stdin required for portfolio".into());
    };

    let window = match (args.from, args.to) {
        (None, None) => None,
        (from, to) => Some(DateRange::new(
            from.unwrap_or(NaiveDate::MIN),
            to.unwrap_or(NaiveDate::MAX),
        )),
    };
    let mode = match args.group_by {
        GroupBy::Date => GroupMode::ByDate,
        GroupBy::Period => GroupMode::ByPeriod,
    };

    let start = Instant::now();
    let mut store = MemoryLeaseStore::new();
    for (name, lease) in &leases {
        let saved = SavedLease::compute(lease.clone())
            .map_err(|e| format!("lease '{name}': {e}"))?;
        store.upsert(name, saved)?;
    }
    let schedules = store.schedules()?;
    let rows = aggregate_portfolio(&schedules, window, mode)?;
    let elapsed = start.elapsed().as_micros() as u64;

    let mut warnings = Vec::new();
    if matches!(mode, GroupMode::ByPeriod) {
        let starts: Vec<NaiveDate> = leases.values().map(|l| l.start_date).collect();
        if starts.windows(2).any(|w| w[0] != w[1]) {
            warnings.push(
                "Leases start on different dates; period groups do not line up in calendar time"
                    .to_string(),
            );
        }
    }
    if rows.is_empty() {
        warnings.push("No schedule rows fall inside the requested window".to_string());
    }

    let output = with_metadata(
        METHODOLOGY,
        &json!({ "lease_count": leases.len(), "window": window, "group_by": mode }),
        warnings,
        elapsed,
        PortfolioOutput {
            group_by: mode,
            window,
            leases: store.names()?,
            rows,
        },
    );
    Ok(serde_json::to_value(output)?)
}
