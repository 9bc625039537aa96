use std::fs::File;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use lease_ledger_core::lease::journal::{self, AccountTotal, JournalLine};
use lease_ledger_core::lease::{amortization, LeaseInput, LeaseType};
use lease_ledger_core::{records, with_metadata};

use crate::input;

const SCHEDULE_METHODOLOGY: &str =
    "ASC 842 lessee measurement: PV of escalating payments at rate/12, effective interest amortization";
const JOURNAL_METHODOLOGY: &str = "ASC 842 monthly journal entries, amounts rounded to cents";

/// Lease terms, from a file, stdin, or individual flags
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LeaseArgs {
    /// Path to JSON or YAML lease input (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Lease term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Monthly payment in the first lease year
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Annual discount rate (e.g. 0.06 for 6%)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Annual payment escalation (e.g. 0.03 for 3%)
    #[arg(long)]
    pub escalation: Option<Decimal>,

    /// Commencement date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Payment timing: arrears (end) or advance (begin)
    #[arg(long, default_value = "arrears")]
    pub timing: String,

    /// Lease classification: operating or finance
    #[arg(long)]
    pub lease_type: Option<String>,

    /// ROU floor policy: report-only or every-period
    #[arg(long, default_value = "report-only")]
    pub rou_clamp: String,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub lease: LeaseArgs,

    /// Also write the schedule as CSV to this path
    #[arg(long)]
    pub write_csv: Option<String>,
}

/// Arguments for journal entry generation
#[derive(Args)]
pub struct JournalArgs {
    #[command(flatten)]
    pub lease: LeaseArgs,

    /// Also write the journal as CSV to this path
    #[arg(long)]
    pub write_csv: Option<String>,
}

#[derive(Serialize)]
struct JournalOutput {
    lease_type: LeaseType,
    lines: Vec<JournalLine>,
    totals: Vec<AccountTotal>,
}

pub fn resolve_lease_input(args: &LeaseArgs) -> Result<LeaseInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(lease) = input::stdin::read_stdin()? {
        return Ok(lease);
    }
    Ok(LeaseInput {
        lease_term: args.term.ok_or("--term is required (or provide --input)")?,
        base_payment: args
            .payment
            .ok_or("--payment is required (or provide --input)")?,
        annual_discount_rate: args
            .discount_rate
            .ok_or("--discount-rate is required (or provide --input)")?,
        annual_escalation_rate: args.escalation.unwrap_or(Decimal::ZERO),
        start_date: args.start.ok_or("--start is required (or provide --input)")?,
        payment_timing: args.timing.parse()?,
        lease_type: args
            .lease_type
            .as_deref()
            .ok_or("--lease-type is required (or provide --input)")?
            .parse()?,
        rou_clamp: args.rou_clamp.parse()?,
    })
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lease_input = resolve_lease_input(&args.lease)?;
    let start = Instant::now();
    let schedule = amortization::measure_lease(&lease_input)?;
    let elapsed = start.elapsed().as_micros() as u64;

    if let Some(ref path) = args.write_csv {
        let file = File::create(path).map_err(|e| format!("Failed to create '{path}': {e}"))?;
        records::write_schedule_csv(&schedule.rows, file)?;
        info!(path = %path, rows = schedule.rows.len(), "wrote schedule csv");
    }

    let warnings = schedule.warnings.clone();
    let output = with_metadata(SCHEDULE_METHODOLOGY, &lease_input, warnings, elapsed, schedule);
    Ok(serde_json::to_value(output)?)
}

pub fn run_journal(args: JournalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lease_input = resolve_lease_input(&args.lease)?;
    let start = Instant::now();
    let schedule = amortization::measure_lease(&lease_input)?;
    let lines = journal::compute_journal(&schedule.rows, lease_input.lease_type);
    let totals = journal::journal_totals(&lines);
    let elapsed = start.elapsed().as_micros() as u64;

    let mut warnings = schedule.warnings;
    let unbalanced = journal::unbalanced_periods(&lines);
    if !unbalanced.is_empty() {
        warnings.push(format!("Journal out of balance in periods {unbalanced:?}"));
    }

    if let Some(ref path) = args.write_csv {
        let file = File::create(path).map_err(|e| format!("Failed to create '{path}': {e}"))?;
        records::write_journal_csv(&lines, file)?;
        info!(path = %path, lines = lines.len(), "wrote journal csv");
    }

    let output = with_metadata(
        JOURNAL_METHODOLOGY,
        &lease_input,
        warnings,
        elapsed,
        JournalOutput {
            lease_type: lease_input.lease_type,
            lines,
            totals,
        },
    );
    Ok(serde_json::to_value(output)?)
}
