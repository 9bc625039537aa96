use std::collections::BTreeMap;

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use lease_ledger_core::lease::{amortization, journal, LeaseInput, LeaseType, ScheduleRow};
use lease_ledger_core::portfolio::{aggregate_portfolio, DateRange, GroupMode};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct JournalRequest {
    schedule: Vec<ScheduleRow>,
    lease_type: LeaseType,
}

#[derive(Deserialize)]
struct PortfolioRequest {
    schedules: BTreeMap<String, Vec<ScheduleRow>>,
    #[serde(default)]
    window: Option<DateRange>,
    #[serde(default)]
    group_by: GroupMode,
}

// ---------------------------------------------------------------------------
// Lease schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let input: LeaseInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::measure_lease(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_journal(request_json: String) -> NapiResult<String> {
    let request: JournalRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let lines = journal::compute_journal(&request.schedule, request.lease_type);
    serde_json::to_string(&lines).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi(js_name = "aggregatePortfolio")]
pub fn aggregate_portfolio_report(request_json: String) -> NapiResult<String> {
    let request: PortfolioRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let rows = aggregate_portfolio(&request.schedules, request.window, request.group_by)
        .map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}
