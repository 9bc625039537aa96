//! Portfolio rollforward: many lease schedules consolidated by calendar date
//! or by lease-relative period.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LeaseError;
use crate::lease::amortization::ScheduleRow;
use crate::types::Money;
use crate::LeaseResult;

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// How rows from different leases are lined up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupMode {
    /// By calendar date.
    #[default]
    #[serde(alias = "date")]
    ByDate,
    /// By lease-relative period number. Only meaningful when leases share a
    /// start date.
    #[serde(alias = "period")]
    ByPeriod,
}

/// Grouping key of a portfolio row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Date(NaiveDate),
    Period(u32),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Date(d) => write!(f, "{d}"),
            GroupKey::Period(p) => write!(f, "{p}"),
        }
    }
}

impl GroupMode {
    fn key(self, row: &ScheduleRow) -> GroupKey {
        match self {
            GroupMode::ByDate => GroupKey::Date(row.date),
            GroupMode::ByPeriod => GroupKey::Period(row.period),
        }
    }
}

/// One consolidated line. Beginning balances carry the previous line's
/// ending balances; groups holding different leases need not reconcile
/// line by line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub key: GroupKey,
    /// Number of leases with a row in this group
    pub lease_count: u32,
    pub payment: Money,
    pub interest_expense: Money,
    pub principal: Money,
    pub beginning_liability: Money,
    pub ending_liability: Money,
    pub beginning_rou: Money,
    pub rou_amortization: Money,
    pub ending_rou: Money,
}

fn add(total: &mut Money, amount: Money, field: &str) -> LeaseResult<()> {
    *total = total.checked_add(amount).ok_or_else(|| {
        LeaseError::invalid(field, "portfolio total overflows the supported amount range")
    })?;
    Ok(())
}

impl PortfolioRow {
    fn empty(key: GroupKey) -> Self {
        Self {
            key,
            lease_count: 0,
            payment: Decimal::ZERO,
            interest_expense: Decimal::ZERO,
            principal: Decimal::ZERO,
            beginning_liability: Decimal::ZERO,
            ending_liability: Decimal::ZERO,
            beginning_rou: Decimal::ZERO,
            rou_amortization: Decimal::ZERO,
            ending_rou: Decimal::ZERO,
        }
    }

    fn accumulate(&mut self, row: &ScheduleRow) -> LeaseResult<()> {
        self.lease_count += 1;
        add(&mut self.payment, row.payment, "payment")?;
        add(&mut self.interest_expense, row.interest_expense, "interest_expense")?;
        add(&mut self.principal, row.principal, "principal")?;
        add(&mut self.ending_liability, row.liability_balance, "liability_balance")?;
        add(&mut self.rou_amortization, row.rou_amortization, "rou_amortization")?;
        add(&mut self.ending_rou, row.rou_balance, "rou_balance")
    }
}

/// Consolidate lease schedules into a rollforward sorted by group key.
///
/// Each row's beginning balances are the prior row's ending balances. The
/// first row's beginning balances are seeded from rows dated before the
/// window (the last such row of each lease), so a window that starts
/// mid-lease still opens with the balances carried in. An empty mapping or
/// a window excluding every row gives an empty result. Totals that exceed
/// the decimal range are an error.
pub fn aggregate_portfolio(
    schedules: &BTreeMap<String, Vec<ScheduleRow>>,
    window: Option<DateRange>,
    mode: GroupMode,
) -> LeaseResult<Vec<PortfolioRow>> {
    let mut groups: BTreeMap<GroupKey, PortfolioRow> = BTreeMap::new();
    let mut opening_liability = Decimal::ZERO;
    let mut opening_rou = Decimal::ZERO;

    for (name, rows) in schedules {
        let mut carried_in: Option<&ScheduleRow> = None;
        let mut included = 0usize;

        for row in rows {
            if let Some(range) = window {
                if row.date < range.start {
                    carried_in = Some(row);
                }
                if !range.contains(row.date) {
                    continue;
                }
            }
            let key = mode.key(row);
            groups
                .entry(key)
                .or_insert_with(|| PortfolioRow::empty(key))
                .accumulate(row)?;
            included += 1;
        }

        if let Some(row) = carried_in {
            add(&mut opening_liability, row.liability_balance, "liability_balance")?;
            add(&mut opening_rou, row.rou_balance, "rou_balance")?;
        }
        debug!(lease = %name, rows = rows.len(), included, "aggregated lease schedule");
    }

    let mut beginning_liability = opening_liability;
    let mut beginning_rou = opening_rou;
    Ok(groups
        .into_values()
        .map(|mut row| {
            row.beginning_liability = beginning_liability;
            row.beginning_rou = beginning_rou;
            beginning_liability = row.ending_liability;
            beginning_rou = row.ending_rou;
            row
        })
        .collect())
}
