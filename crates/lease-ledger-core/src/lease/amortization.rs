//! ASC 842 lease measurement and month-by-month amortization.
//!
//! Measures the lease liability and right-of-use (ROU) asset at
//! commencement as the present value of the escalating payment stream, then
//! folds forward one period at a time using the effective interest method.
//! Operating leases amortize the ROU asset as the plug that keeps total
//! periodic cost flat and draw the carried balance down by it. Finance leases
//! record straight-line amortization while the carried ROU balance stays at
//! its initial measurement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::lease::payments::{build_payment_schedule, checked_total, present_value};
use crate::lease::terms::{period_date, LeaseInput, LeaseType, RouClampPolicy};
use crate::types::Money;
use crate::LeaseResult;

const RUNOFF_TOLERANCE: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single period of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Period number (1-indexed)
    pub period: u32,
    pub date: NaiveDate,
    pub payment: Money,
    pub interest_expense: Money,
    pub principal: Money,
    /// Lease liability at end of period
    pub liability_balance: Money,
    pub rou_amortization: Money,
    /// ROU asset at end of period, floored at zero
    pub rou_balance: Money,
}

/// Full measurement of one lease: the schedule plus its headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseSchedule {
    pub lease_type: LeaseType,
    pub initial_lease_liability: Money,
    pub initial_rou_asset: Money,
    /// Undiscounted total of all lease payments
    pub total_payments: Money,
    pub total_interest_expense: Money,
    pub total_rou_amortization: Money,
    /// Single lease cost recognised each period (operating leases only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub straight_line_expense: Option<Money>,
    pub rows: Vec<ScheduleRow>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// ROU amortization strategy
// ---------------------------------------------------------------------------

/// Per-period ROU amortization rule, fixed at commencement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouAmortizer {
    /// Operating: amortization = straight-line cost - interest.
    ExpensePlug { straight_line_expense: Money },
    /// Finance: initial ROU asset spread evenly over the term.
    StraightLine { per_period: Money },
}

impl RouAmortizer {
    pub fn amortization(&self, interest_expense: Money) -> Money {
        match *self {
            RouAmortizer::ExpensePlug {
                straight_line_expense,
            } => straight_line_expense - interest_expense,
            RouAmortizer::StraightLine { per_period } => per_period,
        }
    }

    /// Record one period against the running ROU balance, returning the
    /// amortization recorded and the balance carried forward. Only the
    /// operating plug draws the balance down.
    pub fn step(&self, policy: RouClampPolicy, rou_balance: Money, interest_expense: Money) -> (Money, Money) {
        let planned = self.amortization(interest_expense);
        match self {
            RouAmortizer::ExpensePlug { .. } => policy.apply(rou_balance, planned),
            RouAmortizer::StraightLine { .. } => (planned, rou_balance),
        }
    }
}

impl LeaseType {
    /// Choose the amortization rule for this classification.
    pub fn rou_amortizer(self, initial_rou: Money, total_payments: Money, lease_term: u32) -> RouAmortizer {
        let periods = Decimal::from(lease_term.max(1));
        match self {
            LeaseType::Operating => RouAmortizer::ExpensePlug {
                straight_line_expense: total_payments / periods,
            },
            LeaseType::Finance => RouAmortizer::StraightLine {
                per_period: initial_rou / periods,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the amortization schedule for a lease. Returns exactly
/// `lease_term` rows, or an error; never a partial schedule.
pub fn compute_schedule(input: &LeaseInput) -> LeaseResult<Vec<ScheduleRow>> {
    Ok(measure_lease(input)?.rows)
}

/// Measure a lease at commencement and build its full schedule.
pub fn measure_lease(input: &LeaseInput) -> LeaseResult<LeaseSchedule> {
    input.validate()?;

    let monthly_rate = input.monthly_rate();
    let payments = build_payment_schedule(
        input.base_payment,
        input.lease_term,
        input.annual_escalation_rate,
    )?;
    let total_payments = checked_total(payments.iter().copied(), "base_payment")?;

    let initial_liability = present_value(&payments, monthly_rate, input.payment_timing)?;
    // No initial direct costs, incentives or prepaid rent.
    let initial_rou = initial_liability;

    debug!(
        lease_term = input.lease_term,
        lease_type = %input.lease_type,
        payment_timing = %input.payment_timing,
        initial_liability = %initial_liability,
        "measured lease at commencement"
    );

    let amortizer = input
        .lease_type
        .rou_amortizer(initial_rou, total_payments, input.lease_term);

    let mut warnings = Vec::new();
    let mut rows = Vec::with_capacity(payments.len());
    let mut liability = initial_liability;
    let mut rou = initial_rou;
    let mut first_negative_rou: Option<u32> = None;

    for (i, &payment) in payments.iter().enumerate() {
        let period = (i + 1) as u32;
        let split = input
            .payment_timing
            .split_payment(payment, liability, monthly_rate);
        liability -= split.principal;

        let (rou_amortization, next_rou) = amortizer.step(input.rou_clamp, rou, split.interest);
        rou = next_rou;
        if rou < -RUNOFF_TOLERANCE && first_negative_rou.is_none() {
            first_negative_rou = Some(period);
        }

        trace!(period, interest = %split.interest, liability = %liability, rou = %rou);

        rows.push(ScheduleRow {
            period,
            date: period_date(input.start_date, period)?,
            payment,
            interest_expense: split.interest,
            principal: split.principal,
            liability_balance: liability,
            rou_amortization,
            rou_balance: rou.max(Decimal::ZERO),
        });
    }

    if let Some(period) = first_negative_rou {
        warnings.push(format!(
            "ROU asset accumulator fell below zero in period {period}; reported balances are floored at 0"
        ));
    }
    if liability.abs() > RUNOFF_TOLERANCE {
        warnings.push(format!(
            "Lease liability does not run off to zero (ending balance {})",
            liability.round_dp(2)
        ));
    }
    for w in &warnings {
        debug!(warning = %w);
    }

    let total_interest_expense = checked_total(rows.iter().map(|r| r.interest_expense), "base_payment")?;
    let total_rou_amortization = checked_total(rows.iter().map(|r| r.rou_amortization), "base_payment")?;
    let straight_line_expense = match amortizer {
        RouAmortizer::ExpensePlug {
            straight_line_expense,
        } => Some(straight_line_expense),
        RouAmortizer::StraightLine { .. } => None,
    };

    Ok(LeaseSchedule {
        lease_type: input.lease_type,
        initial_lease_liability: initial_liability,
        initial_rou_asset: initial_rou,
        total_payments,
        total_interest_expense,
        total_rou_amortization,
        straight_line_expense,
        rows,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
