//! Monthly journal entries derived from an amortization schedule.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::lease::amortization::ScheduleRow;
use crate::lease::terms::LeaseType;
use crate::types::Money;

/// Ledger accounts touched by lessee lease accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Account {
    #[serde(rename = "Lease Expense")]
    LeaseExpense,
    #[serde(rename = "Interest Expense")]
    InterestExpense,
    #[serde(rename = "Lease Liability")]
    LeaseLiability,
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "ROU Asset Amortization Expense")]
    RouAmortizationExpense,
    #[serde(rename = "Accumulated Amortization - ROU Asset")]
    AccumulatedRouAmortization,
}

impl Account {
    pub fn name(self) -> &'static str {
        match self {
            Account::LeaseExpense => "Lease Expense",
            Account::InterestExpense => "Interest Expense",
            Account::LeaseLiability => "Lease Liability",
            Account::Cash => "Cash",
            Account::RouAmortizationExpense => "ROU Asset Amortization Expense",
            Account::AccumulatedRouAmortization => "Accumulated Amortization - ROU Asset",
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub date: NaiveDate,
    pub period: u32,
    pub account: Account,
    pub debit: Money,
    pub credit: Money,
}

/// Debit and credit totals for one account across a journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTotal {
    pub account: Account,
    pub debit: Money,
    pub credit: Money,
}

#[derive(Clone, Copy)]
enum Side {
    Debit,
    Credit,
}

/// Round to cents, half away from zero.
pub fn to_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn post(row: &ScheduleRow, account: Account, side: Side, amount: Money) -> JournalLine {
    // A negative amount belongs on the opposite side.
    let (side, amount) = if amount < Decimal::ZERO {
        let flipped = match side {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        };
        (flipped, -amount)
    } else {
        (side, amount)
    };
    let (debit, credit) = match side {
        Side::Debit => (amount, Decimal::ZERO),
        Side::Credit => (Decimal::ZERO, amount),
    };
    JournalLine {
        date: row.date,
        period: row.period,
        account,
        debit,
        credit,
    }
}

/// Journal lines for a single schedule row.
///
/// Amounts are placed in cents. The amortization pair is left out when the
/// amortization rounds to 0.00, not only when it is exactly zero, so no
/// zero-amount lines are posted.
pub fn journal_for_row(row: &ScheduleRow, lease_type: LeaseType) -> Vec<JournalLine> {
    let payment = to_cents(row.payment);
    let mut lines = Vec::with_capacity(5);

    match lease_type {
        LeaseType::Operating => {
            lines.push(post(row, Account::LeaseExpense, Side::Debit, payment));
            lines.push(post(row, Account::Cash, Side::Credit, payment));
        }
        LeaseType::Finance => {
            let interest = to_cents(row.interest_expense);
            // The liability debit is payment less interest, not the row's
            // principal: for payments in advance the row carries the whole
            // payment as principal, so over the term the ledger liability
            // differs from the schedule's run-off by the total interest.
            // It also takes the rounding residue so the entry balances.
            let principal = payment - interest;
            lines.push(post(row, Account::InterestExpense, Side::Debit, interest));
            lines.push(post(row, Account::LeaseLiability, Side::Debit, principal));
            lines.push(post(row, Account::Cash, Side::Credit, payment));
        }
    }

    let amortization = to_cents(row.rou_amortization);
    if !amortization.is_zero() {
        lines.push(post(row, Account::RouAmortizationExpense, Side::Debit, amortization));
        lines.push(post(row, Account::AccumulatedRouAmortization, Side::Credit, amortization));
    }

    lines
}

/// Journal lines for a whole schedule, in period order.
pub fn compute_journal(schedule: &[ScheduleRow], lease_type: LeaseType) -> Vec<JournalLine> {
    schedule
        .iter()
        .flat_map(|row| journal_for_row(row, lease_type))
        .collect()
}

/// Periods whose debits and credits do not agree.
pub fn unbalanced_periods(lines: &[JournalLine]) -> Vec<u32> {
    let mut net: BTreeMap<u32, Money> = BTreeMap::new();
    for line in lines {
        *net.entry(line.period).or_default() += line.debit - line.credit;
    }
    net.into_iter()
        .filter(|(_, diff)| !diff.is_zero())
        .map(|(period, _)| period)
        .collect()
}

/// Trial-balance view: totals per account.
pub fn journal_totals(lines: &[JournalLine]) -> Vec<AccountTotal> {
    let mut totals: BTreeMap<Account, (Money, Money)> = BTreeMap::new();
    for line in lines {
        let entry = totals.entry(line.account).or_default();
        entry.0 += line.debit;
        entry.1 += line.credit;
    }
    totals
        .into_iter()
        .map(|(account, (debit, credit))| AccountTotal {
            account,
            debit,
            credit,
        })
        .collect()
}
