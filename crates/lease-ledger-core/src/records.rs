//! Delimited-text form of schedules and journals, as stored or downloaded by
//! callers. One column per field; decimals are written at full precision so
//! that reading a file back reproduces the computed values exactly.

use std::io;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LeaseError;
use crate::lease::amortization::ScheduleRow;
use crate::lease::journal::{Account, JournalLine};
use crate::types::Money;
use crate::LeaseResult;

#[derive(Debug, Serialize, Deserialize)]
struct ScheduleRecord {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Payment", with = "rust_decimal::serde::str")]
    payment: Money,
    #[serde(rename = "Interest_Expense", with = "rust_decimal::serde::str")]
    interest_expense: Money,
    #[serde(rename = "Principal", with = "rust_decimal::serde::str")]
    principal: Money,
    #[serde(rename = "Lease_Liability_Balance", with = "rust_decimal::serde::str")]
    liability_balance: Money,
    #[serde(rename = "ROU_Asset_Amortization", with = "rust_decimal::serde::str")]
    rou_amortization: Money,
    #[serde(rename = "ROU_Asset_Balance", with = "rust_decimal::serde::str")]
    rou_balance: Money,
}

#[derive(Debug, Serialize, Deserialize)]
struct JournalRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Account")]
    account: Account,
    #[serde(rename = "Debit", with = "rust_decimal::serde::str")]
    debit: Money,
    #[serde(rename = "Credit", with = "rust_decimal::serde::str")]
    credit: Money,
}

impl From<&ScheduleRow> for ScheduleRecord {
    fn from(row: &ScheduleRow) -> Self {
        Self {
            period: row.period,
            date: row.date,
            payment: row.payment,
            interest_expense: row.interest_expense,
            principal: row.principal,
            liability_balance: row.liability_balance,
            rou_amortization: row.rou_amortization,
            rou_balance: row.rou_balance,
        }
    }
}

impl From<ScheduleRecord> for ScheduleRow {
    fn from(r: ScheduleRecord) -> Self {
        Self {
            period: r.period,
            date: r.date,
            payment: r.payment,
            interest_expense: r.interest_expense,
            principal: r.principal,
            liability_balance: r.liability_balance,
            rou_amortization: r.rou_amortization,
            rou_balance: r.rou_balance,
        }
    }
}

impl From<&JournalLine> for JournalRecord {
    fn from(line: &JournalLine) -> Self {
        Self {
            date: line.date,
            period: line.period,
            account: line.account,
            debit: line.debit,
            credit: line.credit,
        }
    }
}

impl From<JournalRecord> for JournalLine {
    fn from(r: JournalRecord) -> Self {
        Self {
            date: r.date,
            period: r.period,
            account: r.account,
            debit: r.debit,
            credit: r.credit,
        }
    }
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

pub fn write_schedule_csv<W: io::Write>(rows: &[ScheduleRow], writer: W) -> LeaseResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(ScheduleRecord::from(row))?;
    }
    wtr.flush()
        .map_err(|e| LeaseError::SerializationError(e.to_string()))
}

/// Read a schedule back. Periods must run 1, 2, 3, ... without gaps.
pub fn read_schedule_csv<R: io::Read>(reader: R) -> LeaseResult<Vec<ScheduleRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.deserialize::<ScheduleRecord>() {
        let row = ScheduleRow::from(record?);
        let expected = rows.len() as u32 + 1;
        if row.period != expected {
            return Err(LeaseError::SerializationError(format!(
                "schedule row {expected} has period {}",
                row.period
            )));
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn schedule_to_csv_string(rows: &[ScheduleRow]) -> LeaseResult<String> {
    let mut buf = Vec::new();
    write_schedule_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| LeaseError::SerializationError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Journals
// ---------------------------------------------------------------------------

pub fn write_journal_csv<W: io::Write>(lines: &[JournalLine], writer: W) -> LeaseResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for line in lines {
        wtr.serialize(JournalRecord::from(line))?;
    }
    wtr.flush()
        .map_err(|e| LeaseError::SerializationError(e.to_string()))
}

pub fn read_journal_csv<R: io::Read>(reader: R) -> LeaseResult<Vec<JournalLine>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<JournalRecord>()
        .map(|record| -> LeaseResult<JournalLine> { Ok(JournalLine::from(record?)) })
        .collect()
}

pub fn journal_to_csv_string(lines: &[JournalLine]) -> LeaseResult<String> {
    let mut buf = Vec::new();
    write_journal_csv(lines, &mut buf)?;
    String::from_utf8(buf).map_err(|e| LeaseError::SerializationError(e.to_string()))
}
