//! Nominal payment stream and its present value.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::LeaseError;
use crate::lease::terms::PaymentTiming;
use crate::time_value::npv;
use crate::types::{Money, Rate};
use crate::LeaseResult;

/// Build the monthly payment stream. Month m pays
/// `base * (1 + escalation)^floor((m - 1) / 12)`; escalation steps once per
/// full lease year and is never pro-rated.
pub fn build_payment_schedule(
    base_payment: Money,
    lease_term: u32,
    annual_escalation_rate: Rate,
) -> LeaseResult<Vec<Money>> {
    if lease_term == 0 {
        return Err(LeaseError::invalid(
            "lease_term",
            "Lease term must be greater than zero",
        ));
    }

    let step = Decimal::ONE + annual_escalation_rate;
    let mut payments = Vec::with_capacity(lease_term as usize);
    let mut payment = base_payment;

    for m in 0..lease_term {
        let years_elapsed = m / 12;
        if m % 12 == 0 && years_elapsed > 0 {
            let factor = step.checked_powi(years_elapsed as i64).ok_or_else(|| {
                LeaseError::invalid(
                    "annual_escalation_rate",
                    format!("escalation overflows after {years_elapsed} years"),
                )
            })?;
            payment = base_payment.checked_mul(factor).ok_or_else(|| {
                LeaseError::invalid(
                    "base_payment",
                    format!("escalated payment overflows after {years_elapsed} years"),
                )
            })?;
        }
        payments.push(payment);
    }

    Ok(payments)
}

/// Discount a monthly payment stream to a single present value: exponent `i`
/// for payments in arrears (ordinary annuity), `i - 1` in advance (annuity due).
pub fn present_value(payments: &[Money], monthly_rate: Rate, timing: PaymentTiming) -> LeaseResult<Money> {
    let annuity_due = npv(monthly_rate, payments)?;
    match timing {
        PaymentTiming::Advance => Ok(annuity_due),
        PaymentTiming::Arrears => Ok(annuity_due / (Decimal::ONE + monthly_rate)),
    }
}

/// Sum amounts, failing instead of overflowing.
pub(crate) fn checked_total<I>(amounts: I, field: &str) -> LeaseResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(|| LeaseError::invalid(field, "total overflows the supported amount range"))
}
