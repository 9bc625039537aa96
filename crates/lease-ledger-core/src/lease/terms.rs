//! Lease terms as supplied by the caller, plus the two orthogonal
//! classifications (payment timing and lease type) that select behaviour
//! throughout measurement and journalizing.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseError;
use crate::types::{Money, Rate};
use crate::LeaseResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// When in each period the payment is made.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum PaymentTiming {
    /// End of period (ordinary annuity)
    #[default]
    Arrears,
    /// Start of period (annuity due)
    Advance,
}

/// ASC 842 lessee classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum LeaseType {
    Operating,
    Finance,
}

/// How the running ROU asset balance is floored at zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum RouClampPolicy {
    /// Only the reported balance is floored; the accumulator may go negative
    /// and recover in later periods.
    #[default]
    ReportOnly,
    /// The accumulator itself is floored every period and the recorded
    /// amortization is limited to what was actually removed.
    EveryPeriod,
}

/// Interest and principal portions of one period's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSplit {
    pub interest: Money,
    pub principal: Money,
}

impl PaymentTiming {
    /// Split a payment against the liability outstanding at the start of the
    /// period.
    pub fn split_payment(self, payment: Money, opening_balance: Money, monthly_rate: Rate) -> PaymentSplit {
        match self {
            PaymentTiming::Arrears => {
                let interest = opening_balance * monthly_rate;
                PaymentSplit {
                    interest,
                    principal: payment - interest,
                }
            }
            // Payment lands first; interest accrues on what remains.
            PaymentTiming::Advance => PaymentSplit {
                interest: (opening_balance - payment) * monthly_rate,
                principal: payment,
            },
        }
    }
}

impl RouClampPolicy {
    /// Apply one period's planned amortization to the running ROU balance.
    /// Returns the amortization actually recorded and the new balance.
    pub fn apply(self, rou_balance: Money, planned: Money) -> (Money, Money) {
        match self {
            RouClampPolicy::ReportOnly => (planned, rou_balance - planned),
            RouClampPolicy::EveryPeriod => {
                let next = rou_balance - planned;
                if next < Decimal::ZERO {
                    (rou_balance, Decimal::ZERO)
                } else {
                    (planned, next)
                }
            }
        }
    }
}

impl fmt::Display for PaymentTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTiming::Arrears => write!(f, "Arrears"),
            PaymentTiming::Advance => write!(f, "Advance"),
        }
    }
}

impl fmt::Display for LeaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseType::Operating => write!(f, "Operating"),
            LeaseType::Finance => write!(f, "Finance"),
        }
    }
}

impl FromStr for PaymentTiming {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrears" | "end" => Ok(PaymentTiming::Arrears),
            "advance" | "begin" => Ok(PaymentTiming::Advance),
            other => Err(LeaseError::invalid(
                "payment_timing",
                format!("unrecognized payment timing '{other}' (expected Arrears or Advance)"),
            )),
        }
    }
}

impl FromStr for LeaseType {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operating" => Ok(LeaseType::Operating),
            "finance" => Ok(LeaseType::Finance),
            other => Err(LeaseError::invalid(
                "lease_type",
                format!("unrecognized lease type '{other}' (expected Operating or Finance)"),
            )),
        }
    }
}

impl FromStr for RouClampPolicy {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "reportonly" => Ok(RouClampPolicy::ReportOnly),
            "everyperiod" => Ok(RouClampPolicy::EveryPeriod),
            other => Err(LeaseError::invalid(
                "rou_clamp",
                format!("unrecognized ROU clamp policy '{other}'"),
            )),
        }
    }
}

// Text in input files goes through the same parsing as the CLI flags.

impl TryFrom<String> for PaymentTiming {
    type Error = LeaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for LeaseType {
    type Error = LeaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for RouClampPolicy {
    type Error = LeaseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Terms of a single lease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseInput {
    /// Lease term in months
    pub lease_term: u32,
    /// Monthly payment in the first lease year
    pub base_payment: Money,
    /// Annual discount rate (e.g. 0.06 = 6%), converted to monthly as rate / 12
    pub annual_discount_rate: Rate,
    /// Annual payment escalation, compounded once per 12-month block
    #[serde(default)]
    pub annual_escalation_rate: Rate,
    /// Commencement date; period p is dated start + (p - 1) months
    pub start_date: NaiveDate,
    #[serde(default)]
    pub payment_timing: PaymentTiming,
    pub lease_type: LeaseType,
    #[serde(default)]
    pub rou_clamp: RouClampPolicy,
}

impl LeaseInput {
    pub fn validate(&self) -> LeaseResult<()> {
        if self.lease_term == 0 {
            return Err(LeaseError::invalid(
                "lease_term",
                "Lease term must be greater than zero",
            ));
        }
        if self.base_payment < Decimal::ZERO {
            return Err(LeaseError::invalid(
                "base_payment",
                "Base payment cannot be negative",
            ));
        }
        if self.annual_discount_rate < Decimal::ZERO {
            return Err(LeaseError::invalid(
                "annual_discount_rate",
                "Discount rate cannot be negative",
            ));
        }
        if self.annual_escalation_rate <= dec!(-1) {
            return Err(LeaseError::invalid(
                "annual_escalation_rate",
                "Escalation must be greater than -100%",
            ));
        }
        // The last period must still be a representable date.
        period_date(self.start_date, self.lease_term)?;
        Ok(())
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_discount_rate / MONTHS_PER_YEAR
    }
}

/// Calendar date of a 1-indexed period. Month ends clamp the way a calendar
/// month offset does (Jan 31 + 1 month = Feb 28/29).
pub fn period_date(start_date: NaiveDate, period: u32) -> LeaseResult<NaiveDate> {
    start_date
        .checked_add_months(Months::new(period.saturating_sub(1)))
        .ok_or_else(|| {
            LeaseError::DateError(format!(
                "period {period} from {start_date} is outside the supported calendar"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> LeaseInput {
        LeaseInput {
            lease_term: 36,
            base_payment: dec!(1000),
            annual_discount_rate: dec!(0.06),
            annual_escalation_rate: Decimal::ZERO,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            payment_timing: PaymentTiming::Arrears,
            lease_type: LeaseType::Operating,
            rou_clamp: RouClampPolicy::ReportOnly,
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut input = sample_input();
        input.lease_term = 0;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, LeaseError::InvalidInput { ref field, .. } if field == "lease_term"));
    }

    #[test]
    fn test_negative_payment_rejected() {
        let mut input = sample_input();
        input.base_payment = dec!(-1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_escalation_floor() {
        let mut input = sample_input();
        input.annual_escalation_rate = dec!(-1);
        assert!(input.validate().is_err());
        input.annual_escalation_rate = dec!(-0.10);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_monthly_rate_is_simple_twelfth() {
        assert_eq!(sample_input().monthly_rate(), dec!(0.005));
    }

    #[test]
    fn test_arrears_split_accrues_before_payment() {
        let split = PaymentTiming::Arrears.split_payment(dec!(1000), dec!(10000), dec!(0.01));
        assert_eq!(split.interest, dec!(100));
        assert_eq!(split.principal, dec!(900));
    }

    #[test]
    fn test_advance_split_accrues_after_payment() {
        let split = PaymentTiming::Advance.split_payment(dec!(1000), dec!(10000), dec!(0.01));
        assert_eq!(split.principal, dec!(1000));
        assert_eq!(split.interest, dec!(90));
    }

    #[test]
    fn test_parse_timing_aliases() {
        assert_eq!("end".parse::<PaymentTiming>().unwrap(), PaymentTiming::Arrears);
        assert_eq!("Begin".parse::<PaymentTiming>().unwrap(), PaymentTiming::Advance);
        assert_eq!("ADVANCE".parse::<PaymentTiming>().unwrap(), PaymentTiming::Advance);
        assert!("midway".parse::<PaymentTiming>().is_err());
    }

    #[test]
    fn test_parse_lease_type_rejects_unknown() {
        assert_eq!("finance".parse::<LeaseType>().unwrap(), LeaseType::Finance);
        let err = "capital".parse::<LeaseType>().unwrap_err();
        assert!(err.to_string().contains("capital"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_lease_type() {
        let json = r#"{
            "lease_term": 12,
            "base_payment": "1000",
            "annual_discount_rate": "0.05",
            "start_date": "2024-01-01",
            "lease_type": "Capital"
        }"#;
        assert!(serde_json::from_str::<LeaseInput>(json).is_err());
    }

    #[test]
    fn test_deserialize_defaults_and_aliases() {
        let json = r#"{
            "lease_term": 12,
            "base_payment": "1000",
            "annual_discount_rate": "0.05",
            "start_date": "2024-01-01",
            "payment_timing": "begin",
            "lease_type": "Finance"
        }"#;
        let input: LeaseInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.payment_timing, PaymentTiming::Advance);
        assert_eq!(input.annual_escalation_rate, Decimal::ZERO);
        assert_eq!(input.rou_clamp, RouClampPolicy::ReportOnly);
    }

    #[test]
    fn test_deserialize_accepts_what_parse_accepts() {
        assert_eq!(
            serde_json::from_str::<LeaseType>("\"FINANCE\"").unwrap(),
            LeaseType::Finance
        );
        assert_eq!(
            serde_json::from_str::<PaymentTiming>("\"End\"").unwrap(),
            PaymentTiming::Arrears
        );
        assert_eq!(
            serde_json::from_str::<RouClampPolicy>("\"every-period\"").unwrap(),
            RouClampPolicy::EveryPeriod
        );
        // Serialized names read back unchanged.
        let text = serde_json::to_string(&RouClampPolicy::EveryPeriod).unwrap();
        assert_eq!(serde_json::from_str::<RouClampPolicy>(&text).unwrap(), RouClampPolicy::EveryPeriod);
    }

    #[test]
    fn test_deserialize_unknown_value_reports_invalid_input() {
        let err = serde_json::from_str::<LeaseType>("\"rental\"").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid input: lease_type"), "{message}");
        assert!(message.contains("rental"), "{message}");
    }

    #[test]
    fn test_period_date_clamps_month_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(period_date(start, 1).unwrap(), start);
        assert_eq!(
            period_date(start, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            period_date(start, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_clamp_policies() {
        assert_eq!(
            RouClampPolicy::ReportOnly.apply(dec!(10), dec!(15)),
            (dec!(15), dec!(-5))
        );
        assert_eq!(
            RouClampPolicy::EveryPeriod.apply(dec!(10), dec!(15)),
            (dec!(10), dec!(0))
        );
        // Negative amortization accretes from the floor.
        assert_eq!(
            RouClampPolicy::EveryPeriod.apply(dec!(0), dec!(-3)),
            (dec!(-3), dec!(3))
        );
    }
}
