use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LeaseError;
use crate::types::{Money, Rate};
use crate::LeaseResult;

/// Net Present Value of a series of cash flows, the first flow undiscounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> LeaseResult<Money> {
    if rate <= dec!(-1) {
        return Err(LeaseError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount
                .checked_mul(one_plus_r)
                .ok_or_else(|| LeaseError::DivisionByZero {
                    context: format!("NPV discount factor overflow at period {t}"),
                })?;
        }
        if discount.is_zero() {
            return Err(LeaseError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npv_first_flow_undiscounted() {
        let cfs = vec![dec!(100), dec!(110)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        assert_eq!(result, dec!(200));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        let result = npv(dec!(0.0), &cfs).unwrap();
        assert_eq!(result, dec!(50));
    }

    #[test]
    fn test_npv_rate_below_minus_one_rejected() {
        let cfs = vec![dec!(-100), dec!(200)];
        assert!(npv(dec!(-1.5), &cfs).is_err());
    }

    #[test]
    fn test_npv_empty_cashflows() {
        let result = npv(dec!(0.10), &[]).unwrap();
        assert_eq!(result, Decimal::ZERO);
    }
}
