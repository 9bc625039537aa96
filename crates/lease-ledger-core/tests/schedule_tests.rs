use chrono::NaiveDate;
use lease_ledger_core::lease::journal::{compute_journal, unbalanced_periods, Account};
use lease_ledger_core::lease::{
    compute_schedule, measure_lease, LeaseInput, LeaseType, PaymentTiming, RouClampPolicy,
};
use lease_ledger_core::LeaseError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn lease(
    term: u32,
    rate: Decimal,
    escalation: Decimal,
    lease_type: LeaseType,
    timing: PaymentTiming,
) -> LeaseInput {
    LeaseInput {
        lease_term: term,
        base_payment: dec!(1000),
        annual_discount_rate: rate,
        annual_escalation_rate: escalation,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        payment_timing: timing,
        lease_type,
        rou_clamp: RouClampPolicy::ReportOnly,
    }
}

// ---------------------------------------------------------------------------
// Worked scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_twelve_month_zero_rate_operating_lease() {
    let input = lease(12, Decimal::ZERO, Decimal::ZERO, LeaseType::Operating, PaymentTiming::Arrears);
    let rows = compute_schedule(&input).unwrap();

    assert_eq!(rows.len(), 12);
    let mut expected_balance = dec!(12000);
    for row in &rows {
        expected_balance -= dec!(1000);
        assert_eq!(row.interest_expense, Decimal::ZERO);
        assert_eq!(row.principal, dec!(1000));
        assert_eq!(row.liability_balance, expected_balance);
        assert_eq!(row.rou_amortization, dec!(1000));
    }
    assert_eq!(rows[11].liability_balance, Decimal::ZERO);
}

#[test]
fn test_twenty_four_month_escalating_payments() {
    let input = lease(24, dec!(0.05), dec!(0.05), LeaseType::Operating, PaymentTiming::Arrears);
    let rows = compute_schedule(&input).unwrap();

    for row in &rows[..12] {
        assert_eq!(row.payment.round_dp(2), dec!(1000.00));
    }
    for row in &rows[12..] {
        assert_eq!(row.payment.round_dp(2), dec!(1050.00));
    }
}

#[test]
fn test_thirty_six_month_finance_lease() {
    let input = lease(36, dec!(0.06), Decimal::ZERO, LeaseType::Finance, PaymentTiming::Arrears);
    let schedule = measure_lease(&input).unwrap();
    let expected = schedule.initial_lease_liability / dec!(36);

    assert!(schedule.rows.iter().all(|r| r.rou_amortization == expected));
    assert!(schedule
        .rows
        .windows(2)
        .all(|w| w[1].interest_expense < w[0].interest_expense));
    assert!(schedule.rows[35].liability_balance.abs() < dec!(0.0001));

    // PV of 36 x 1000 at 0.5% per month
    assert!((schedule.initial_lease_liability - dec!(32871.02)).abs() < dec!(0.01));
}

// ---------------------------------------------------------------------------
// Four timing x type combinations
// ---------------------------------------------------------------------------

#[test]
fn test_every_timing_and_type_combination_journalizes_cleanly() {
    for lease_type in [LeaseType::Operating, LeaseType::Finance] {
        for timing in [PaymentTiming::Arrears, PaymentTiming::Advance] {
            let input = lease(30, dec!(0.08), dec!(0.03), lease_type, timing);
            let rows = compute_schedule(&input).unwrap();
            assert_eq!(rows.len(), 30, "{lease_type} / {timing}");
            assert!(rows.iter().all(|r| r.rou_balance >= Decimal::ZERO));

            let journal = compute_journal(&rows, lease_type);
            assert!(
                unbalanced_periods(&journal).is_empty(),
                "{lease_type} / {timing} journal out of balance"
            );
            let has_interest_line = journal.iter().any(|l| l.account == Account::InterestExpense);
            assert_eq!(has_interest_line, lease_type == LeaseType::Finance);
        }
    }
}

#[test]
fn test_advance_measures_higher_than_arrears() {
    let arrears = measure_lease(&lease(24, dec!(0.06), Decimal::ZERO, LeaseType::Operating, PaymentTiming::Arrears)).unwrap();
    let advance = measure_lease(&lease(24, dec!(0.06), Decimal::ZERO, LeaseType::Operating, PaymentTiming::Advance)).unwrap();
    assert!(advance.initial_lease_liability > arrears.initial_lease_liability);
    assert_eq!(advance.rows[0].principal, dec!(1000));
}

#[test]
fn test_operating_lease_total_cost_equals_payments() {
    let schedule = measure_lease(&lease(60, dec!(0.045), dec!(0.025), LeaseType::Operating, PaymentTiming::Arrears)).unwrap();
    let cost: Decimal = schedule
        .rows
        .iter()
        .map(|r| r.interest_expense + r.rou_amortization)
        .sum();
    assert!((cost - schedule.total_payments).abs() < dec!(0.000001));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_zero_term_is_invalid_input() {
    let input = lease(0, dec!(0.05), Decimal::ZERO, LeaseType::Operating, PaymentTiming::Arrears);
    let err = compute_schedule(&input).unwrap_err();
    assert!(matches!(err, LeaseError::InvalidInput { .. }));
    assert!(err.to_string().contains("lease_term"));
}

#[test]
fn test_negative_discount_rate_is_invalid_input() {
    let input = lease(12, dec!(-0.01), Decimal::ZERO, LeaseType::Operating, PaymentTiming::Arrears);
    assert!(matches!(
        compute_schedule(&input),
        Err(LeaseError::InvalidInput { .. })
    ));
}

#[test]
fn test_unrecognized_classification_strings() {
    assert!(matches!(
        "Capital".parse::<LeaseType>(),
        Err(LeaseError::InvalidInput { .. })
    ));
    assert!(matches!(
        "quarterly".parse::<PaymentTiming>(),
        Err(LeaseError::InvalidInput { .. })
    ));
}

#[test]
fn test_schedule_is_deterministic() {
    let input = lease(48, dec!(0.0675), dec!(0.04), LeaseType::Finance, PaymentTiming::Advance);
    assert_eq!(compute_schedule(&input).unwrap(), compute_schedule(&input).unwrap());
}
