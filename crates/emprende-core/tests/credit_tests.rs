use emprende_core::credit::amortization::{self, LoanInput, ScheduleType};
use emprende_core::error::MAX_PRINCIPAL;
use emprende_core::{Constraint, EmprendeError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn loan(principal: Decimal, term_months: u32, rate: Decimal) -> LoanInput {
    LoanInput {
        principal,
        term_months,
        annual_rate_percent: rate,
        schedule_type: ScheduleType::Fixed,
    }
}

// ===========================================================================
// Fixed (annuity) schedules
// ===========================================================================

#[test]
fn test_microcredit_ten_thousand_over_a_year() {
    let result = amortization::compute_schedule(&loan(dec!(10000), 12, dec!(12))).unwrap();

    assert!((result.monthly_payment - dec!(888.49)).abs() < dec!(0.01));
    assert!((result.total_interest - dec!(661.91)).abs() < dec!(0.1));
    assert_eq!(result.schedule.len(), 12);
    assert_eq!(result.total_to_pay, dec!(10000) + result.total_interest);

    // first month: interest 1% of 10000
    assert_eq!(result.schedule[0].interest_portion, dec!(100));
}

#[test]
fn test_zero_rate_splits_principal_evenly() {
    let result = amortization::compute_schedule(&loan(dec!(1200), 12, Decimal::ZERO)).unwrap();

    assert_eq!(result.monthly_payment, dec!(100));
    assert_eq!(result.total_interest, Decimal::ZERO);
    assert!(result.schedule.iter().all(|e| e.interest_portion == Decimal::ZERO));
}

#[test]
fn test_fixed_schedule_repays_principal_exactly() {
    let result = amortization::compute_schedule(&loan(dec!(25000), 36, dec!(18.5))).unwrap();

    let repaid: Decimal = result.schedule.iter().map(|e| e.principal_portion).sum();
    assert!((repaid - dec!(25000)).abs() < dec!(0.000000001));
    assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);

    // every payment retires some principal
    for pair in result.schedule.windows(2) {
        assert!(pair[1].remaining_balance < pair[0].remaining_balance);
    }
    assert!(result.schedule[0].remaining_balance < dec!(25000));
}

#[test]
fn test_schedule_rows_add_up() {
    let result = amortization::compute_schedule(&loan(dec!(5000), 6, dec!(24))).unwrap();
    for entry in &result.schedule {
        assert_eq!(entry.payment, entry.principal_portion + entry.interest_portion);
    }
    let months: Vec<u32> = result.schedule.iter().map(|e| e.month).collect();
    assert_eq!(months, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_same_input_same_schedule() {
    let input = loan(dec!(7500), 18, dec!(15));
    let first = amortization::compute_schedule(&input).unwrap();
    let second = amortization::compute_schedule(&input).unwrap();
    assert_eq!(first, second);
}

// ===========================================================================
// Constant amortization schedules
// ===========================================================================

#[test]
fn test_constant_amortization_payments_decline() {
    let input = LoanInput {
        schedule_type: ScheduleType::ConstantAmortization,
        ..loan(dec!(12000), 12, dec!(12))
    };
    let result = amortization::compute_schedule(&input).unwrap();

    assert!(result
        .schedule
        .iter()
        .all(|e| e.principal_portion == dec!(1000)));
    // 1000 + 1% of 12000
    assert_eq!(result.monthly_payment, dec!(1120));
    assert_eq!(result.final_payment, dec!(1010));
    for pair in result.schedule.windows(2) {
        assert!(pair[1].payment < pair[0].payment);
    }
}

#[test]
fn test_constant_amortization_costs_less_interest() {
    let fixed = amortization::compute_schedule(&loan(dec!(12000), 24, dec!(20))).unwrap();
    let constant = amortization::compute_schedule(&LoanInput {
        schedule_type: ScheduleType::ConstantAmortization,
        ..loan(dec!(12000), 24, dec!(20))
    })
    .unwrap();
    assert!(constant.total_interest < fixed.total_interest);
}

// ===========================================================================
// Validation and envelope
// ===========================================================================

#[test]
fn test_rejects_non_positive_principal() {
    let err = amortization::compute_schedule(&loan(Decimal::ZERO, 12, dec!(12))).unwrap_err();
    match err {
        EmprendeError::InvalidInput { field, constraint } => {
            assert_eq!(field, "principal");
            assert_eq!(constraint, Constraint::NotPositive);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rejects_bad_term_and_rate() {
    assert!(amortization::compute_schedule(&loan(dec!(1000), 0, dec!(12))).is_err());
    assert!(amortization::compute_schedule(&loan(dec!(1000), 361, dec!(12))).is_err());
    assert!(amortization::compute_schedule(&loan(dec!(1000), 12, dec!(-1))).is_err());
}

#[test]
fn test_principal_above_ceiling_is_rejected() {
    let err = amortization::compute_schedule(&loan(dec!(1_000_000_000_000_000_000_000), 360, dec!(100)))
        .unwrap_err();
    assert_eq!(
        err.constraint(),
        Some(&Constraint::OutOfRange {
            min: Decimal::ZERO,
            max: MAX_PRINCIPAL,
        })
    );
}

#[test]
fn test_largest_loan_at_highest_rate_completes() {
    let result = amortization::compute_schedule(&loan(MAX_PRINCIPAL, 360, dec!(100))).unwrap();

    assert_eq!(result.schedule.len(), 360);
    assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    assert!(result.total_interest > MAX_PRINCIPAL);

    let constant = amortization::compute_schedule(&LoanInput {
        schedule_type: ScheduleType::ConstantAmortization,
        ..loan(MAX_PRINCIPAL, 360, dec!(100))
    })
    .unwrap();
    assert_eq!(constant.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_simulate_loan_rounded_for_display() {
    let output = amortization::simulate_loan(&loan(dec!(10000), 12, dec!(12))).unwrap();
    let shown = output.result.rounded(2);

    assert_eq!(shown.monthly_payment, dec!(888.49));
    assert_eq!(shown.schedule[0].interest_portion, dec!(100.00));
    assert!(!output.methodology.is_empty());
}
