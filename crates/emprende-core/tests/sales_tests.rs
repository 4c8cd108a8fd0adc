use chrono::NaiveDate;
use emprende_core::sales::calendar::MonthKey;
use emprende_core::sales::daily::{DailySale, DailySaleEntry, MonthlyParameters, MAX_UNIT_AMOUNT};
use emprende_core::Constraint;
use emprende_core::sales::projection;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn sale(month: u32, day: u32, units: u32) -> DailySale {
    DailySale {
        date: date(month, day),
        product_name: Some("camiseta".into()),
        units_sold: units,
        price_per_unit: dec!(35),
        variable_cost_per_unit: dec!(18),
    }
}

fn march_parameters() -> MonthlyParameters {
    MonthlyParameters {
        target_monthly_sales: 300,
        fixed_costs_monthly: dec!(1000),
        working_days_per_month: 30,
        ..MonthlyParameters::default()
    }
}

fn first_ten_days() -> Vec<DailySale> {
    (1..=10).map(|d| sale(3, d, 5)).collect()
}

// ===========================================================================
// Month-to-date progress
// ===========================================================================

#[test]
fn test_behind_target_after_ten_days() {
    let r = projection::project(&first_ten_days(), &march_parameters(), 10).unwrap();

    assert_eq!(r.daily_target_units, dec!(10));
    assert_eq!(r.avg_units_per_day, dec!(5));
    assert!(!r.is_on_target);

    assert_eq!(r.total_units, dec!(50));
    assert_eq!(r.days_with_sales, 10);
    assert_eq!(r.days_remaining, 20);
    assert_eq!(r.units_to_target, dec!(250));
    assert_eq!(r.units_needed_daily, dec!(12.5));
}

#[test]
fn test_accumulated_profit() {
    let r = projection::project(&first_ten_days(), &march_parameters(), 10).unwrap();

    // 50 units * (35 - 18) = 850 gross, less the month's 1000 fixed
    assert_eq!(r.total_revenue, dec!(1750));
    assert_eq!(r.accumulated_gross_profit, dec!(850));
    assert_eq!(r.accumulated_net_profit, dec!(-150));
}

#[test]
fn test_month_end_projection() {
    let r = projection::project(&first_ten_days(), &march_parameters(), 10).unwrap();

    // 5 units/day over 30 days
    assert_eq!(r.projected_units_month_end, dec!(150));
    assert_eq!(r.projected_revenue_month_end, dec!(5250));
    assert_eq!(r.projected_gross_profit_month_end, dec!(2550));
    assert_eq!(r.projected_net_profit_month_end, dec!(1550));
    assert!(!r.is_at_risk);
    // 150 < 80% of 300
    assert!(r.is_target_at_risk);
}

#[test]
fn test_on_target_month() {
    let sales: Vec<DailySale> = (1..=10).map(|d| sale(3, d, 12)).collect();
    let r = projection::project(&sales, &march_parameters(), 10).unwrap();

    assert!(r.is_on_target);
    assert!(!r.is_target_at_risk);
    assert_eq!(r.projected_units_month_end, dec!(360));
}

#[test]
fn test_no_sales_yet() {
    let r = projection::project(&[], &march_parameters(), 0).unwrap();

    assert_eq!(r.total_units, Decimal::ZERO);
    assert_eq!(r.avg_units_per_day, Decimal::ZERO);
    assert_eq!(r.projected_net_profit_month_end, dec!(-1000));
    assert!(r.is_at_risk);
    assert_eq!(r.units_to_target, dec!(300));
}

#[test]
fn test_progress_tracks_cumulative_target() {
    let r = projection::project(&first_ten_days(), &march_parameters(), 10).unwrap();

    let last = r.daily_progress.last().unwrap();
    assert_eq!(last.day, 10);
    assert_eq!(last.cumulative_units, dec!(50));
    assert_eq!(last.cumulative_target, dec!(100));
}

#[test]
fn test_as_of_envelope_is_timed_in_core() {
    let output = projection::project_as_of(&first_ten_days(), &march_parameters(), 10).unwrap();

    assert_eq!(output.result.total_units, dec!(50));
    assert_eq!(output.assumptions["period"]["as_of_day"], 10);
    assert_eq!(output.methodology, "Month-to-date run-rate projection");
    assert!(!output.warnings.is_empty());
}

#[test]
fn test_rejects_sales_after_the_cutoff_day() {
    let mut sales = first_ten_days();
    sales.push(sale(3, 20, 40));

    let err = projection::project(&sales, &march_parameters(), 10).unwrap_err();
    assert_eq!(
        err.constraint(),
        Some(&Constraint::OutsidePeriod {
            period: "2024-03 up to day 10".into()
        })
    );
}

#[test]
fn test_rejects_sales_from_another_month() {
    let mut sales = first_ten_days();
    sales.push(sale(4, 2, 40));
    assert!(projection::project(&sales, &march_parameters(), 10).is_err());
}

#[test]
fn test_progress_ends_at_total_units() {
    let sales = vec![sale(3, 1, 4), sale(3, 3, 6), sale(3, 3, 2), sale(3, 7, 1)];
    let r = projection::project(&sales, &march_parameters(), 7).unwrap();
    assert_eq!(r.daily_progress.last().unwrap().cumulative_units, r.total_units);
}

#[test]
fn test_report_ignores_sales_after_today() {
    let mut sales = first_ten_days();
    sales.push(sale(3, 25, 40));

    let month = MonthKey::new(2024, 3).unwrap();
    let r = projection::project_month(&sales, &march_parameters(), month, date(3, 10)).unwrap();
    assert_eq!(r.total_units, dec!(50));
}

#[test]
fn test_huge_amounts_are_rejected_not_computed() {
    let sales = vec![DailySale {
        price_per_unit: dec!(1_000_000_000_000_000),
        ..sale(3, 1, u32::MAX)
    }];
    let err = projection::project(&sales, &march_parameters(), 1).unwrap_err();
    assert!(matches!(err.constraint(), Some(Constraint::OutOfRange { .. })));

    let params = MonthlyParameters {
        working_days_per_month: u32::MAX,
        ..march_parameters()
    };
    let sales = vec![DailySale {
        price_per_unit: MAX_UNIT_AMOUNT,
        ..sale(3, 1, u32::MAX)
    }];
    let err = projection::project(&sales, &params, 1).unwrap_err();
    assert_eq!(err.constraint(), Some(&Constraint::Overflow));
}

#[test]
fn test_rejects_day_beyond_month() {
    assert!(projection::project(&first_ten_days(), &march_parameters(), 32).is_err());

    let params = MonthlyParameters {
        working_days_per_month: 0,
        ..march_parameters()
    };
    assert!(projection::project(&first_ten_days(), &params, 10).is_err());
}

// ===========================================================================
// Calendar months and recorded entries
// ===========================================================================

#[test]
fn test_sales_report_keeps_only_the_month() {
    let mut sales = first_ten_days();
    sales.push(sale(2, 28, 100));
    sales.push(sale(4, 1, 100));

    let month: MonthKey = "2024-03".parse().unwrap();
    let output = projection::sales_report(&sales, &march_parameters(), month, date(3, 10)).unwrap();

    assert_eq!(output.result.total_units, dec!(50));
    assert_eq!(output.result.days_elapsed, 10);
    assert_eq!(output.assumptions["period"]["month"], "2024-03");
}

#[test]
fn test_past_month_counts_every_day() {
    let month = MonthKey::new(2024, 2).unwrap();
    let r = projection::project_month(&[], &march_parameters(), month, date(3, 15)).unwrap();
    // 2024 is a leap year
    assert_eq!(r.days_elapsed, 29);
}

#[test]
fn test_entries_fall_back_to_month_defaults() {
    let params = MonthlyParameters {
        default_price_per_unit: Some(dec!(35)),
        default_variable_cost_per_unit: Some(dec!(18)),
        ..march_parameters()
    };
    let entry = DailySaleEntry {
        date: date(3, 4),
        product_name: None,
        units_sold: 3,
        price_per_unit: Some(dec!(40)),
        variable_cost_per_unit: None,
    };

    let sale = entry.resolve(&params).unwrap();
    assert_eq!(sale.price_per_unit, dec!(40));
    assert_eq!(sale.variable_cost_per_unit, dec!(18));
    assert_eq!(sale.gross_profit(), dec!(66));

    // no defaults and no price recorded
    assert!(entry.resolve(&march_parameters()).is_err());
}
