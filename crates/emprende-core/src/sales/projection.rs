use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{checked, ensure_in_range, Constraint, EmprendeError};
use crate::sales::calendar::MonthKey;
use crate::sales::daily::{DailySale, MonthlyParameters};
use crate::types::*;
use crate::EmprendeResult;

pub const MAX_DAY_OF_MONTH: u32 = 31;

/// Projected volume below this share of target raises the volume alarm.
const TARGET_RISK_RATIO: Decimal = dec!(0.8);

/// Cumulative sales against the cumulative target for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub day: u32,
    pub units: Units,
    pub cumulative_units: Units,
    pub cumulative_target: Units,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub days_with_sales: u32,

    pub total_units: Units,
    pub total_revenue: Money,
    pub total_variable_costs: Money,
    pub accumulated_gross_profit: Money,
    /// Gross profit less the month's fixed costs (charged once)
    pub accumulated_net_profit: Money,
    pub accumulated_net_profit_after_loan: Money,
    pub profit_margin_accumulated_percent: Percent,

    pub daily_target_units: Units,
    pub avg_units_per_day: Units,
    pub is_on_target: bool,

    pub projected_units_month_end: Units,
    pub projected_revenue_month_end: Money,
    pub projected_gross_profit_month_end: Money,
    /// After fixed costs and the loan payment
    pub projected_net_profit_month_end: Money,

    pub units_to_target: Units,
    pub units_needed_daily: Units,

    /// Projected net profit falls below the profit floor
    pub is_at_risk: bool,
    /// Projected volume falls below 80% of the monthly target
    pub is_target_at_risk: bool,

    pub daily_progress: Vec<DailyProgress>,
}

impl ProjectionResult {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.days_with_sales == 0 {
            warnings.push("No sales recorded yet this month".into());
        }
        if !self.is_on_target {
            warnings.push(format!(
                "Selling {} units/day against a daily target of {}",
                round_money(self.avg_units_per_day, 2),
                round_money(self.daily_target_units, 2)
            ));
        }
        if self.is_at_risk {
            warnings.push(format!(
                "Projected month-end net profit is {}",
                round_money(self.projected_net_profit_month_end, 2)
            ));
        }
        warnings
    }

    /// Presentation copy with every amount rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> ProjectionResult {
        let r = |v: Decimal| round_money(v, dp);
        ProjectionResult {
            total_units: r(self.total_units),
            total_revenue: r(self.total_revenue),
            total_variable_costs: r(self.total_variable_costs),
            accumulated_gross_profit: r(self.accumulated_gross_profit),
            accumulated_net_profit: r(self.accumulated_net_profit),
            accumulated_net_profit_after_loan: r(self.accumulated_net_profit_after_loan),
            profit_margin_accumulated_percent: r(self.profit_margin_accumulated_percent),
            daily_target_units: r(self.daily_target_units),
            avg_units_per_day: r(self.avg_units_per_day),
            projected_units_month_end: r(self.projected_units_month_end),
            projected_revenue_month_end: r(self.projected_revenue_month_end),
            projected_gross_profit_month_end: r(self.projected_gross_profit_month_end),
            projected_net_profit_month_end: r(self.projected_net_profit_month_end),
            units_to_target: r(self.units_to_target),
            units_needed_daily: r(self.units_needed_daily),
            daily_progress: self
                .daily_progress
                .iter()
                .map(|p| DailyProgress {
                    day: p.day,
                    units: r(p.units),
                    cumulative_units: r(p.cumulative_units),
                    cumulative_target: r(p.cumulative_target),
                })
                .collect(),
            ..self.clone()
        }
    }
}

fn per_unit(total: Money, units: Units) -> Money {
    if units > Decimal::ZERO {
        total / units
    } else {
        Decimal::ZERO
    }
}

fn daily_progress(sales: &[DailySale], daily_target: Units, days_elapsed: u32) -> Vec<DailyProgress> {
    let mut by_day: BTreeMap<u32, Units> = BTreeMap::new();
    for sale in sales {
        *by_day.entry(sale.date.day()).or_default() += sale.units();
    }

    let mut cumulative = Decimal::ZERO;
    (1..=days_elapsed)
        .map(|day| {
            let units = by_day.get(&day).copied().unwrap_or_default();
            cumulative += units;
            DailyProgress {
                day,
                units,
                cumulative_units: cumulative,
                cumulative_target: daily_target * Decimal::from(day),
            }
        })
        .collect()
}

/// Checked sum of one amount over every sale.
fn sum_sales(sales: &[DailySale], field: &str, amount: fn(&DailySale) -> Money) -> EmprendeResult<Money> {
    sales.iter().try_fold(Decimal::ZERO, |acc, sale| {
        checked(field, acc.checked_add(amount(sale)))
    })
}

/// Every sale must fall in one calendar month, on or before `as_of_day`.
fn ensure_within_window(sales: &[DailySale], as_of_day: u32) -> EmprendeResult<()> {
    let Some(first) = sales.first() else {
        return Ok(());
    };
    let month = MonthKey::of(first.date);
    for sale in sales {
        if !month.contains(sale.date) || sale.date.day() > as_of_day {
            return Err(EmprendeError::invalid(
                "date",
                Constraint::OutsidePeriod {
                    period: format!("{month} up to day {as_of_day}"),
                },
            ));
        }
    }
    Ok(())
}

/// Month-to-date performance and month-end projection from daily sales.
///
/// `as_of_day` is the number of days of the month that have elapsed. All
/// sales must belong to one month and be dated on or before that day; use
/// [`project_month`] to filter a longer record first.
pub fn project(
    sales: &[DailySale],
    params: &MonthlyParameters,
    as_of_day: u32,
) -> EmprendeResult<ProjectionResult> {
    params.validate()?;
    ensure_in_range(
        "as_of_day",
        Decimal::from(as_of_day),
        Decimal::ZERO,
        Decimal::from(MAX_DAY_OF_MONTH),
    )?;
    for sale in sales {
        sale.validate()?;
    }
    ensure_within_window(sales, as_of_day)?;

    let working_days = Decimal::from(params.working_days_per_month);
    let target = Decimal::from(params.target_monthly_sales);

    let total_units = sum_sales(sales, "units_sold", DailySale::units)?;
    let total_revenue = sum_sales(sales, "price_per_unit", DailySale::revenue)?;
    let total_variable_costs = sum_sales(sales, "variable_cost_per_unit", DailySale::variable_costs)?;
    let accumulated_gross_profit = total_revenue - total_variable_costs;
    let days_with_sales = sales.iter().map(|s| s.date).collect::<BTreeSet<_>>().len() as u32;

    let accumulated_net_profit = checked(
        "fixed_costs_monthly",
        accumulated_gross_profit.checked_sub(params.fixed_costs_monthly),
    )?;
    let accumulated_net_profit_after_loan = checked(
        "loan_monthly_payment",
        accumulated_net_profit.checked_sub(params.loan_monthly_payment),
    )?;
    let profit_margin_accumulated_percent = if total_revenue > Decimal::ZERO {
        let ratio = checked("price_per_unit", accumulated_net_profit.checked_div(total_revenue))?;
        checked("price_per_unit", ratio.checked_mul(dec!(100)))?
    } else {
        Decimal::ZERO
    };

    let daily_target_units = params.daily_target_units();
    let avg_units_per_day = total_units / Decimal::from(as_of_day.max(1));
    let is_on_target = avg_units_per_day >= daily_target_units;

    let projected_units_month_end = checked(
        "working_days_per_month",
        avg_units_per_day.checked_mul(working_days),
    )?;
    let projected_revenue_month_end = checked(
        "working_days_per_month",
        per_unit(total_revenue, total_units).checked_mul(projected_units_month_end),
    )?;
    let projected_gross_profit_month_end = checked(
        "working_days_per_month",
        per_unit(accumulated_gross_profit, total_units).checked_mul(projected_units_month_end),
    )?;
    let projected_net_profit_month_end = checked(
        "fixed_costs_monthly",
        projected_gross_profit_month_end
            .checked_sub(params.fixed_costs_monthly)
            .and_then(|v| v.checked_sub(params.loan_monthly_payment)),
    )?;

    let units_to_target = (target - total_units).max(Decimal::ZERO);
    let days_remaining = params.working_days_per_month.saturating_sub(as_of_day);
    let units_needed_daily = units_to_target / Decimal::from(days_remaining.max(1));

    let is_at_risk = projected_net_profit_month_end < params.profit_floor;
    let is_target_at_risk = projected_units_month_end < target * TARGET_RISK_RATIO;

    tracing::debug!(
        sales = sales.len(),
        as_of_day,
        avg_units_per_day = %avg_units_per_day,
        projected_net = %projected_net_profit_month_end,
        "sales projection computed"
    );

    Ok(ProjectionResult {
        days_elapsed: as_of_day,
        days_remaining,
        days_with_sales,
        total_units,
        total_revenue,
        total_variable_costs,
        accumulated_gross_profit,
        accumulated_net_profit,
        accumulated_net_profit_after_loan,
        profit_margin_accumulated_percent,
        daily_target_units,
        avg_units_per_day,
        is_on_target,
        projected_units_month_end,
        projected_revenue_month_end,
        projected_gross_profit_month_end,
        projected_net_profit_month_end,
        units_to_target,
        units_needed_daily,
        is_at_risk,
        is_target_at_risk,
        daily_progress: daily_progress(sales, daily_target_units, as_of_day),
    })
}

/// Project one calendar month: keep only that month's sales up to `today`
/// and derive the elapsed days from it.
pub fn project_month(
    sales: &[DailySale],
    params: &MonthlyParameters,
    month: MonthKey,
    today: NaiveDate,
) -> EmprendeResult<ProjectionResult> {
    let as_of_day = month.days_elapsed(today);
    let in_window: Vec<DailySale> = sales
        .iter()
        .filter(|s| month.contains(s.date) && s.date.day() <= as_of_day)
        .cloned()
        .collect();
    if in_window.len() < sales.len() {
        tracing::debug!(
            dropped = sales.len() - in_window.len(),
            %month,
            as_of_day,
            "ignoring sales outside the month to date"
        );
    }
    project(&in_window, params, as_of_day)
}

const METHODOLOGY: &str = "Month-to-date run-rate projection";

fn assumptions(params: &MonthlyParameters, period: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "period": period,
        "working_days_per_month": params.working_days_per_month,
        "fixed_costs_charged": "once per month",
        "profit_floor": params.profit_floor.to_string(),
    })
}

/// [`project_month`] wrapped in the standard output envelope.
pub fn sales_report(
    sales: &[DailySale],
    params: &MonthlyParameters,
    month: MonthKey,
    today: NaiveDate,
) -> EmprendeResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    let result = project_month(sales, params, month, today)?;
    let warnings = result.warnings();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &assumptions(params, serde_json::json!({ "month": month.to_string() })),
        warnings,
        elapsed,
        result,
    ))
}

/// [`project`] wrapped in the standard output envelope, for callers that
/// already hold one month's sales up to `as_of_day`.
pub fn project_as_of(
    sales: &[DailySale],
    params: &MonthlyParameters,
    as_of_day: u32,
) -> EmprendeResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    let result = project(sales, params, as_of_day)?;
    let warnings = result.warnings();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        &assumptions(params, serde_json::json!({ "as_of_day": as_of_day })),
        warnings,
        elapsed,
        result,
    ))
}
