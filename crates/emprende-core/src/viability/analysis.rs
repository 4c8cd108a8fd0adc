use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{checked, ensure_non_negative, Constraint, EmprendeError};
use crate::types::*;
use crate::viability::scenarios::{build_scenarios, CostStructure, Scenario, ScenarioKind};
use crate::viability::sensitivity::{analyze_sensitivity, PricePoint, Sensitivity};
use crate::EmprendeResult;

fn default_roi_period() -> u32 {
    12
}

/// Business viability request (monthly figures)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityInput {
    pub fixed_costs_monthly: Money,
    pub variable_cost_per_unit: Money,
    pub price_per_unit: Money,
    pub expected_units_per_month: Units,
    #[serde(default)]
    pub initial_investment: Money,
    #[serde(default = "default_roi_period")]
    pub roi_period_months: u32,
    #[serde(default)]
    pub desired_monthly_profit: Money,
    #[serde(default)]
    pub price_sensitivity_delta: Money,
    #[serde(default)]
    pub cost_sensitivity_delta: Money,
    /// Credit installment paid out of the business each month
    #[serde(default)]
    pub monthly_loan_payment: Money,
}

impl ViabilityInput {
    /// Net the payment of a simulated loan against the business.
    #[cfg(feature = "credit")]
    pub fn with_loan(mut self, loan: &crate::credit::amortization::LoanResult) -> Self {
        self.monthly_loan_payment = loan.monthly_payment;
        self
    }

    fn cost_structure(&self) -> CostStructure {
        CostStructure {
            price_per_unit: self.price_per_unit,
            variable_cost_per_unit: self.variable_cost_per_unit,
            fixed_costs_monthly: self.fixed_costs_monthly,
            monthly_loan_payment: self.monthly_loan_payment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityResult {
    pub contribution_margin: Money,
    /// Fixed costs plus the loan payment
    pub total_fixed_costs: Money,
    pub break_even_units: BreakEven,
    pub break_even_revenue: BreakEven,
    pub monthly_revenue: Money,
    /// Before the loan payment
    pub monthly_profit: Money,
    pub net_monthly_profit: Money,
    pub profit_margin_percent: Percent,
    pub net_profit_margin_percent: Percent,
    /// Net profit accumulated over the ROI period
    pub period_profit: Money,
    pub roi_percent: Percent,
    pub roi_period_months: u32,
    pub scenarios: Vec<Scenario>,
    pub sensitivity: Sensitivity,
}

impl ViabilityResult {
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }

    pub fn warnings(&self, expected_units: Units) -> Vec<String> {
        let mut warnings = Vec::new();
        match self.break_even_units {
            BreakEven::Unreachable => warnings.push(
                "Price does not exceed variable cost: break-even is unreachable".into(),
            ),
            BreakEven::Finite(units) if expected_units < units => warnings.push(format!(
                "Expected volume ({}) is below the break-even volume ({})",
                expected_units.normalize(),
                units.ceil()
            )),
            BreakEven::Finite(_) => {}
        }
        if self.net_monthly_profit < Decimal::ZERO {
            warnings.push("Business runs at a net monthly loss after the loan payment".into());
        }
        warnings
    }

    /// Presentation copy with every amount rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> ViabilityResult {
        let r = |v: Decimal| round_money(v, dp);
        ViabilityResult {
            contribution_margin: r(self.contribution_margin),
            total_fixed_costs: r(self.total_fixed_costs),
            break_even_units: self.break_even_units.rounded(dp),
            break_even_revenue: self.break_even_revenue.rounded(dp),
            monthly_revenue: r(self.monthly_revenue),
            monthly_profit: r(self.monthly_profit),
            net_monthly_profit: r(self.net_monthly_profit),
            profit_margin_percent: r(self.profit_margin_percent),
            net_profit_margin_percent: r(self.net_profit_margin_percent),
            period_profit: r(self.period_profit),
            roi_percent: r(self.roi_percent),
            roi_period_months: self.roi_period_months,
            scenarios: self
                .scenarios
                .iter()
                .map(|s| Scenario {
                    units: r(s.units),
                    revenue: r(s.revenue),
                    variable_costs: r(s.variable_costs),
                    total_costs: r(s.total_costs),
                    profit: r(s.profit),
                    net_profit: r(s.net_profit),
                    ..s.clone()
                })
                .collect(),
            sensitivity: Sensitivity {
                price_down: PricePoint {
                    profit: r(self.sensitivity.price_down.profit),
                    net_profit: r(self.sensitivity.price_down.net_profit),
                    ..self.sensitivity.price_down.clone()
                },
                price_up: PricePoint {
                    profit: r(self.sensitivity.price_up.profit),
                    net_profit: r(self.sensitivity.price_up.net_profit),
                    ..self.sensitivity.price_up.clone()
                },
                break_even_cost_up: self.sensitivity.break_even_cost_up.rounded(dp),
                break_even_cost_down: self.sensitivity.break_even_cost_down.rounded(dp),
            },
        }
    }
}

fn validate(input: &ViabilityInput) -> EmprendeResult<()> {
    ensure_non_negative("fixed_costs_monthly", input.fixed_costs_monthly)?;
    ensure_non_negative("variable_cost_per_unit", input.variable_cost_per_unit)?;
    ensure_non_negative("price_per_unit", input.price_per_unit)?;
    ensure_non_negative("expected_units_per_month", input.expected_units_per_month)?;
    ensure_non_negative("initial_investment", input.initial_investment)?;
    ensure_non_negative("price_sensitivity_delta", input.price_sensitivity_delta)?;
    ensure_non_negative("cost_sensitivity_delta", input.cost_sensitivity_delta)?;
    ensure_non_negative("monthly_loan_payment", input.monthly_loan_payment)?;
    if input.roi_period_months == 0 {
        return Err(EmprendeError::invalid(
            "roi_period_months",
            Constraint::NotPositive,
        ));
    }
    Ok(())
}

fn margin_percent(profit: Money, revenue: Money) -> EmprendeResult<Percent> {
    if revenue <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let ratio = checked("price_per_unit", profit.checked_div(revenue))?;
    checked("price_per_unit", ratio.checked_mul(dec!(100)))
}

/// Break-even, profitability, ROI, scenarios and sensitivities for a
/// monthly cost structure.
///
/// Break-even covers the loan payment; `monthly_profit` does not (the
/// loan is netted in `net_monthly_profit`).
pub fn analyze(input: &ViabilityInput) -> EmprendeResult<ViabilityResult> {
    validate(input)?;

    let costs = input.cost_structure();
    let units = input.expected_units_per_month;
    let price = input.price_per_unit;

    let total_fixed_costs = checked(
        "monthly_loan_payment",
        input.fixed_costs_monthly.checked_add(input.monthly_loan_payment),
    )?;
    let contribution_margin = (price - input.variable_cost_per_unit).max(Decimal::ZERO);
    let break_even_units = BreakEven::from_margin(total_fixed_costs, contribution_margin);
    let break_even_revenue = break_even_units.scale(price);

    let monthly_revenue = checked("price_per_unit", units.checked_mul(price))?;
    let monthly_profit = costs.profit_at(price, units)?;
    let net_monthly_profit = checked(
        "monthly_loan_payment",
        monthly_profit.checked_sub(input.monthly_loan_payment),
    )?;

    let period_profit = checked(
        "roi_period_months",
        net_monthly_profit.checked_mul(Decimal::from(input.roi_period_months)),
    )?;
    let roi_percent = if input.initial_investment > Decimal::ZERO {
        let ratio = checked(
            "initial_investment",
            period_profit.checked_div(input.initial_investment),
        )?;
        checked("initial_investment", ratio.checked_mul(dec!(100)))?
    } else {
        Decimal::ZERO
    };

    tracing::debug!(
        contribution_margin = %contribution_margin,
        break_even = %break_even_units,
        monthly_profit = %monthly_profit,
        "viability computed"
    );

    Ok(ViabilityResult {
        contribution_margin,
        total_fixed_costs,
        break_even_units,
        break_even_revenue,
        monthly_revenue,
        monthly_profit,
        net_monthly_profit,
        profit_margin_percent: margin_percent(monthly_profit, monthly_revenue)?,
        net_profit_margin_percent: margin_percent(net_monthly_profit, monthly_revenue)?,
        period_profit,
        roi_percent,
        roi_period_months: input.roi_period_months,
        scenarios: build_scenarios(
            &costs,
            contribution_margin,
            units,
            input.desired_monthly_profit,
        )?,
        sensitivity: analyze_sensitivity(
            &costs,
            units,
            contribution_margin,
            total_fixed_costs,
            input.price_sensitivity_delta,
            input.cost_sensitivity_delta,
        )?,
    })
}

/// [`analyze`] wrapped in the standard output envelope.
pub fn evaluate_viability(
    input: &ViabilityInput,
) -> EmprendeResult<ComputationOutput<ViabilityResult>> {
    let start = Instant::now();
    let result = analyze(input)?;
    let warnings = result.warnings(input.expected_units_per_month);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Contribution-margin break-even analysis",
        &serde_json::json!({
            "fixed_costs_monthly": input.fixed_costs_monthly.to_string(),
            "monthly_loan_payment": input.monthly_loan_payment.to_string(),
            "break_even_includes_loan": true,
            "monthly_profit_includes_loan": false,
        }),
        warnings,
        elapsed,
        result,
    ))
}
