use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::checked;
use crate::types::*;
use crate::EmprendeResult;

const OPTIMISTIC_FACTOR: Decimal = dec!(1.3);
const PESSIMISTIC_FACTOR: Decimal = dec!(0.7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Realistic,
    Optimistic,
    Pessimistic,
    Goal,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Realistic => write!(f, "Realistic"),
            ScenarioKind::Optimistic => write!(f, "Optimistic (+30%)"),
            ScenarioKind::Pessimistic => write!(f, "Pessimistic (-30%)"),
            ScenarioKind::Goal => write!(f, "Goal"),
        }
    }
}

/// Monthly P&L at a given sales volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub name: String,
    pub units: Units,
    pub revenue: Money,
    pub variable_costs: Money,
    pub total_costs: Money,
    pub profit: Money,
    pub net_profit: Money,
    pub is_profitable: bool,
}

/// Cost structure shared by every scenario of one analysis.
#[derive(Debug, Clone, Copy)]
pub struct CostStructure {
    pub price_per_unit: Money,
    pub variable_cost_per_unit: Money,
    pub fixed_costs_monthly: Money,
    pub monthly_loan_payment: Money,
}

impl CostStructure {
    /// Profit before the loan payment, at the given price and volume.
    pub fn profit_at(&self, price: Money, units: Units) -> EmprendeResult<Money> {
        let margin = checked("price_per_unit", price.checked_sub(self.variable_cost_per_unit))?;
        let gross = checked("price_per_unit", units.checked_mul(margin))?;
        checked("fixed_costs_monthly", gross.checked_sub(self.fixed_costs_monthly))
    }

    pub fn scenario(
        &self,
        kind: ScenarioKind,
        name: impl Into<String>,
        units: Units,
    ) -> EmprendeResult<Scenario> {
        let revenue = checked("price_per_unit", units.checked_mul(self.price_per_unit))?;
        let variable_costs = checked(
            "variable_cost_per_unit",
            units.checked_mul(self.variable_cost_per_unit),
        )?;
        let total_costs = checked(
            "fixed_costs_monthly",
            variable_costs.checked_add(self.fixed_costs_monthly),
        )?;
        let profit = revenue - total_costs;
        let net_profit = checked(
            "monthly_loan_payment",
            profit.checked_sub(self.monthly_loan_payment),
        )?;
        Ok(Scenario {
            kind,
            name: name.into(),
            units,
            revenue,
            variable_costs,
            total_costs,
            profit,
            net_profit,
            is_profitable: net_profit >= Decimal::ZERO,
        })
    }
}

/// Units needed to earn `desired_profit` on top of fixed costs, or the
/// expected volume when no goal is set or the margin is not positive.
pub fn goal_units(
    costs: &CostStructure,
    contribution_margin: Money,
    desired_profit: Money,
    expected_units: Units,
) -> EmprendeResult<Units> {
    if desired_profit > Decimal::ZERO && contribution_margin > Decimal::ZERO {
        let needed = checked(
            "desired_monthly_profit",
            costs.fixed_costs_monthly.checked_add(desired_profit),
        )?;
        let units = checked(
            "desired_monthly_profit",
            needed.checked_div(contribution_margin),
        )?;
        Ok(units.ceil())
    } else {
        Ok(expected_units)
    }
}

/// Realistic, optimistic, pessimistic and goal scenarios, in that order.
pub fn build_scenarios(
    costs: &CostStructure,
    contribution_margin: Money,
    expected_units: Units,
    desired_profit: Money,
) -> EmprendeResult<Vec<Scenario>> {
    let optimistic = round_units(checked(
        "expected_units_per_month",
        expected_units.checked_mul(OPTIMISTIC_FACTOR),
    )?);
    let pessimistic = round_units(expected_units * PESSIMISTIC_FACTOR).max(Decimal::ZERO);
    let goal = goal_units(costs, contribution_margin, desired_profit, expected_units)?;

    Ok(vec![
        costs.scenario(ScenarioKind::Realistic, ScenarioKind::Realistic.to_string(), expected_units)?,
        costs.scenario(ScenarioKind::Optimistic, ScenarioKind::Optimistic.to_string(), optimistic)?,
        costs.scenario(ScenarioKind::Pessimistic, ScenarioKind::Pessimistic.to_string(), pessimistic)?,
        costs.scenario(
            ScenarioKind::Goal,
            format!("Goal (earn {} per month)", desired_profit.normalize()),
            goal,
        )?,
    ])
}
