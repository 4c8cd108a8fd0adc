use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_in_range, ensure_non_negative, Constraint, EmprendeError};
use crate::types::*;
use crate::EmprendeResult;

/// Largest price or variable cost per unit accepted on a sale. A day's
/// amounts then stay far inside `Decimal` range for any `u32` volume.
pub const MAX_UNIT_AMOUNT: Money = dec!(1_000_000_000_000);

fn default_working_days() -> u32 {
    30
}

/// Units sold on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySale {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub units_sold: u32,
    pub price_per_unit: Money,
    pub variable_cost_per_unit: Money,
}

impl DailySale {
    pub fn units(&self) -> Units {
        Decimal::from(self.units_sold)
    }

    pub fn revenue(&self) -> Money {
        self.units() * self.price_per_unit
    }

    pub fn variable_costs(&self) -> Money {
        self.units() * self.variable_cost_per_unit
    }

    pub fn gross_profit(&self) -> Money {
        self.revenue() - self.variable_costs()
    }

    pub fn validate(&self) -> EmprendeResult<()> {
        ensure_non_negative("price_per_unit", self.price_per_unit)?;
        ensure_non_negative("variable_cost_per_unit", self.variable_cost_per_unit)?;
        ensure_in_range("price_per_unit", self.price_per_unit, Decimal::ZERO, MAX_UNIT_AMOUNT)?;
        ensure_in_range(
            "variable_cost_per_unit",
            self.variable_cost_per_unit,
            Decimal::ZERO,
            MAX_UNIT_AMOUNT,
        )?;
        Ok(())
    }
}

/// A day's sale as recorded, with price and cost optional when the month
/// has defaults for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySaleEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub product_name: Option<String>,
    pub units_sold: u32,
    #[serde(default)]
    pub price_per_unit: Option<Money>,
    #[serde(default)]
    pub variable_cost_per_unit: Option<Money>,
}

impl DailySaleEntry {
    /// Fill missing price/cost from the month's defaults.
    pub fn resolve(&self, params: &MonthlyParameters) -> EmprendeResult<DailySale> {
        let price = self
            .price_per_unit
            .or(params.default_price_per_unit)
            .ok_or_else(|| EmprendeError::invalid("price_per_unit", Constraint::Missing))?;
        let cost = self
            .variable_cost_per_unit
            .or(params.default_variable_cost_per_unit)
            .ok_or_else(|| {
                EmprendeError::invalid("variable_cost_per_unit", Constraint::Missing)
            })?;

        let sale = DailySale {
            date: self.date,
            product_name: self.product_name.clone(),
            units_sold: self.units_sold,
            price_per_unit: price,
            variable_cost_per_unit: cost,
        };
        sale.validate()?;
        Ok(sale)
    }
}

/// Targets and costs for one month of sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyParameters {
    pub target_monthly_sales: u32,
    #[serde(default)]
    pub fixed_costs_monthly: Money,
    #[serde(default)]
    pub loan_monthly_payment: Money,
    #[serde(default = "default_working_days")]
    pub working_days_per_month: u32,
    #[serde(default)]
    pub default_price_per_unit: Option<Money>,
    #[serde(default)]
    pub default_variable_cost_per_unit: Option<Money>,
    /// Projected month-end net profit below this flags the month at risk
    #[serde(default)]
    pub profit_floor: Money,
}

impl Default for MonthlyParameters {
    fn default() -> Self {
        MonthlyParameters {
            target_monthly_sales: 0,
            fixed_costs_monthly: Decimal::ZERO,
            loan_monthly_payment: Decimal::ZERO,
            working_days_per_month: default_working_days(),
            default_price_per_unit: None,
            default_variable_cost_per_unit: None,
            profit_floor: Decimal::ZERO,
        }
    }
}

impl MonthlyParameters {
    pub fn validate(&self) -> EmprendeResult<()> {
        if self.working_days_per_month == 0 {
            return Err(EmprendeError::invalid(
                "working_days_per_month",
                Constraint::NotPositive,
            ));
        }
        ensure_non_negative("fixed_costs_monthly", self.fixed_costs_monthly)?;
        ensure_non_negative("loan_monthly_payment", self.loan_monthly_payment)?;
        if let Some(price) = self.default_price_per_unit {
            ensure_non_negative("default_price_per_unit", price)?;
        }
        if let Some(cost) = self.default_variable_cost_per_unit {
            ensure_non_negative("default_variable_cost_per_unit", cost)?;
        }
        Ok(())
    }

    pub fn daily_target_units(&self) -> Units {
        if self.working_days_per_month == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.target_monthly_sales) / Decimal::from(self.working_days_per_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_derived_amounts() {
        let sale = DailySale {
            date: day(1),
            product_name: Some("Polera".into()),
            units_sold: 12,
            price_per_unit: dec!(35),
            variable_cost_per_unit: dec!(18),
        };
        assert_eq!(sale.revenue(), dec!(420));
        assert_eq!(sale.variable_costs(), dec!(216));
        assert_eq!(sale.gross_profit(), dec!(204));
    }

    #[test]
    fn test_entry_uses_defaults() {
        let params = MonthlyParameters {
            default_price_per_unit: Some(dec!(35)),
            default_variable_cost_per_unit: Some(dec!(18)),
            ..MonthlyParameters::default()
        };
        let entry = DailySaleEntry {
            date: day(2),
            product_name: None,
            units_sold: 3,
            price_per_unit: Some(dec!(40)),
            variable_cost_per_unit: None,
        };
        let sale = entry.resolve(&params).unwrap();
        assert_eq!(sale.price_per_unit, dec!(40));
        assert_eq!(sale.variable_cost_per_unit, dec!(18));
    }

    #[test]
    fn test_entry_without_price_or_default() {
        let entry = DailySaleEntry {
            date: day(2),
            product_name: None,
            units_sold: 3,
            price_per_unit: None,
            variable_cost_per_unit: Some(dec!(18)),
        };
        let err = entry.resolve(&MonthlyParameters::default()).unwrap_err();
        assert_eq!(err.constraint(), Some(&Constraint::Missing));
    }

    #[test]
    fn test_daily_target() {
        let params = MonthlyParameters {
            target_monthly_sales: 300,
            ..MonthlyParameters::default()
        };
        assert_eq!(params.daily_target_units(), dec!(10));
    }

    #[test]
    fn test_zero_working_days_rejected() {
        let params = MonthlyParameters {
            working_days_per_month: 0,
            ..MonthlyParameters::default()
        };
        assert!(params.validate().is_err());
    }
}
