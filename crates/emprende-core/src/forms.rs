//! Raw form submissions.
//!
//! A UI hands over whatever the user typed. These types turn that text into
//! the typed calculator inputs, failing with `InvalidInput` instead of
//! silently coercing bad values to zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Constraint, EmprendeError};
use crate::EmprendeResult;

/// Parse a required number. Accepts a comma as the decimal separator.
pub fn parse_decimal(field: &str, raw: &str) -> EmprendeResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmprendeError::invalid(field, Constraint::Missing));
    }
    let normalized = trimmed.replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| {
        EmprendeError::invalid(
            field,
            Constraint::Unparseable {
                raw: trimmed.to_string(),
            },
        )
    })
}

/// Parse an optional number; blank means `default`.
pub fn parse_decimal_or(field: &str, raw: &str, default: Decimal) -> EmprendeResult<Decimal> {
    if raw.trim().is_empty() {
        return Ok(default);
    }
    parse_decimal(field, raw)
}

/// Parse a whole, non-negative count.
pub fn parse_count(field: &str, raw: &str) -> EmprendeResult<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmprendeError::invalid(field, Constraint::Missing));
    }
    trimmed.parse::<u32>().map_err(|_| {
        EmprendeError::invalid(
            field,
            Constraint::Unparseable {
                raw: trimmed.to_string(),
            },
        )
    })
}

#[cfg(feature = "credit")]
pub use loan::LoanForm;

#[cfg(feature = "credit")]
mod loan {
    use super::*;
    use crate::credit::amortization::{LoanInput, ScheduleType};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct LoanForm {
        pub principal: String,
        pub term_months: String,
        pub annual_rate_percent: String,
        #[serde(default)]
        pub schedule_type: String,
    }

    impl TryFrom<&LoanForm> for LoanInput {
        type Error = EmprendeError;

        fn try_from(form: &LoanForm) -> Result<Self, Self::Error> {
            let schedule_type = if form.schedule_type.trim().is_empty() {
                ScheduleType::default()
            } else {
                form.schedule_type.parse()?
            };
            Ok(LoanInput {
                principal: parse_decimal("principal", &form.principal)?,
                term_months: parse_count("term_months", &form.term_months)?,
                annual_rate_percent: parse_decimal(
                    "annual_rate_percent",
                    &form.annual_rate_percent,
                )?,
                schedule_type,
            })
        }
    }
}

#[cfg(feature = "viability")]
pub use viability::ViabilityForm;

#[cfg(feature = "viability")]
mod viability {
    use super::*;
    use crate::viability::analysis::ViabilityInput;

    /// Viability form. Blank fields count as zero, a blank ROI period as
    /// 12 months.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ViabilityForm {
        pub fixed_costs_monthly: String,
        pub variable_cost_per_unit: String,
        pub price_per_unit: String,
        pub expected_units_per_month: String,
        pub initial_investment: String,
        pub roi_period_months: String,
        pub desired_monthly_profit: String,
        pub price_sensitivity_delta: String,
        pub cost_sensitivity_delta: String,
        pub monthly_loan_payment: String,
    }

    impl TryFrom<&ViabilityForm> for ViabilityInput {
        type Error = EmprendeError;

        fn try_from(form: &ViabilityForm) -> Result<Self, Self::Error> {
            let zero = Decimal::ZERO;
            let roi_period_months = if form.roi_period_months.trim().is_empty() {
                12
            } else {
                parse_count("roi_period_months", &form.roi_period_months)?
            };
            Ok(ViabilityInput {
                fixed_costs_monthly: parse_decimal_or(
                    "fixed_costs_monthly",
                    &form.fixed_costs_monthly,
                    zero,
                )?,
                variable_cost_per_unit: parse_decimal_or(
                    "variable_cost_per_unit",
                    &form.variable_cost_per_unit,
                    zero,
                )?,
                price_per_unit: parse_decimal_or("price_per_unit", &form.price_per_unit, zero)?,
                expected_units_per_month: parse_decimal_or(
                    "expected_units_per_month",
                    &form.expected_units_per_month,
                    zero,
                )?,
                initial_investment: parse_decimal_or(
                    "initial_investment",
                    &form.initial_investment,
                    zero,
                )?,
                roi_period_months,
                desired_monthly_profit: parse_decimal_or(
                    "desired_monthly_profit",
                    &form.desired_monthly_profit,
                    zero,
                )?,
                price_sensitivity_delta: parse_decimal_or(
                    "price_sensitivity_delta",
                    &form.price_sensitivity_delta,
                    zero,
                )?,
                cost_sensitivity_delta: parse_decimal_or(
                    "cost_sensitivity_delta",
                    &form.cost_sensitivity_delta,
                    zero,
                )?,
                monthly_loan_payment: parse_decimal_or(
                    "monthly_loan_payment",
                    &form.monthly_loan_payment,
                    zero,
                )?,
            })
        }
    }
}

#[cfg(feature = "sales")]
pub use sales::DailySaleForm;

#[cfg(feature = "sales")]
mod sales {
    use chrono::NaiveDate;

    use super::*;
    use crate::sales::daily::DailySaleEntry;

    /// One day's sale as typed; blank price/cost fall back to the month's
    /// defaults when the entry is resolved.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct DailySaleForm {
        pub date: String,
        pub product_name: String,
        pub units_sold: String,
        pub price_per_unit: String,
        pub variable_cost_per_unit: String,
    }

    fn optional(field: &str, raw: &str) -> EmprendeResult<Option<Decimal>> {
        if raw.trim().is_empty() {
            Ok(None)
        } else {
            parse_decimal(field, raw).map(Some)
        }
    }

    impl TryFrom<&DailySaleForm> for DailySaleEntry {
        type Error = EmprendeError;

        fn try_from(form: &DailySaleForm) -> Result<Self, Self::Error> {
            let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d").map_err(|_| {
                EmprendeError::invalid(
                    "date",
                    Constraint::Unparseable {
                        raw: form.date.clone(),
                    },
                )
            })?;
            let product = form.product_name.trim();
            Ok(DailySaleEntry {
                date,
                product_name: (!product.is_empty()).then(|| product.to_string()),
                units_sold: parse_count("units_sold", &form.units_sold)?,
                price_per_unit: optional("price_per_unit", &form.price_per_unit)?,
                variable_cost_per_unit: optional(
                    "variable_cost_per_unit",
                    &form.variable_cost_per_unit,
                )?,
            })
        }
    }
}
