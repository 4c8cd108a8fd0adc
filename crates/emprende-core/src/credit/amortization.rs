use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_in_range, ensure_positive, Constraint, EmprendeError, MAX_PRINCIPAL};
use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::*;
use crate::EmprendeResult;

pub const MAX_TERM_MONTHS: u32 = 360;

/// How each monthly payment is composed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// Level payment every month (French / annuity schedule)
    #[default]
    Fixed,
    /// Same principal every month, interest on the shrinking balance,
    /// so the payment declines over time
    ConstantAmortization,
}

impl FromStr for ScheduleType {
    type Err = EmprendeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fija" => Ok(ScheduleType::Fixed),
            "constant" | "constant_amortization" | "variable" => {
                Ok(ScheduleType::ConstantAmortization)
            }
            other => Err(EmprendeError::invalid(
                "schedule_type",
                Constraint::Unparseable {
                    raw: other.to_string(),
                },
            )),
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleType::Fixed => write!(f, "fixed"),
            ScheduleType::ConstantAmortization => write!(f, "constant_amortization"),
        }
    }
}

/// Loan simulation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    pub term_months: u32,
    /// Nominal annual rate in percent (12 = 12%)
    pub annual_rate_percent: Percent,
    #[serde(default)]
    pub schedule_type: ScheduleType,
}

/// A single month in the repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    pub month: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub schedule_type: ScheduleType,
    /// Level payment for fixed schedules; first (largest) payment otherwise
    pub monthly_payment: Money,
    pub final_payment: Money,
    pub total_interest: Money,
    pub total_to_pay: Money,
    pub schedule: Vec<PaymentScheduleEntry>,
}

impl LoanResult {
    /// Presentation copy with every amount rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> LoanResult {
        LoanResult {
            schedule_type: self.schedule_type,
            monthly_payment: round_money(self.monthly_payment, dp),
            final_payment: round_money(self.final_payment, dp),
            total_interest: round_money(self.total_interest, dp),
            total_to_pay: round_money(self.total_to_pay, dp),
            schedule: self
                .schedule
                .iter()
                .map(|e| PaymentScheduleEntry {
                    month: e.month,
                    payment: round_money(e.payment, dp),
                    principal_portion: round_money(e.principal_portion, dp),
                    interest_portion: round_money(e.interest_portion, dp),
                    remaining_balance: round_money(e.remaining_balance, dp),
                })
                .collect(),
        }
    }

    pub fn principal(&self) -> Money {
        self.total_to_pay - self.total_interest
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.total_interest.is_zero() {
            warnings.push("Zero interest rate: payments only repay principal".into());
        }
        if self.total_interest > self.principal() {
            warnings.push(format!(
                "Total interest ({}) exceeds the amount borrowed",
                round_money(self.total_interest, 2)
            ));
        }
        warnings
    }
}

fn validate(input: &LoanInput) -> EmprendeResult<()> {
    ensure_positive("principal", input.principal)?;
    ensure_in_range("principal", input.principal, Decimal::ZERO, MAX_PRINCIPAL)?;
    ensure_in_range(
        "term_months",
        Decimal::from(input.term_months),
        Decimal::ONE,
        Decimal::from(MAX_TERM_MONTHS),
    )?;
    ensure_in_range(
        "annual_rate_percent",
        input.annual_rate_percent,
        Decimal::ZERO,
        dec!(100),
    )?;
    Ok(())
}

/// Build the month-by-month repayment schedule for a loan.
///
/// No rounding is applied; use [`LoanResult::rounded`] for display.
pub fn compute_schedule(input: &LoanInput) -> EmprendeResult<LoanResult> {
    validate(input)?;

    let rate = monthly_rate(input.annual_rate_percent);
    let n = input.term_months;
    tracing::debug!(
        principal = %input.principal,
        term_months = n,
        monthly_rate = %rate,
        schedule = %input.schedule_type,
        "computing loan schedule"
    );

    let level_payment = match input.schedule_type {
        ScheduleType::Fixed => Some(annuity_payment(input.principal, rate, n)?),
        ScheduleType::ConstantAmortization => None,
    };
    let straight_principal = input.principal / Decimal::from(n);

    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;

    for month in 1..=n {
        let interest = balance * rate;

        // Final month settles whatever drift is left so the loan closes at 0
        let principal_portion = if month == n {
            balance
        } else {
            match level_payment {
                Some(pmt) => (pmt - interest).max(Decimal::ZERO).min(balance),
                None => straight_principal.min(balance),
            }
        };

        balance = (balance - principal_portion).max(Decimal::ZERO);
        total_interest += interest;

        schedule.push(PaymentScheduleEntry {
            month,
            payment: principal_portion + interest,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance,
        });
    }

    let first_payment = schedule.first().map(|e| e.payment).unwrap_or_default();
    let final_payment = schedule.last().map(|e| e.payment).unwrap_or_default();

    let result = LoanResult {
        schedule_type: input.schedule_type,
        monthly_payment: level_payment.unwrap_or(first_payment),
        final_payment,
        total_interest,
        total_to_pay: input.principal + total_interest,
        schedule,
    };

    tracing::debug!(
        monthly_payment = %result.monthly_payment,
        total_interest = %result.total_interest,
        "loan schedule complete"
    );
    Ok(result)
}

/// [`compute_schedule`] wrapped in the standard output envelope.
pub fn simulate_loan(input: &LoanInput) -> EmprendeResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let result = compute_schedule(input)?;
    let warnings = result.warnings();

    let methodology = match input.schedule_type {
        ScheduleType::Fixed => "Fixed-payment annuity amortization",
        ScheduleType::ConstantAmortization => "Constant-principal amortization",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "term_months": input.term_months,
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "monthly_rate": monthly_rate(input.annual_rate_percent).to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}
