use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::{checked, Constraint, EmprendeError};
use crate::types::{Money, Percent, Rate};
use crate::EmprendeResult;

/// Monthly periodic rate from an annual percentage: `annual / 100 / 12`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// `(1 + rate)^nper`. Overflow is blamed on the rate, the only input that
/// can push the power out of range for a bounded term.
pub fn compound_factor(rate: Rate, nper: u32) -> EmprendeResult<Decimal> {
    let base = checked("rate", Decimal::ONE.checked_add(rate))?;
    checked("rate", base.checked_powu(u64::from(nper)))
}

/// Level payment that repays `principal` over `nper` periods.
///
/// Zero rate falls back to straight division.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> EmprendeResult<Money> {
    if nper == 0 {
        return Err(EmprendeError::invalid("nper", Constraint::NotPositive));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    // rate * factor / (factor - 1) stays near `rate`; scale the principal last
    let per_unit = checked("rate", rate.checked_mul(factor))?;
    let per_unit = checked("rate", per_unit.checked_div(denominator))?;
    checked("principal", principal.checked_mul(per_unit))
}
