use serde::{Deserialize, Serialize};

use crate::error::checked;
use crate::types::*;
use crate::viability::scenarios::CostStructure;
use crate::EmprendeResult;

/// Profit at a shifted selling price, volume held constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Money,
    pub delta: Money,
    pub profit: Money,
    pub net_profit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub price_down: PricePoint,
    pub price_up: PricePoint,
    /// Break-even units if the variable cost rises by the cost delta
    pub break_even_cost_up: BreakEven,
    /// Break-even units if the variable cost falls by the cost delta
    pub break_even_cost_down: BreakEven,
}

fn price_point(
    costs: &CostStructure,
    units: Units,
    price: Option<Money>,
    delta: Money,
) -> EmprendeResult<PricePoint> {
    let price = checked("price_sensitivity_delta", price)?;
    let profit = costs.profit_at(price, units)?;
    Ok(PricePoint {
        price,
        delta,
        profit,
        net_profit: checked(
            "monthly_loan_payment",
            profit.checked_sub(costs.monthly_loan_payment),
        )?,
    })
}

pub fn analyze_sensitivity(
    costs: &CostStructure,
    units: Units,
    contribution_margin: Money,
    total_fixed_costs: Money,
    price_delta: Money,
    cost_delta: Money,
) -> EmprendeResult<Sensitivity> {
    let price = costs.price_per_unit;
    let margin_down = checked(
        "cost_sensitivity_delta",
        contribution_margin.checked_sub(cost_delta),
    )?;
    let margin_up = checked(
        "cost_sensitivity_delta",
        contribution_margin.checked_add(cost_delta),
    )?;
    Ok(Sensitivity {
        price_down: price_point(costs, units, price.checked_sub(price_delta), price_delta)?,
        price_up: price_point(costs, units, price.checked_add(price_delta), price_delta)?,
        break_even_cost_up: BreakEven::from_margin(total_fixed_costs, margin_down),
        break_even_cost_down: BreakEven::from_margin(total_fixed_costs, margin_up),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn textile() -> CostStructure {
        CostStructure {
            price_per_unit: dec!(35),
            variable_cost_per_unit: dec!(18),
            fixed_costs_monthly: dec!(4000),
            monthly_loan_payment: Decimal::ZERO,
        }
    }

    #[test]
    fn test_price_sensitivity() {
        let s = analyze_sensitivity(&textile(), dec!(600), dec!(17), dec!(4000), dec!(2), dec!(2)).unwrap();
        // 600 * (33 - 18) - 4000 = 5000 ; 600 * (37 - 18) - 4000 = 7400
        assert_eq!(s.price_down.profit, dec!(5000));
        assert_eq!(s.price_up.profit, dec!(7400));
        assert_eq!(s.price_down.price, dec!(33));
    }

    #[test]
    fn test_cost_sensitivity() {
        let s = analyze_sensitivity(&textile(), dec!(600), dec!(17), dec!(4000), dec!(2), dec!(2)).unwrap();
        // 4000 / 15 ≈ 266.67 ; 4000 / 19 ≈ 210.53
        assert_eq!(s.break_even_cost_up.ceil(), Some(dec!(267)));
        assert_eq!(s.break_even_cost_down.ceil(), Some(dec!(211)));
    }

    #[test]
    fn test_cost_shock_wipes_out_margin() {
        let s = analyze_sensitivity(&textile(), dec!(600), dec!(17), dec!(4000), dec!(2), dec!(17)).unwrap();
        assert_eq!(s.break_even_cost_up, BreakEven::Unreachable);
        assert!(s.break_even_cost_down.is_reachable());
    }
}
