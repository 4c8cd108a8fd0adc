use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.01 = 1%).
pub type Rate = Decimal;

/// Percentages as shown to the user (12 = 12%).
pub type Percent = Decimal;

/// Unit volumes. May be fractional (break-even, averages).
pub type Units = Decimal;

/// Round a monetary value for display. Never call mid-computation.
pub fn round_money(value: Money, dp: u32) -> Money {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to whole units, halves away from zero.
pub fn round_units(value: Units) -> Units {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Break-even volume or revenue.
///
/// A zero (or negative) contribution margin means no sales volume ever
/// covers the fixed costs; that is a valid answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    Finite(Decimal),
    Unreachable,
}

impl BreakEven {
    /// `numerator / margin`, or Unreachable when the margin is not positive
    /// or so thin that the volume leaves `Decimal` range.
    pub fn from_margin(numerator: Decimal, margin: Decimal) -> Self {
        if margin <= Decimal::ZERO {
            return BreakEven::Unreachable;
        }
        numerator
            .checked_div(margin)
            .map_or(BreakEven::Unreachable, BreakEven::Finite)
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, BreakEven::Finite(_))
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            BreakEven::Finite(v) => Some(*v),
            BreakEven::Unreachable => None,
        }
    }

    /// Whole units needed to actually break even.
    pub fn ceil(&self) -> Option<Decimal> {
        self.value().map(|v| v.ceil())
    }

    /// Multiply a finite value; Unreachable stays Unreachable, as does a
    /// product past `Decimal` range.
    pub fn scale(&self, factor: Decimal) -> Self {
        match self {
            BreakEven::Finite(v) => v
                .checked_mul(factor)
                .map_or(BreakEven::Unreachable, BreakEven::Finite),
            BreakEven::Unreachable => BreakEven::Unreachable,
        }
    }

    pub fn rounded(&self, dp: u32) -> Self {
        match self {
            BreakEven::Finite(v) => BreakEven::Finite(round_money(*v, dp)),
            BreakEven::Unreachable => BreakEven::Unreachable,
        }
    }
}

impl fmt::Display for BreakEven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEven::Finite(v) => write!(f, "{v}"),
            BreakEven::Unreachable => write!(f, "N/A"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
