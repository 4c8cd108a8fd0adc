use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use emprende_core::credit::amortization::{self, LoanInput};
use emprende_core::history::{HistoryKind, HistoryRepository, JsonFileHistory};
use emprende_core::viability::analysis::{self, ViabilityInput};

use crate::commands::RunContext;
use crate::input;

/// Arguments for break-even and viability analysis
#[derive(Args)]
pub struct ViabilityArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly fixed costs (rent, utilities, logistics)
    #[arg(long)]
    pub fixed_costs: Option<Decimal>,

    /// Variable cost per unit (materials, labour, packaging)
    #[arg(long, alias = "vc")]
    pub variable_cost: Option<Decimal>,

    /// Selling price per unit
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Expected units sold per month
    #[arg(long)]
    pub units: Option<Decimal>,

    /// Initial investment, for ROI
    #[arg(long, default_value = "0")]
    pub investment: Decimal,

    /// ROI period in months
    #[arg(long, default_value_t = 12)]
    pub roi_months: u32,

    /// Desired monthly profit, for the goal scenario
    #[arg(long, default_value = "0")]
    pub desired_profit: Decimal,

    /// Price shift for sensitivity (+/-)
    #[arg(long, default_value = "0")]
    pub price_delta: Decimal,

    /// Variable cost shift for sensitivity (+/-)
    #[arg(long, default_value = "0")]
    pub cost_delta: Decimal,

    /// Monthly loan payment netted against profit
    #[arg(long, default_value = "0")]
    pub loan_payment: Decimal,

    /// Loan simulation input (JSON/YAML) whose payment is netted against profit
    #[arg(long, conflicts_with = "loan_payment")]
    pub loan_input: Option<String>,

    /// Save inputs and results to the viability history
    #[arg(long)]
    pub save: bool,
}

fn viability_input(args: &ViabilityArgs) -> Result<ViabilityInput, Box<dyn std::error::Error>> {
    if args.input.is_none() {
        if let (Some(fixed), Some(vc), Some(price), Some(units)) =
            (args.fixed_costs, args.variable_cost, args.price, args.units)
        {
            return Ok(ViabilityInput {
                fixed_costs_monthly: fixed,
                variable_cost_per_unit: vc,
                price_per_unit: price,
                expected_units_per_month: units,
                initial_investment: args.investment,
                roi_period_months: args.roi_months,
                desired_monthly_profit: args.desired_profit,
                price_sensitivity_delta: args.price_delta,
                cost_sensitivity_delta: args.cost_delta,
                monthly_loan_payment: args.loan_payment,
            });
        }
    }

    input::load(args.input.as_deref())?.ok_or_else(|| {
        "--fixed-costs, --variable-cost, --price and --units are required (or provide --input)"
            .into()
    })
}

pub fn run_viability(
    args: ViabilityArgs,
    ctx: &RunContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut viability_input = viability_input(&args)?;

    if let Some(ref path) = args.loan_input {
        let loan: LoanInput = input::file::read_input(path)?;
        let schedule = amortization::compute_schedule(&loan)?;
        tracing::info!(monthly_payment = %schedule.monthly_payment, "netting loan payment");
        viability_input = viability_input.with_loan(&schedule);
    }

    let mut output = analysis::evaluate_viability(&viability_input)?;
    output.result = output.result.rounded(ctx.decimals);

    if args.save {
        let mut history = JsonFileHistory::new(&ctx.history_file);
        let entry = history.save(
            HistoryKind::Viability,
            json!({ "input": viability_input, "result": output.result }),
        )?;
        tracing::info!(id = %entry.id, "analysis saved to history");
    }

    Ok(serde_json::to_value(output)?)
}
