use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use emprende_core::credit::amortization::{self, LoanInput, ScheduleType};
use emprende_core::history::{HistoryKind, HistoryRepository, JsonFileHistory};

use crate::commands::RunContext;
use crate::input;

/// Arguments for a loan simulation
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Term in months (1-360)
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// Nominal annual interest rate in percent (e.g. 12 for 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Payment scheme: fixed or constant (declining payment)
    #[arg(long, default_value = "fixed")]
    pub schedule: ScheduleType,

    /// Save inputs and results to the simulation history
    #[arg(long)]
    pub save: bool,
}

fn loan_input(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if args.input.is_none() {
        if let (Some(principal), Some(term_months), Some(annual_rate_percent)) =
            (args.principal, args.term_months, args.annual_rate)
        {
            return Ok(LoanInput {
                principal,
                term_months,
                annual_rate_percent,
                schedule_type: args.schedule,
            });
        }
    }

    input::load(args.input.as_deref())?.ok_or_else(|| {
        "--principal, --term-months and --annual-rate are required (or provide --input)".into()
    })
}

pub fn run_loan(args: LoanArgs, ctx: &RunContext) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = loan_input(&args)?;

    let mut output = amortization::simulate_loan(&loan_input)?;
    output.result = output.result.rounded(ctx.decimals);

    if args.save {
        let mut history = JsonFileHistory::new(&ctx.history_file);
        let entry = history.save(
            HistoryKind::Simulation,
            json!({ "input": loan_input, "result": output.result }),
        )?;
        tracing::info!(id = %entry.id, "simulation saved to history");
    }

    Ok(serde_json::to_value(output)?)
}
