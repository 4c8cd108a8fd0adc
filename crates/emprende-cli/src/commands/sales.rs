use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use emprende_core::sales::calendar::MonthKey;
use emprende_core::sales::daily::{DailySale, DailySaleEntry, MonthlyParameters};
use emprende_core::sales::projection;

use crate::commands::RunContext;
use crate::input;

/// Arguments for the monthly sales report
#[derive(Args)]
pub struct SalesArgs {
    /// Path to JSON/YAML file with `parameters` and `sales`
    #[arg(long)]
    pub input: Option<String>,

    /// Month to report, YYYY-MM (defaults to the month of --today)
    #[arg(long)]
    pub month: Option<MonthKey>,

    /// Reference date, YYYY-MM-DD (defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Days elapsed in the month; skips calendar filtering when given
    #[arg(long, conflicts_with_all = ["month", "today"])]
    pub as_of_day: Option<u32>,
}

/// A month of recorded sales as stored by the host application
#[derive(Debug, Deserialize)]
struct SalesBook {
    parameters: MonthlyParameters,
    #[serde(default)]
    sales: Vec<DailySaleEntry>,
}

pub fn run_sales(args: SalesArgs, ctx: &RunContext) -> Result<Value, Box<dyn std::error::Error>> {
    let book: SalesBook = input::load(args.input.as_deref())?
        .ok_or("--input file (or JSON on stdin) is required for the sales report")?;

    let sales = book
        .sales
        .iter()
        .map(|entry| entry.resolve(&book.parameters))
        .collect::<Result<Vec<DailySale>, _>>()?;

    let mut output = match args.as_of_day {
        Some(day) => projection::project_as_of(&sales, &book.parameters, day)?,
        None => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            let month = args.month.unwrap_or_else(|| MonthKey::of(today));
            projection::sales_report(&sales, &book.parameters, month, today)?
        }
    };
    output.result = output.result.rounded(ctx.decimals);

    Ok(serde_json::to_value(output)?)
}
