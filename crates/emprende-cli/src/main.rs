mod commands;
mod input;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::credit::LoanArgs;
use commands::history::HistoryArgs;
use commands::sales::SalesArgs;
use commands::viability::ViabilityArgs;
use commands::RunContext;

/// Credit, viability and sales calculations for micro-enterprises
#[derive(Parser)]
#[command(
    name = "emprende",
    version,
    about = "Credit, viability and sales calculations for micro-enterprises",
    long_about = "A CLI for small-business owners: simulate a loan's amortization schedule, \
                  find the break-even point and scenarios for a business, and project \
                  month-end results from daily sales. All figures use decimal arithmetic."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Decimal places for monetary results
    #[arg(long, default_value_t = 2, global = true)]
    decimals: u32,

    /// File where saved simulations and analyses are kept
    #[arg(
        long,
        env = "EMPRENDE_HISTORY_FILE",
        default_value = ".emprende_history.json",
        global = true
    )]
    history_file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a loan and its monthly payment schedule
    Loan(LoanArgs),
    /// Break-even, profitability, scenarios and price sensitivity
    Viability(ViabilityArgs),
    /// Month-to-date sales progress and month-end projection
    Sales(SalesArgs),
    /// List or delete saved simulations and analyses
    History(HistoryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let ctx = RunContext {
        decimals: cli.decimals,
        history_file: cli.history_file,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::credit::run_loan(args, &ctx),
        Commands::Viability(args) => commands::viability::run_viability(args, &ctx),
        Commands::Sales(args) => commands::sales::run_sales(args, &ctx),
        Commands::History(args) => commands::history::run_history(args, &ctx),
        Commands::Version => {
            println!("emprende {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
