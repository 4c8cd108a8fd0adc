use clap::{Args, Subcommand};
use serde_json::{json, Value};
use uuid::Uuid;

use emprende_core::history::{HistoryKind, HistoryRepository, JsonFileHistory};

use crate::commands::RunContext;

/// Saved loan simulations and viability analyses
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved entries, newest first
    List {
        /// simulation or viability
        #[arg(long, default_value = "simulation")]
        kind: HistoryKind,
    },
    /// Delete a saved entry
    Delete {
        /// Entry id as shown by `history list`
        id: Uuid,
    },
}

pub fn run_history(args: HistoryArgs, ctx: &RunContext) -> Result<Value, Box<dyn std::error::Error>> {
    let mut history = JsonFileHistory::new(&ctx.history_file);

    match args.action {
        HistoryAction::List { kind } => {
            let entries = history.list(kind)?;
            Ok(json!({ "results": entries }))
        }
        HistoryAction::Delete { id } => {
            if !history.delete(id)? {
                return Err(format!("No history entry with id {id}").into());
            }
            Ok(json!({ "result": { "deleted": id.to_string() } }))
        }
    }
}
