pub mod credit;
pub mod history;
pub mod sales;
pub mod viability;

use std::path::PathBuf;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Decimal places used when presenting results
    pub decimals: u32,
    pub history_file: PathBuf,
}
