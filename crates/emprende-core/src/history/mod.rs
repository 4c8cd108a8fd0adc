//! Saved simulations and analyses.
//!
//! The calculators never read or write history; the host application
//! decides what to keep and injects a [`HistoryRepository`].

pub mod file;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Constraint, EmprendeError};
use crate::EmprendeResult;

pub use file::JsonFileHistory;
pub use memory::InMemoryHistory;

/// Entries kept per kind; older ones are dropped on save.
pub const MAX_HISTORY_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// Loan simulations
    Simulation,
    /// Viability analyses
    Viability,
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryKind::Simulation => write!(f, "simulation"),
            HistoryKind::Viability => write!(f, "viability"),
        }
    }
}

impl FromStr for HistoryKind {
    type Err = EmprendeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulation" | "loan" | "credit" => Ok(HistoryKind::Simulation),
            "viability" => Ok(HistoryKind::Viability),
            other => Err(EmprendeError::invalid(
                "kind",
                Constraint::Unparseable {
                    raw: other.to_string(),
                },
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub kind: HistoryKind,
    pub timestamp: DateTime<Utc>,
    /// Inputs and results as saved by the caller
    pub payload: serde_json::Value,
}

impl HistoryEntry {
    pub fn new(kind: HistoryKind, payload: serde_json::Value) -> Self {
        HistoryEntry {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            payload,
        }
    }
}

pub trait HistoryRepository {
    /// Store a new entry as the most recent of its kind.
    fn save(&mut self, kind: HistoryKind, payload: serde_json::Value)
        -> EmprendeResult<HistoryEntry>;

    /// Entries of one kind, newest first.
    fn list(&self, kind: HistoryKind) -> EmprendeResult<Vec<HistoryEntry>>;

    /// Remove an entry. Returns false when no entry has that id.
    fn delete(&mut self, id: Uuid) -> EmprendeResult<bool>;
}

/// Insert `entry` at the front of its kind and enforce the per-kind cap.
pub(crate) fn push_front(entries: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    let kind = entry.kind;
    entries.insert(0, entry);

    let mut seen = 0;
    entries.retain(|e| {
        if e.kind != kind {
            return true;
        }
        seen += 1;
        seen <= MAX_HISTORY_ENTRIES
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("loan".parse::<HistoryKind>().unwrap(), HistoryKind::Simulation);
        assert_eq!("Viability".parse::<HistoryKind>().unwrap(), HistoryKind::Viability);
        assert!("chat".parse::<HistoryKind>().is_err());
    }

    #[test]
    fn test_push_front_caps_per_kind() {
        let mut entries = vec![HistoryEntry::new(HistoryKind::Viability, serde_json::json!({}))];
        for i in 0..(MAX_HISTORY_ENTRIES + 5) {
            push_front(
                &mut entries,
                HistoryEntry::new(HistoryKind::Simulation, serde_json::json!({ "n": i })),
            );
        }
        let sims = entries.iter().filter(|e| e.kind == HistoryKind::Simulation).count();
        assert_eq!(sims, MAX_HISTORY_ENTRIES);
        // other kinds untouched
        assert_eq!(entries.iter().filter(|e| e.kind == HistoryKind::Viability).count(), 1);
        // newest first
        assert_eq!(entries[0].payload["n"], MAX_HISTORY_ENTRIES + 4);
    }
}
