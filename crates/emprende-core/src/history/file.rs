use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{push_front, HistoryEntry, HistoryKind, HistoryRepository};
use crate::EmprendeResult;

/// History kept as one JSON array on disk.
///
/// The file is read on every call and rewritten on every change; a missing
/// file is an empty history.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileHistory { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> EmprendeResult<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn store(&self, entries: &[HistoryEntry]) -> EmprendeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "history written");
        Ok(())
    }
}

impl HistoryRepository for JsonFileHistory {
    fn save(
        &mut self,
        kind: HistoryKind,
        payload: serde_json::Value,
    ) -> EmprendeResult<HistoryEntry> {
        let mut entries = self.load()?;
        let entry = HistoryEntry::new(kind, payload);
        push_front(&mut entries, entry.clone());
        self.store(&entries)?;
        Ok(entry)
    }

    fn list(&self, kind: HistoryKind) -> EmprendeResult<Vec<HistoryEntry>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect())
    }

    fn delete(&mut self, id: Uuid) -> EmprendeResult<bool> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.store(&entries)?;
        Ok(true)
    }
}
