use uuid::Uuid;

use super::{push_front, HistoryEntry, HistoryKind, HistoryRepository};
use crate::EmprendeResult;

/// Process-local history, lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryRepository for InMemoryHistory {
    fn save(
        &mut self,
        kind: HistoryKind,
        payload: serde_json::Value,
    ) -> EmprendeResult<HistoryEntry> {
        let entry = HistoryEntry::new(kind, payload);
        push_front(&mut self.entries, entry.clone());
        Ok(entry)
    }

    fn list(&self, kind: HistoryKind) -> EmprendeResult<Vec<HistoryEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect())
    }

    fn delete(&mut self, id: Uuid) -> EmprendeResult<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        Ok(self.entries.len() < before)
    }
}
