use emprende_core::history::{
    HistoryKind, HistoryRepository, JsonFileHistory, MAX_HISTORY_ENTRIES,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_missing_file_is_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = JsonFileHistory::new(dir.path().join("history.json"));

    assert!(history.list(HistoryKind::Simulation).unwrap().is_empty());
    assert!(!history.path().exists());
}

#[test]
fn test_entries_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.json");

    let mut history = JsonFileHistory::new(&path);
    let saved = history
        .save(HistoryKind::Simulation, json!({ "input": { "principal": "10000" } }))
        .unwrap();
    history
        .save(HistoryKind::Viability, json!({ "input": { "price_per_unit": "35" } }))
        .unwrap();

    let reopened = JsonFileHistory::new(&path);
    let sims = reopened.list(HistoryKind::Simulation).unwrap();
    assert_eq!(sims.len(), 1);
    assert_eq!(sims[0], saved);
    assert_eq!(reopened.list(HistoryKind::Viability).unwrap().len(), 1);
}

#[test]
fn test_delete_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut history = JsonFileHistory::new(dir.path().join("history.json"));

    let keep = history.save(HistoryKind::Viability, json!({ "n": 1 })).unwrap();
    let drop = history.save(HistoryKind::Viability, json!({ "n": 2 })).unwrap();

    assert!(history.delete(drop.id).unwrap());
    assert!(!history.delete(drop.id).unwrap());

    let left = history.list(HistoryKind::Viability).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, keep.id);
}

#[test]
fn test_newest_first_and_capped() {
    let dir = tempfile::tempdir().unwrap();
    let mut history = JsonFileHistory::new(dir.path().join("history.json"));

    for n in 0..(MAX_HISTORY_ENTRIES + 3) {
        history.save(HistoryKind::Simulation, json!({ "n": n })).unwrap();
    }

    let sims = history.list(HistoryKind::Simulation).unwrap();
    assert_eq!(sims.len(), MAX_HISTORY_ENTRIES);
    assert_eq!(sims[0].payload["n"], MAX_HISTORY_ENTRIES + 2);
    assert_eq!(sims.last().unwrap().payload["n"], 3);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, "not json").unwrap();

    let history = JsonFileHistory::new(&path);
    assert!(history.list(HistoryKind::Simulation).is_err());
}
