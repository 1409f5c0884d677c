//! Session persistence tests against the in-memory and JSON file stores

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use calcusolve::core::event::InputEvent;
use calcusolve::core::history::HistoryEntry;
use calcusolve::session::notification::{drain, Notification};
use calcusolve::session::preferences::{CalculatorMode, Preferences};
use calcusolve::session::store::{HistoryStore, JsonFileStore, MemoryStore, PreferenceStore};
use calcusolve::session::Session;
use tempfile::TempDir;

fn events(tokens: &str) -> Vec<InputEvent> {
    tokens
        .split_whitespace()
        .map(|t| t.parse().expect("valid token"))
        .collect()
}

fn expressions(entries: &[HistoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.expression.as_str()).collect()
}

// ============================================================================
// History persistence
// ============================================================================

#[tokio::test]
async fn test_entries_persist_after_flush() {
    let store = Arc::new(MemoryStore::new());
    let (session, mut rx) = Session::new(Preferences::default());
    let mut session = session.with_history_store(store.clone());
    assert!(session.is_persistent());

    session.handle_all(events("5 + 3 * 2 ="));
    session.flush().await;

    assert_eq!(expressions(&store.entries().await), vec!["8 * 2", "5 + 3"]);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_failing_store_keeps_memory_and_notifies() {
    let store = Arc::new(MemoryStore::failing());
    let (session, mut rx) = Session::new(Preferences::default());
    let mut session = session.with_history_store(store.clone());

    session.handle_all(events("7 * 6 ="));
    session.flush().await;

    assert_eq!(session.display(), "42");
    assert_eq!(session.history().len(), 1);
    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert!(matches!(notes[0], Notification::PersistenceFailed(_)));
    assert_eq!(notes[0].message(), "Failed to save calculation history");
}

#[tokio::test]
async fn test_hydrate_respects_limit() {
    let stored: Vec<_> = (0..8)
        .rev()
        .map(|i| HistoryEntry::new(format!("{i} + 1"), (i + 1).to_string()))
        .collect();
    let store = Arc::new(MemoryStore::with_entries(stored));
    let (session, _rx) = Session::new(Preferences::default().with_history_limit(3));
    let mut session = session.with_history_store(store);

    session.hydrate().await;

    let listed: Vec<_> = session.history().list().map(|e| e.result.clone()).collect();
    assert_eq!(listed, vec!["8", "7", "6"]);
}

#[tokio::test]
async fn test_hydrate_failure_keeps_empty_history() {
    let (session, mut rx) = Session::new(Preferences::default());
    let mut session = session.with_history_store(Arc::new(MemoryStore::failing()));

    session.hydrate().await;

    assert!(session.history().is_empty());
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [Notification::PersistenceFailed(_)]
    ));
}

#[tokio::test]
async fn test_clear_history_clears_store() {
    let store = Arc::new(MemoryStore::new());
    let (session, mut rx) = Session::new(Preferences::default());
    let mut session = session.with_history_store(store.clone());

    session.handle_all(events("1 + 1 = 2 + 2 ="));
    session.clear_history();
    session.flush().await;

    assert!(session.history().is_empty());
    assert!(store.entries().await.is_empty());
    assert_eq!(drain(&mut rx), vec![Notification::HistoryCleared]);
}

#[tokio::test]
async fn test_writes_apply_in_issue_order() {
    let store = Arc::new(MemoryStore::new());
    let (session, _rx) = Session::new(Preferences::default());
    let mut session = session.with_history_store(store.clone());

    session.handle_all(events("1 + 1 ="));
    session.clear_history();
    session.handle_all(events("2 + 2 ="));
    session.flush().await;

    assert_eq!(expressions(&store.entries().await), vec!["2 + 2"]);
}

#[tokio::test]
async fn test_json_store_survives_new_session() {
    let dir = TempDir::new().unwrap();

    {
        let store = Arc::new(JsonFileStore::new(dir.path()));
        let (session, _rx) = Session::new(Preferences::default());
        let mut session = session.with_history_store(store);
        session.handle_all(events("1 2 / 4 = 9 sqrt"));
        session.flush().await;
    }

    assert!(dir.path().join(JsonFileStore::HISTORY_FILE).exists());

    let store = Arc::new(JsonFileStore::new(dir.path()));
    let (session, _rx) = Session::new(Preferences::default());
    let mut session = session.with_history_store(store);
    session.hydrate().await;

    let listed: Vec<_> = session.history().list().map(HistoryEntry::display).collect();
    assert_eq!(listed, vec!["sqrt(9) = 3", "12 / 4 = 3"]);
}

// ============================================================================
// Preferences
// ============================================================================

#[tokio::test]
async fn test_preferences_round_trip_through_store() {
    let store = Arc::new(MemoryStore::new());
    let (session, _rx) = Session::new(Preferences::default());
    let mut session = session.with_preference_store(store.clone());

    session.set_history_limit(4);
    session.set_default_mode(CalculatorMode::Scientific);
    assert!(session.toggle_dark_mode());
    session.flush().await;

    let saved = store.preferences().await.expect("preferences saved");
    assert_eq!(saved.history_limit, 4);
    assert_eq!(saved.default_mode, CalculatorMode::Scientific);
    assert!(saved.dark_mode);

    let (fresh, _rx) = Session::new(Preferences::default());
    let mut fresh = fresh.with_preference_store(store);
    fresh.load_preferences().await;
    assert_eq!(fresh.preferences(), &saved);
    assert_eq!(fresh.mode(), CalculatorMode::Scientific);
    assert_eq!(fresh.history().limit(), 4);
}

#[tokio::test]
async fn test_missing_preferences_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    assert!(store.load_preferences().await.unwrap().is_none());

    let (session, mut rx) = Session::new(Preferences::default());
    let mut session = session.with_preference_store(store);
    session.load_preferences().await;

    assert_eq!(session.preferences(), &Preferences::default());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_unavailable_preferences_notify() {
    let (session, mut rx) = Session::new(Preferences::default().with_history_limit(7));
    let mut session = session.with_preference_store(Arc::new(MemoryStore::failing()));
    session.load_preferences().await;

    assert_eq!(session.preferences().history_limit, 7);
    let notes = drain(&mut rx);
    assert!(matches!(
        notes.as_slice(),
        [Notification::PreferencesUnavailable(_)]
    ));
    assert_eq!(notes[0].message(), "Failed to load preferences");
}

#[tokio::test]
async fn test_json_store_directly() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested"));

    store
        .persist_entry(&HistoryEntry::new("1 + 1", "2"))
        .await
        .unwrap();
    store
        .persist_entry(&HistoryEntry::new("2 + 2", "4"))
        .await
        .unwrap();
    assert_eq!(
        expressions(&store.fetch_entries(1).await.unwrap()),
        vec!["2 + 2"]
    );

    store.clear_persisted().await.unwrap();
    assert!(store.fetch_entries(10).await.unwrap().is_empty());
}
