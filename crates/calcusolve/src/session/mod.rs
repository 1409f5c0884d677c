//! A calculator session: engine, history, preferences and persistence.
//!
//! Every mutation happens in memory first. When a store is attached, the
//! session then hands the write to a detached Tokio task. Detached writes run
//! in the order they were issued; failures are logged and reported on the
//! notification channel, and never roll back in-memory state.

pub mod clipboard;
pub mod notification;
pub mod preferences;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::engine::{CalculatorEngine, CalculatorState, EngineError, EngineResult};
use crate::core::evaluator::{Evaluator, ExpressionEvaluator};
use crate::core::event::InputEvent;
use crate::core::history::{HistoryCache, HistoryEntry};
use clipboard::Clipboard;
use notification::{Notification, NotificationReceiver, NotificationSender};
use preferences::{CalculatorMode, Preferences};
use store::{HistoryStore, PreferenceStore};

/// One user's calculator
#[derive(Debug)]
pub struct Session<E: ExpressionEvaluator = Evaluator> {
    engine: CalculatorEngine<E>,
    history: HistoryCache,
    preferences: Preferences,
    mode: CalculatorMode,
    history_store: Option<Arc<dyn HistoryStore>>,
    preference_store: Option<Arc<dyn PreferenceStore>>,
    notifications: NotificationSender,
    pending: Vec<JoinHandle<()>>,
    last_write: Option<oneshot::Receiver<()>>,
}

impl Session<Evaluator> {
    /// Creates a session with the built-in evaluator
    #[must_use]
    pub fn new(preferences: Preferences) -> (Self, NotificationReceiver) {
        Self::with_evaluator(Evaluator::new(), preferences)
    }
}

impl<E: ExpressionEvaluator> Session<E> {
    /// Creates a session with a custom evaluator
    #[must_use]
    pub fn with_evaluator(evaluator: E, preferences: Preferences) -> (Self, NotificationReceiver) {
        let (notifications, receiver) = notification::channel();
        let session = Self {
            engine: CalculatorEngine::with_evaluator(evaluator),
            history: HistoryCache::with_limit(preferences.history_limit),
            mode: preferences.default_mode,
            preferences,
            history_store: None,
            preference_store: None,
            notifications,
            pending: Vec::new(),
            last_write: None,
        };
        (session, receiver)
    }

    /// Attaches a remote history store
    #[must_use]
    pub fn with_history_store(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history_store = Some(store);
        self
    }

    /// Attaches a preference store
    #[must_use]
    pub fn with_preference_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preference_store = Some(store);
        self
    }

    // ===== Accessors =====

    /// Current display text
    #[must_use]
    pub fn display(&self) -> &str {
        self.engine.display()
    }

    /// Current engine state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        self.engine.state()
    }

    /// In-memory history
    #[must_use]
    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    /// Current preferences
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Current keypad mode
    #[must_use]
    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// True when a remote history store is attached
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.history_store.is_some()
    }

    // ===== Loading =====

    /// Loads stored preferences, keeping defaults when none are stored or
    /// the store fails
    pub async fn load_preferences(&mut self) {
        let Some(store) = self.preference_store.clone() else {
            return;
        };
        match store.load_preferences().await {
            Ok(Some(preferences)) => {
                debug!(?preferences, "preferences loaded");
                self.history.set_limit(preferences.history_limit);
                self.mode = preferences.default_mode;
                self.preferences = preferences;
            }
            Ok(None) => debug!("no stored preferences, using defaults"),
            Err(err) => {
                warn!(error = %err, "failed to load preferences");
                self.notify(Notification::PreferencesUnavailable(err.to_string()));
            }
        }
    }

    /// Replaces the in-memory history with the newest stored entries
    pub async fn hydrate(&mut self) {
        let Some(store) = self.history_store.clone() else {
            return;
        };
        match store.fetch_entries(self.preferences.history_limit).await {
            Ok(entries) => {
                debug!(count = entries.len(), "history hydrated");
                self.history.hydrate(entries);
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch history");
                self.notify(Notification::PersistenceFailed(err.to_string()));
            }
        }
    }

    // ===== Input =====

    /// Applies one input event. Returns the history entry it produced, if any.
    pub fn handle(&mut self, event: InputEvent) -> Option<HistoryEntry> {
        match self.engine.apply(event) {
            Ok(Some(entry)) => {
                let entry = entry.with_mode(self.mode);
                self.record(entry.clone());
                Some(entry)
            }
            Ok(None) => None,
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    /// Applies events in order, returning every entry produced
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = InputEvent>) -> Vec<HistoryEntry> {
        events.into_iter().filter_map(|event| self.handle(event)).collect()
    }

    /// Loads the result of history entry `index` (0 = newest) onto the display
    pub fn recall(&mut self, index: usize) -> EngineResult<()> {
        let result = self
            .history
            .get(index)
            .map(|entry| entry.result.clone())
            .ok_or_else(|| EngineError::InvalidInput(format!("no history entry {index}")))?;
        self.engine.recall(&result)
    }

    /// Copies the display text
    pub fn copy_display(&self, clipboard: &mut dyn Clipboard) -> bool {
        match clipboard.set_text(self.display()) {
            Ok(()) => {
                self.notify(Notification::Copied);
                true
            }
            Err(err) => {
                warn!(error = %err, "copy to clipboard failed");
                self.notify(Notification::CopyFailed);
                false
            }
        }
    }

    // ===== History =====

    /// Clears the history locally, then remotely
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.notify(Notification::HistoryCleared);

        let Some(store) = self.history_store.clone() else {
            return;
        };
        let notifications = self.notifications.clone();
        self.spawn_write("clear history", async move {
            if let Err(err) = store.clear_persisted().await {
                warn!(error = %err, "failed to clear stored history");
                let _ = notifications.send(Notification::PersistenceFailed(err.to_string()));
            }
        });
    }

    // ===== Preferences =====

    /// Switches the keypad mode for this session
    pub fn set_mode(&mut self, mode: CalculatorMode) {
        self.mode = mode;
    }

    /// Sets the mode new sessions start in
    pub fn set_default_mode(&mut self, mode: CalculatorMode) {
        self.preferences.default_mode = mode;
        self.save_preferences();
    }

    /// Changes the history limit; existing entries are trimmed on the next append
    pub fn set_history_limit(&mut self, limit: usize) {
        self.preferences.history_limit = limit;
        self.history.set_limit(limit);
        self.save_preferences();
    }

    /// Flips dark mode and returns the new value
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.preferences.dark_mode = !self.preferences.dark_mode;
        let dark_mode = self.preferences.dark_mode;
        info!(dark_mode, "theme changed");
        self.notify(Notification::ThemeChanged { dark_mode });
        self.save_preferences();
        dark_mode
    }

    // ===== Detached writes =====

    /// Waits for every detached write issued so far
    pub async fn flush(&mut self) {
        let pending: Vec<_> = self.pending.drain(..).collect();
        for result in futures::future::join_all(pending).await {
            if let Err(err) = result {
                warn!(error = %err, "detached write panicked or was cancelled");
            }
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.history.append(entry.clone());

        let Some(store) = self.history_store.clone() else {
            return;
        };
        let notifications = self.notifications.clone();
        self.spawn_write("persist history entry", async move {
            if let Err(err) = store.persist_entry(&entry).await {
                warn!(error = %err, expression = %entry.expression, "failed to persist history entry");
                let _ = notifications.send(Notification::PersistenceFailed(err.to_string()));
            }
        });
    }

    fn save_preferences(&mut self) {
        let Some(store) = self.preference_store.clone() else {
            return;
        };
        let preferences = self.preferences.clone();
        let notifications = self.notifications.clone();
        self.spawn_write("save preferences", async move {
            if let Err(err) = store.save_preferences(&preferences).await {
                warn!(error = %err, "failed to save preferences");
                let _ = notifications.send(Notification::PersistenceFailed(err.to_string()));
            }
        });
    }

    /// Spawns `task` after every previously spawned write has finished
    fn spawn_write<F>(&mut self, what: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            warn!(what, "no async runtime, skipping remote write");
            return;
        };

        self.pending.retain(|handle| !handle.is_finished());
        let previous = self.last_write.take();
        let (done, next) = oneshot::channel();
        self.last_write = Some(next);

        self.pending.push(runtime.spawn(async move {
            if let Some(previous) = previous {
                // Err only means the previous task ended without signalling
                let _ = previous.await;
            }
            debug!(what, "running detached write");
            task.await;
            let _ = done.send(());
        }));
    }

    fn report(&self, err: &EngineError) {
        match err {
            EngineError::Evaluation(cause) => {
                debug!(error = %cause, "calculation reset");
                self.notify(Notification::InvalidCalculation);
            }
            EngineError::Domain(domain) => self.notify(Notification::Domain(domain.clone())),
            EngineError::InvalidInput(reason) => debug!(%reason, "input ignored"),
        }
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scientific::UnaryFunction;
    use crate::core::BinaryOperator;
    use clipboard::MemoryClipboard;
    use notification::drain;

    fn events(tokens: &str) -> Vec<InputEvent> {
        tokens.split_whitespace().map(|t| t.parse().unwrap()).collect()
    }

    #[test]
    fn test_session_starts_from_preferences() {
        let prefs = Preferences::default()
            .with_history_limit(4)
            .with_default_mode(CalculatorMode::Scientific);
        let (session, _rx) = Session::new(prefs);
        assert_eq!(session.mode(), CalculatorMode::Scientific);
        assert_eq!(session.history().limit(), 4);
        assert_eq!(session.display(), "0");
        assert!(!session.is_persistent());
    }

    #[test]
    fn test_handle_records_history_newest_first() {
        let (mut session, _rx) = Session::new(Preferences::default());
        let produced = session.handle_all(events("5 + 3 * 2 ="));
        assert_eq!(produced.len(), 2);
        assert_eq!(session.display(), "16");
        let listed: Vec<_> = session
            .history()
            .list()
            .map(|e| (e.expression.as_str(), e.result.as_str()))
            .collect();
        assert_eq!(listed, vec![("8 * 2", "16"), ("5 + 3", "8")]);
    }

    #[test]
    fn test_entries_record_session_mode() {
        let (mut session, _rx) = Session::new(Preferences::default());
        session.handle_all(events("2 + 2 ="));
        session.set_mode(CalculatorMode::Scientific);
        let produced = session.handle_all(events("9 sqrt"));
        assert_eq!(produced[0].mode, Some(CalculatorMode::Scientific));

        let modes: Vec<_> = session.history().list().map(|e| e.mode).collect();
        assert_eq!(
            modes,
            vec![Some(CalculatorMode::Scientific), Some(CalculatorMode::Basic)]
        );
    }

    #[test]
    fn test_evaluation_error_notifies_and_resets() {
        let (mut session, mut rx) = Session::new(Preferences::default());
        session.handle_all(events("9 / 0 ="));
        assert_eq!(session.display(), "0");
        assert!(session.history().is_empty());
        assert_eq!(drain(&mut rx), vec![Notification::InvalidCalculation]);
    }

    #[test]
    fn test_domain_error_notifies_without_reset() {
        let (mut session, mut rx) = Session::new(Preferences::default());
        session.handle_all(events("4 neg"));
        assert_eq!(session.handle(InputEvent::Function(UnaryFunction::SquareRoot)), None);
        assert_eq!(session.display(), "-4");
        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message(), "Cannot calculate square root of negative number");
    }

    #[test]
    fn test_recall_from_history() {
        let (mut session, _rx) = Session::new(Preferences::default());
        session.handle_all(events("6 * 7 = C"));
        session.recall(0).unwrap();
        assert_eq!(session.display(), "42");
        assert!(session.recall(5).is_err());
    }

    #[test]
    fn test_copy_display() {
        let (mut session, mut rx) = Session::new(Preferences::default());
        session.handle_all(events("1 2"));

        let mut clipboard = MemoryClipboard::new();
        assert!(session.copy_display(&mut clipboard));
        assert_eq!(clipboard.contents(), Some("12"));

        assert!(!session.copy_display(&mut MemoryClipboard::unavailable()));
        assert_eq!(
            drain(&mut rx),
            vec![Notification::Copied, Notification::CopyFailed]
        );
    }

    #[test]
    fn test_clear_history_without_store() {
        let (mut session, mut rx) = Session::new(Preferences::default());
        session.handle_all(events("1 + 1 ="));
        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(drain(&mut rx), vec![Notification::HistoryCleared]);
    }

    #[test]
    fn test_history_limit_change_is_lazy() {
        let (mut session, _rx) = Session::new(Preferences::default());
        session.handle_all(events("1 + 1 = 2 + 2 = 3 + 3 ="));
        session.set_history_limit(1);
        assert_eq!(session.history().len(), 3);
        session.handle(InputEvent::Operator(BinaryOperator::Add));
        session.handle_all(events("1 ="));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.preferences().history_limit, 1);
    }

    #[test]
    fn test_toggle_dark_mode() {
        let (mut session, mut rx) = Session::new(Preferences::default());
        assert!(session.toggle_dark_mode());
        assert!(!session.toggle_dark_mode());
        assert_eq!(
            drain(&mut rx),
            vec![
                Notification::ThemeChanged { dark_mode: true },
                Notification::ThemeChanged { dark_mode: false },
            ]
        );
    }

    #[test]
    fn test_store_without_runtime_keeps_memory_state() {
        let store = Arc::new(store::MemoryStore::new());
        let (session, _rx) = Session::new(Preferences::default());
        let mut session = session.with_history_store(store);
        session.handle_all(events("2 * 3 ="));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.display(), "6");
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (mut session, rx) = Session::new(Preferences::default());
        drop(rx);
        session.handle_all(events("1 / 0 ="));
        assert_eq!(session.display(), "0");
    }
}
