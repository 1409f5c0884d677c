//! Bounded, newest-first calculation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::session::preferences::CalculatorMode;

/// A completed calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The expression that was evaluated, e.g. `5 + 3` or `sqrt(9)`
    pub expression: String,
    /// The rendered result
    pub result: String,
    /// When the calculation completed
    pub timestamp: DateTime<Utc>,
    /// Keypad mode the calculation was made in, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<CalculatorMode>,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time
    #[must_use]
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self::with_timestamp(expression, result, Utc::now())
    }

    /// Creates an entry with a specific timestamp
    #[must_use]
    pub fn with_timestamp(
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp,
            mode: None,
        }
    }

    /// Tags the entry with the mode it was made in
    #[must_use]
    pub fn with_mode(mut self, mode: CalculatorMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Returns `expression = result`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}

/// In-memory history, newest entry first.
///
/// Holds at most `limit` entries after every [`append`](Self::append).
/// Changing the limit does not drop entries by itself; the next append
/// trims the tail.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryCache {
    /// Default history limit
    pub const DEFAULT_LIMIT: usize = 10;

    /// Creates an empty cache with the default limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Creates an empty cache with a custom limit
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    /// Inserts an entry at the front and trims the tail to the limit
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    /// Replaces the contents with entries loaded from a store (newest first)
    pub fn hydrate(&mut self, entries: impl IntoIterator<Item = HistoryEntry>) {
        self.entries = entries.into_iter().take(self.limit).collect();
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest-first view of the entries
    pub fn list(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// Sets the limit applied on the next append
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Current limit
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index` (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Serializes the entries (newest first) to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Builds a cache from JSON produced by [`to_json`](Self::to_json)
    pub fn from_json(json: &str, limit: usize) -> Result<Self, serde_json::Error> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(json)?;
        let mut cache = Self::with_limit(limit);
        cache.hydrate(entries);
        Ok(cache)
    }

    /// One `expression = result` line per entry, newest first
    #[must_use]
    pub fn export_formatted(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::display)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::with_timestamp(
            format!("{n} + 0"),
            n.to_string(),
            Utc.timestamp_opt(1_700_000_000 + n as i64, 0).unwrap(),
        )
    }

    fn expressions(cache: &HistoryCache) -> Vec<&str> {
        cache.list().map(|e| e.expression.as_str()).collect()
    }

    // ===== HistoryEntry tests =====

    #[test]
    fn test_entry_display() {
        let e = HistoryEntry::new("10 / 4", "2.5");
        assert_eq!(e.display(), "10 / 4 = 2.5");
    }

    #[test]
    fn test_entry_timestamp_is_recent() {
        let before = Utc::now();
        let e = HistoryEntry::new("1 + 1", "2");
        assert!(e.timestamp >= before);
        assert!(e.timestamp <= Utc::now());
    }

    #[test]
    fn test_entry_mode_is_optional_in_json() {
        let tagged = HistoryEntry::new("sqrt(9)", "3").with_mode(CalculatorMode::Scientific);
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["mode"], "scientific");

        let untagged = serde_json::to_value(HistoryEntry::new("1 + 1", "2")).unwrap();
        assert!(untagged.get("mode").is_none());

        let legacy: HistoryEntry = serde_json::from_str(
            r#"{"expression":"1 + 1","result":"2","timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(legacy.mode, None);
    }

    // ===== HistoryCache tests =====

    #[test]
    fn test_new_cache_is_empty_with_default_limit() {
        let cache = HistoryCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.limit(), 10);
        assert!(cache.latest().is_none());
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut cache = HistoryCache::new();
        cache.append(entry(1));
        cache.append(entry(2));
        assert_eq!(expressions(&cache), vec!["2 + 0", "1 + 0"]);
        assert_eq!(cache.latest(), Some(&entry(2)));
        assert_eq!(cache.get(1), Some(&entry(1)));
    }

    #[test]
    fn test_limit_three_keeps_three_newest() {
        let mut cache = HistoryCache::with_limit(3);
        for n in 1..=4 {
            cache.append(entry(n));
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(expressions(&cache), vec!["4 + 0", "3 + 0", "2 + 0"]);
    }

    #[test]
    fn test_set_limit_applies_on_next_append() {
        let mut cache = HistoryCache::with_limit(5);
        for n in 1..=5 {
            cache.append(entry(n));
        }
        cache.set_limit(2);
        assert_eq!(cache.len(), 5);

        cache.append(entry(6));
        assert_eq!(expressions(&cache), vec!["6 + 0", "5 + 0"]);
    }

    #[test]
    fn test_zero_limit_holds_nothing() {
        let mut cache = HistoryCache::with_limit(0);
        cache.append(entry(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache = HistoryCache::new();
        cache.append(entry(1));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hydrate_respects_limit() {
        let mut cache = HistoryCache::with_limit(2);
        cache.append(entry(99));
        cache.hydrate((1..=4).rev().map(entry));
        assert_eq!(expressions(&cache), vec!["4 + 0", "3 + 0"]);
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let mut cache = HistoryCache::new();
        cache.append(entry(1));
        cache.append(entry(2));
        let json = cache.to_json().unwrap();
        let restored = HistoryCache::from_json(&json, 10).unwrap();
        assert_eq!(expressions(&restored), vec!["2 + 0", "1 + 0"]);
        assert_eq!(restored.latest(), cache.latest());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(HistoryCache::from_json("not json", 10).is_err());
    }

    #[test]
    fn test_export_formatted() {
        let mut cache = HistoryCache::new();
        cache.append(HistoryEntry::new("5 + 3", "8"));
        cache.append(HistoryEntry::new("8 * 2", "16"));
        assert_eq!(cache.export_formatted(), "8 * 2 = 16\n5 + 3 = 8");
    }
}
