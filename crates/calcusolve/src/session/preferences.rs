//! Persisted user preferences

use serde::{Deserialize, Serialize};

use crate::core::history::HistoryCache;

/// Which keypad is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorMode {
    /// Digits, the four operators, percent, sign and editing keys
    #[default]
    Basic,
    /// Basic keys plus scientific functions and constants
    Scientific,
}

impl CalculatorMode {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Scientific => "scientific",
        }
    }
}

impl std::fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CalculatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "scientific" => Ok(Self::Scientific),
            other => Err(format!("unknown calculator mode: '{other}'")),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Dark theme enabled
    pub dark_mode: bool,
    /// Maximum number of history entries kept
    pub history_limit: usize,
    /// Mode selected when a session starts
    pub default_mode: CalculatorMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            history_limit: HistoryCache::DEFAULT_LIMIT,
            default_mode: CalculatorMode::Basic,
        }
    }
}

impl Preferences {
    /// Sets the history limit
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Sets the default mode
    #[must_use]
    pub fn with_default_mode(mut self, mode: CalculatorMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Sets dark mode
    #[must_use]
    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }
}
