//! [`CalculatorDriver`] over the DOM-backed front end

use super::calculator::WebCalculator;
use crate::core::event::InputEvent;
use crate::driver::{CalculatorDriver, HistoryItem};
use crate::session::preferences::Preferences;

/// Drives a [`WebCalculator`] through button clicks only
#[derive(Debug, Default)]
pub struct WebDriver {
    calculator: WebCalculator,
}

impl WebDriver {
    /// Creates a driver over a fresh page
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        Self {
            calculator: WebCalculator::new(preferences),
        }
    }

    /// Underlying page
    #[must_use]
    pub fn calculator(&self) -> &WebCalculator {
        &self.calculator
    }
}

impl CalculatorDriver for WebDriver {
    fn press(&mut self, event: InputEvent) {
        assert!(
            self.calculator.press(event),
            "no button for {event} on the keypad"
        );
    }

    fn display(&self) -> String {
        self.calculator.rendered_display().to_string()
    }

    fn history(&self) -> Vec<HistoryItem> {
        self.calculator
            .rendered_history()
            .into_iter()
            .filter_map(|row| {
                let result = row.get_attr("data-result")?;
                let expression = row
                    .text_content
                    .strip_suffix(result)?
                    .strip_suffix(" = ")?;
                Some(HistoryItem {
                    expression: expression.to_string(),
                    result: result.to_string(),
                })
            })
            .collect()
    }

    fn take_messages(&mut self) -> Vec<String> {
        self.calculator
            .take_toasts()
            .iter()
            .map(|n| n.message())
            .collect()
    }
}
