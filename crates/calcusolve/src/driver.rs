//! Unified calculator driver.
//!
//! Behavioral checks are written once against [`CalculatorDriver`]
//! and run against every front end: the bare [`SessionDriver`] and the
//! DOM-backed [`WebDriver`](crate::web::WebDriver).

use crate::core::event::InputEvent;
use crate::session::notification::{self, NotificationReceiver};
use crate::session::preferences::Preferences;
use crate::session::Session;

/// Front-end independent calculator interactions
pub trait CalculatorDriver {
    /// Presses one button
    fn press(&mut self, event: InputEvent);

    /// Current display text
    fn display(&self) -> String;

    /// History entries, newest first
    fn history(&self) -> Vec<HistoryItem>;

    /// Drains notification messages shown since the last call
    fn take_messages(&mut self) -> Vec<String>;

    /// Presses the buttons named by whitespace-separated tokens
    fn press_tokens(&mut self, tokens: &str) {
        for token in tokens.split_whitespace() {
            match token.parse::<InputEvent>() {
                Ok(event) => self.press(event),
                Err(err) => panic!("{err}"),
            }
        }
    }

    /// Resets the calculator
    fn clear(&mut self) {
        self.press(InputEvent::Clear);
    }
}

/// A history row as presented by a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// The expression that was evaluated
    pub expression: String,
    /// The rendered result
    pub result: String,
}

/// Driver operating directly on a [`Session`]
#[derive(Debug)]
pub struct SessionDriver {
    session: Session,
    notifications: NotificationReceiver,
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl SessionDriver {
    /// Creates a driver over a fresh session
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        let (session, notifications) = Session::new(preferences);
        Self {
            session,
            notifications,
        }
    }

    /// Underlying session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the underlying session
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl CalculatorDriver for SessionDriver {
    fn press(&mut self, event: InputEvent) {
        self.session.handle(event);
    }

    fn display(&self) -> String {
        self.session.display().to_string()
    }

    fn history(&self) -> Vec<HistoryItem> {
        self.session
            .history()
            .list()
            .map(|entry| HistoryItem {
                expression: entry.expression.clone(),
                result: entry.result.clone(),
            })
            .collect()
    }

    fn take_messages(&mut self) -> Vec<String> {
        notification::drain(&mut self.notifications)
            .iter()
            .map(|n| n.message())
            .collect()
    }
}

// ===== Shared behaviors =====
// Each runs against any CalculatorDriver

/// Chained operators evaluate left to right as entered
pub fn verify_chained_operations<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_tokens("5 + 3 * 2 =");
    assert_eq!(driver.display(), "16");

    let history = driver.history();
    assert_eq!(history[0].expression, "8 * 2");
    assert_eq!(history[0].result, "16");
    assert_eq!(history[1].expression, "5 + 3");
    assert_eq!(history[1].result, "8");
}

/// Decimal entry allows one point per operand
pub fn verify_decimal_entry<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_tokens("1 . 2 . 5");
    assert_eq!(driver.display(), "1.25");
    assert_eq!(driver.display().matches('.').count(), 1);

    driver.press_tokens("+ . 7 5 =");
    assert_eq!(driver.display(), "2");
}

/// Backspace, sign toggle and percent edit the current operand
pub fn verify_editing<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_tokens("1 2 back");
    assert_eq!(driver.display(), "1");
    driver.press_tokens("back back");
    assert_eq!(driver.display(), "0");

    driver.press_tokens("7 neg");
    assert_eq!(driver.display(), "-7");
    driver.press_tokens("neg");
    assert_eq!(driver.display(), "7");

    driver.press_tokens("C 5 0 %");
    assert_eq!(driver.display(), "0.5");
}

/// A failed calculation resets and reports "Invalid calculation"
pub fn verify_evaluation_error_resets<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.take_messages();
    driver.press_tokens("9 / 0 =");
    assert_eq!(driver.display(), "0");
    assert_eq!(driver.take_messages(), vec!["Invalid calculation".to_string()]);
}

/// Domain errors report a message and leave the display alone
pub fn verify_domain_errors<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.take_messages();
    driver.press_tokens("4 neg sqrt");
    assert_eq!(driver.display(), "-4");
    assert_eq!(
        driver.take_messages(),
        vec!["Cannot calculate square root of negative number".to_string()]
    );

    driver.press_tokens("C recip");
    assert_eq!(driver.display(), "0");
    assert_eq!(driver.take_messages(), vec!["Cannot divide by zero".to_string()]);

    driver.press_tokens("9 sqrt");
    assert_eq!(driver.display(), "3");
    assert_eq!(driver.history()[0].expression, "sqrt(9)");
}

/// History is newest first
pub fn verify_history_order<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_tokens("1 + 1 = C 2 + 2 = C 3 + 3 =");

    let history = driver.history();
    assert!(history.len() >= 3);
    assert_eq!(history[0].expression, "3 + 3");
    assert_eq!(history[0].result, "6");
    assert_eq!(history[2].expression, "1 + 1");
}

/// Runs every shared behavior
pub fn run_all_behaviors<D: CalculatorDriver>(driver: &mut D) {
    verify_chained_operations(driver);
    verify_decimal_entry(driver);
    verify_editing(driver);
    verify_evaluation_error_resets(driver);
    verify_domain_errors(driver);
    verify_history_order(driver);
}
