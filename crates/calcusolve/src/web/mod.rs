//! Web front end for the calculator.
//!
//! Renders a [`Session`](crate::session::Session) into a DOM and routes
//! clicks and key presses back into it. The DOM is a mock, so the whole
//! page can be exercised in plain unit tests.

mod calculator;
mod dom;
mod driver;
mod keypad;

pub use calculator::{WebCalculator, MAX_TOASTS};
pub use dom::{ids, DomElement, DomEvent, MockDom};
pub use driver::WebDriver;
pub use keypad::{button_id, Keypad, KeypadButton};
