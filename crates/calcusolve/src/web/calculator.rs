//! Web calculator: a session bound to a DOM

use tracing::debug;

use super::dom::{ids, DomElement, DomEvent, MockDom};
use super::keypad::Keypad;
use crate::core::event::InputEvent;
use crate::session::clipboard::{Clipboard, MemoryClipboard};
use crate::session::notification::{self, Notification, NotificationReceiver};
use crate::session::preferences::{CalculatorMode, Preferences};
use crate::session::Session;

/// Toasts kept until [`WebCalculator::take_toasts`] drains them; older ones
/// are dropped first
pub const MAX_TOASTS: usize = 16;

/// Web front end: routes DOM events into a [`Session`] and re-renders
#[derive(Debug)]
pub struct WebCalculator {
    session: Session,
    notifications: NotificationReceiver,
    keypad: Keypad,
    dom: MockDom,
    clipboard: Box<dyn Clipboard>,
    toasts: Vec<Notification>,
}

impl Default for WebCalculator {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl WebCalculator {
    /// Creates a calculator page for a fresh session
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        let (session, notifications) = Session::new(preferences);
        Self::with_session(session, notifications)
    }

    /// Wraps an existing session
    #[must_use]
    pub fn with_session(session: Session, notifications: NotificationReceiver) -> Self {
        let mut calculator = Self {
            keypad: Keypad::for_mode(session.mode()),
            session,
            notifications,
            dom: MockDom::calculator(),
            clipboard: Box::new(MemoryClipboard::new()),
            toasts: Vec::new(),
        };
        calculator.keypad.render(&mut calculator.dom);
        calculator.render();
        calculator
    }

    /// Replaces the clipboard used by the copy button
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Underlying session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the session
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Rendered DOM
    #[must_use]
    pub fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Current keypad
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Recent notifications, at most [`MAX_TOASTS`], oldest first
    #[must_use]
    pub fn toasts(&self) -> &[Notification] {
        &self.toasts
    }

    /// Removes and returns the shown notifications
    pub fn take_toasts(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.toasts)
    }

    /// Handles a DOM event. Returns false when nothing reacts to it.
    pub fn dispatch(&mut self, event: DomEvent) -> bool {
        self.dom.dispatch_event(event.clone());
        let handled = match &event {
            DomEvent::Click { element_id } => self.click(element_id),
            DomEvent::KeyPress { key } => match Keypad::key_to_event(key) {
                Some(input) => {
                    self.session.handle(input);
                    true
                }
                None => false,
            },
        };
        if handled {
            self.render();
        } else {
            debug!(?event, "unhandled DOM event");
        }
        handled
    }

    /// Presses the keypad button for `input`, switching to scientific mode
    /// when the basic keypad lacks it
    pub fn press(&mut self, input: InputEvent) -> bool {
        if self.keypad.find_button_for(input).is_none()
            && input.is_scientific()
            && self.session.mode() == CalculatorMode::Basic
        {
            self.dispatch(DomEvent::click(ids::MODE_TOGGLE));
        }
        match self.keypad.find_button_for(input) {
            Some(button) => {
                let id = button.id.clone();
                self.dispatch(DomEvent::click(&id))
            }
            None => false,
        }
    }

    fn click(&mut self, element_id: &str) -> bool {
        if let Some(input) = self.keypad.handle_click(element_id) {
            self.session.handle(input);
            return true;
        }

        match element_id {
            ids::COPY => {
                self.session.copy_display(self.clipboard.as_mut());
            }
            ids::CLEAR_HISTORY => self.session.clear_history(),
            ids::THEME => {
                self.session.toggle_dark_mode();
            }
            ids::MODE_TOGGLE => {
                let next = match self.session.mode() {
                    CalculatorMode::Basic => CalculatorMode::Scientific,
                    CalculatorMode::Scientific => CalculatorMode::Basic,
                };
                self.session.set_mode(next);
                self.keypad = Keypad::for_mode(next);
                self.keypad.render(&mut self.dom);
            }
            other => {
                let Some(index) = other
                    .strip_prefix("history-")
                    .and_then(|i| i.parse::<usize>().ok())
                else {
                    return false;
                };
                if self.session.recall(index).is_err() {
                    return false;
                }
            }
        }
        true
    }

    /// Synchronizes the DOM with the session
    fn render(&mut self) {
        self.toasts
            .extend(notification::drain(&mut self.notifications));
        let overflow = self.toasts.len().saturating_sub(MAX_TOASTS);
        self.toasts.drain(..overflow);

        let display = self.session.display().to_string();
        self.dom.set_element_text(ids::DISPLAY, &display);
        self.dom
            .set_element_text(ids::MODE, self.session.mode().as_str());

        let toast = self.toasts.last().map(Notification::message).unwrap_or_default();
        self.dom.set_element_text(ids::TOAST, &toast);

        let dark_mode = self.session.preferences().dark_mode;
        if let Some(root) = self.dom.get_element_mut(ids::ROOT) {
            if dark_mode {
                root.add_class("dark");
            } else {
                root.remove_class("dark");
            }
        }

        let rows: Vec<_> = self
            .session
            .history()
            .list()
            .enumerate()
            .map(|(index, entry)| {
                DomElement::new("li")
                    .with_id(&ids::history_item(index))
                    .with_class("history-entry")
                    .with_text(&entry.display())
                    .with_attr("data-result", &entry.result)
                    .with_attr("data-time", &entry.timestamp.format("%H:%M:%S").to_string())
            })
            .collect();
        self.dom.clear_children(ids::HISTORY);
        for row in rows {
            self.dom.append_child(ids::HISTORY, row);
        }
    }

    /// Display text as rendered
    #[must_use]
    pub fn rendered_display(&self) -> &str {
        self.dom.get_element_text(ids::DISPLAY).unwrap_or_default()
    }

    /// History rows as rendered, newest first
    #[must_use]
    pub fn rendered_history(&self) -> Vec<&DomElement> {
        self.dom
            .get_element(ids::HISTORY)
            .map(|list| {
                list.children
                    .iter()
                    .filter_map(|row| self.dom.get_element(&row.id))
                    .collect()
            })
            .unwrap_or_default()
    }
}
