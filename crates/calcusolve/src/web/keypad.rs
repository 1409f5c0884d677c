//! Keypad layouts and keyboard mapping for the web front end

use super::dom::{ids, DomElement, MockDom};
use crate::core::event::InputEvent;
use crate::core::scientific::{Constant, UnaryFunction};
use crate::core::BinaryOperator;
use crate::session::preferences::CalculatorMode;

/// A single keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// Event emitted when clicked
    pub event: InputEvent,
    /// DOM element ID
    pub id: String,
    /// Visible label
    pub label: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
}

impl KeypadButton {
    /// Creates a button with an ID and label derived from its event
    #[must_use]
    pub fn new(event: InputEvent, row: usize, col: usize) -> Self {
        Self {
            event,
            id: button_id(event),
            label: button_label(event),
            row,
            col,
        }
    }
}

/// Stable element ID for an event's button
#[must_use]
pub fn button_id(event: InputEvent) -> String {
    match event {
        InputEvent::Digit(d) => format!("btn-{d}"),
        InputEvent::DecimalPoint => "btn-decimal".into(),
        InputEvent::Operator(op) => match op {
            BinaryOperator::Add => "btn-plus",
            BinaryOperator::Subtract => "btn-minus",
            BinaryOperator::Multiply => "btn-times",
            BinaryOperator::Divide => "btn-divide",
        }
        .into(),
        InputEvent::Equals => "btn-equals".into(),
        InputEvent::Backspace => "btn-backspace".into(),
        InputEvent::Clear => "btn-clear".into(),
        InputEvent::ToggleSign => "btn-sign".into(),
        InputEvent::Percent => "btn-percent".into(),
        InputEvent::Function(f) => format!("btn-{}", f.symbol()),
        InputEvent::Constant(Constant::Pi) => "btn-pi".into(),
        InputEvent::Constant(Constant::E) => "btn-e".into(),
    }
}

fn button_label(event: InputEvent) -> String {
    match event {
        InputEvent::Operator(BinaryOperator::Multiply) => "×".into(),
        InputEvent::Operator(BinaryOperator::Divide) => "÷".into(),
        InputEvent::Backspace => "⌫".into(),
        InputEvent::ToggleSign => "±".into(),
        InputEvent::Function(f) => f.label().into(),
        InputEvent::Constant(c) => c.symbol().into(),
        other => other.token(),
    }
}

/// Keypad grid for one calculator mode.
///
/// Basic layout:
/// ```text
/// [ C ] [ % ] [ ± ] [ ÷ ]
/// [ 7 ] [ 8 ] [ 9 ] [ × ]
/// [ 4 ] [ 5 ] [ 6 ] [ - ]
/// [ 1 ] [ 2 ] [ 3 ] [ + ]
/// [ 0 ] [ . ] [ ⌫ ] [ = ]
/// ```
/// Scientific mode appends:
/// ```text
/// [ √ ] [ x²] [1/x] [|x|]
/// [ π ] [ e ] [log] [ ln]
/// ```
#[derive(Debug, Clone)]
pub struct Keypad {
    mode: CalculatorMode,
    buttons: Vec<KeypadButton>,
    rows: usize,
    cols: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::for_mode(CalculatorMode::Basic)
    }
}

impl Keypad {
    const COLS: usize = 4;

    /// Builds the keypad for `mode`
    #[must_use]
    pub fn for_mode(mode: CalculatorMode) -> Self {
        use crate::core::event::InputEvent::{
            Backspace, Clear, DecimalPoint, Digit, Equals, Operator, Percent, ToggleSign,
        };
        use crate::core::BinaryOperator::{Add, Divide, Multiply, Subtract};

        let mut grid = vec![
            [Clear, Percent, ToggleSign, Operator(Divide)],
            [Digit(7), Digit(8), Digit(9), Operator(Multiply)],
            [Digit(4), Digit(5), Digit(6), Operator(Subtract)],
            [Digit(1), Digit(2), Digit(3), Operator(Add)],
            [Digit(0), DecimalPoint, Backspace, Equals],
        ];
        if mode == CalculatorMode::Scientific {
            let [sqrt, sqr, recip, abs, log, ln] = UnaryFunction::ALL.map(InputEvent::Function);
            grid.push([sqrt, sqr, recip, abs]);
            grid.push([
                InputEvent::Constant(Constant::Pi),
                InputEvent::Constant(Constant::E),
                log,
                ln,
            ]);
        }

        let buttons = grid
            .iter()
            .enumerate()
            .flat_map(|(row, events)| {
                events
                    .iter()
                    .enumerate()
                    .map(move |(col, &event)| KeypadButton::new(event, row, col))
            })
            .collect();

        Self {
            mode,
            buttons,
            rows: grid.len(),
            cols: Self::COLS,
        }
    }

    /// Mode this keypad was built for
    #[must_use]
    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// Number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All buttons in row-major order
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButton] {
        &self.buttons
    }

    /// Button at a grid position
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButton> {
        if row < self.rows && col < self.cols {
            self.buttons.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Button with the given element ID
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Button emitting `event`, if this layout has one
    #[must_use]
    pub fn find_button_for(&self, event: InputEvent) -> Option<&KeypadButton> {
        self.buttons.iter().find(|b| b.event == event)
    }

    /// Event for a clicked element
    #[must_use]
    pub fn handle_click(&self, element_id: &str) -> Option<InputEvent> {
        self.find_button_by_id(element_id).map(|b| b.event)
    }

    /// Maps a keyboard key to an event
    #[must_use]
    pub fn key_to_event(key: &str) -> Option<InputEvent> {
        match key {
            "Enter" | "=" => Some(InputEvent::Equals),
            "Escape" | "c" | "C" => Some(InputEvent::Clear),
            "Backspace" => Some(InputEvent::Backspace),
            "." | "," => Some(InputEvent::DecimalPoint),
            "%" => Some(InputEvent::Percent),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch @ '0'..='9'), None) => Some(InputEvent::Digit(ch as u8 - b'0')),
                    (Some(ch), None) => BinaryOperator::from_char(ch).map(InputEvent::Operator),
                    _ => None,
                }
            }
        }
    }

    /// Replaces the keypad container's buttons in `dom`
    pub fn render(&self, dom: &mut MockDom) {
        dom.clear_children(ids::KEYPAD);
        for button in &self.buttons {
            let mut element = DomElement::new("button")
                .with_id(&button.id)
                .with_text(&button.label)
                .with_class("keypad-btn")
                .with_class(&format!("keypad-row-{}", button.row))
                .with_class(&format!("keypad-col-{}", button.col))
                .with_attr("data-event", &button.event.token());
            match button.event {
                InputEvent::Function(f) => {
                    element = element
                        .with_class(&format!("keypad-fn-{}", f.category().as_str()))
                        .with_attr("title", f.description());
                }
                InputEvent::Constant(c) => element = element.with_attr("title", c.description()),
                _ => {}
            }
            dom.append_child(ids::KEYPAD, element);
        }
    }
}
