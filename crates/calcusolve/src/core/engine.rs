//! Calculator state machine.
//!
//! [`CalculatorEngine`] turns button presses into a running calculation.
//! Each completed calculation yields a [`HistoryEntry`]; the engine never
//! stores history itself.
//!
//! Chained operators evaluate left to right as they are entered, so
//! `5 + 3 * 2 =` shows `16`, not `11`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::evaluator::{Evaluator, ExpressionEvaluator};
use crate::core::event::InputEvent;
use crate::core::format::{format_number, parse_numeral};
use crate::core::history::HistoryEntry;
use crate::core::scientific::{Constant, UnaryFunction};
use crate::core::{BinaryOperator, CalcError, DomainError};

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine operation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The pending calculation could not be evaluated; the state was reset
    #[error("Invalid calculation: {0}")]
    Evaluation(#[from] CalcError),
    /// A scientific function was used outside its domain; the state is unchanged
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The input was rejected; the state is unchanged
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// True when the error reset the calculator
    #[must_use]
    pub const fn resets_state(&self) -> bool {
        matches!(self, Self::Evaluation(_))
    }
}

/// Everything the display and keypad depend on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Text currently shown
    pub display: String,
    /// Left operand of the pending calculation
    pub stored_operand: Option<f64>,
    /// Operator of the pending calculation
    pub pending_operator: Option<BinaryOperator>,
    /// The next digit replaces the display instead of extending it
    pub awaiting_new_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            stored_operand: None,
            pending_operator: None,
            awaiting_new_operand: false,
        }
    }
}

impl CalculatorState {
    /// Numeric value of the display.
    ///
    /// Every edit keeps the display a finite numeral, so the `0` fallback
    /// only covers states built by hand.
    #[must_use]
    pub fn display_value(&self) -> f64 {
        parse_numeral(&self.display).unwrap_or(0.0)
    }
}

/// Calculator state machine
#[derive(Debug)]
pub struct CalculatorEngine<E: ExpressionEvaluator = Evaluator> {
    state: CalculatorState,
    evaluator: E,
}

impl Default for CalculatorEngine<Evaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorEngine<Evaluator> {
    /// Creates a cleared engine using the built-in evaluator
    #[must_use]
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::new())
    }
}

impl<E: ExpressionEvaluator> CalculatorEngine<E> {
    /// Creates a cleared engine using a custom evaluator
    #[must_use]
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            state: CalculatorState::default(),
            evaluator,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Current display text
    #[must_use]
    pub fn display(&self) -> &str {
        &self.state.display
    }

    /// Dispatches a single input event
    pub fn apply(&mut self, event: InputEvent) -> EngineResult<Option<HistoryEntry>> {
        debug!(%event, display = %self.state.display, "engine input");
        match event {
            InputEvent::Digit(d) => self.input_digit(d).map(|()| None),
            InputEvent::DecimalPoint => {
                self.input_decimal_point();
                Ok(None)
            }
            InputEvent::Operator(op) => self.perform_operation(op),
            InputEvent::Equals => self.equals(),
            InputEvent::Backspace => {
                self.backspace();
                Ok(None)
            }
            InputEvent::Clear => {
                self.clear();
                Ok(None)
            }
            InputEvent::ToggleSign => {
                self.toggle_sign();
                Ok(None)
            }
            InputEvent::Percent => {
                self.percent();
                Ok(None)
            }
            InputEvent::Function(f) => self.apply_function(f).map(Some),
            InputEvent::Constant(c) => {
                self.insert_constant(c);
                Ok(None)
            }
        }
    }

    /// Resets to `0` with nothing pending
    pub fn clear(&mut self) {
        self.state = CalculatorState::default();
    }

    /// Types a digit
    pub fn input_digit(&mut self, digit: u8) -> EngineResult<()> {
        if digit > 9 {
            return Err(EngineError::InvalidInput(format!("not a digit: {digit}")));
        }
        let ch = char::from(b'0' + digit);

        if self.state.awaiting_new_operand {
            self.state.display = ch.to_string();
            self.state.awaiting_new_operand = false;
        } else if self.state.display == "0" {
            self.state.display = ch.to_string();
        } else {
            let mut candidate = self.state.display.clone();
            candidate.push(ch);
            if parse_numeral(&candidate).is_none() {
                return Err(EngineError::InvalidInput(format!(
                    "number too large: {candidate}"
                )));
            }
            self.state.display = candidate;
        }
        Ok(())
    }

    /// Types a decimal point.
    ///
    /// A second point in the same operand is ignored, as is a point after an
    /// exponent (`1e+21`).
    pub fn input_decimal_point(&mut self) {
        if self.state.awaiting_new_operand {
            self.state.display = "0.".to_string();
            self.state.awaiting_new_operand = false;
        } else if !self.state.display.contains(['.', 'e']) {
            self.state.display.push('.');
        }
    }

    /// Presses a binary operator, completing any pending calculation first
    pub fn perform_operation(&mut self, op: BinaryOperator) -> EngineResult<Option<HistoryEntry>> {
        let input = self.state.display_value();
        let mut entry = None;

        match (self.state.stored_operand, self.state.pending_operator) {
            (None, _) => self.state.stored_operand = Some(input),
            (Some(stored), Some(pending)) => {
                let (result, completed) = self.evaluate_pending(stored, pending, input)?;
                self.state.display = format_number(result);
                self.state.stored_operand = Some(result);
                entry = Some(completed);
            }
            (Some(_), None) => {}
        }

        self.state.pending_operator = Some(op);
        self.state.awaiting_new_operand = true;
        Ok(entry)
    }

    /// Completes the pending calculation
    pub fn equals(&mut self) -> EngineResult<Option<HistoryEntry>> {
        let Some(stored) = self.state.stored_operand else {
            return Ok(None);
        };
        let Some(pending) = self.state.pending_operator else {
            return Ok(None);
        };

        let input = self.state.display_value();
        let (result, entry) = self.evaluate_pending(stored, pending, input)?;
        self.state.display = format_number(result);
        self.state.stored_operand = None;
        self.state.pending_operator = None;
        self.state.awaiting_new_operand = true;
        Ok(Some(entry))
    }

    /// Removes the last typed character
    pub fn backspace(&mut self) {
        if self.state.awaiting_new_operand {
            return;
        }
        let display = &mut self.state.display;
        display.pop();
        // Drop dangling exponent or sign characters
        while !display.is_empty() && parse_numeral(display).is_none() {
            display.pop();
        }
        if display.is_empty() {
            *display = "0".to_string();
        }
    }

    /// Negates the display value
    pub fn toggle_sign(&mut self) {
        self.state.display = format_number(-self.state.display_value());
    }

    /// Divides the display value by 100
    pub fn percent(&mut self) {
        self.state.display = format_number(self.state.display_value() / 100.0);
    }

    /// Applies a scientific function to the display value.
    ///
    /// Domain errors leave the state untouched.
    pub fn apply_function(&mut self, function: UnaryFunction) -> EngineResult<HistoryEntry> {
        let input = self.state.display_value();
        let result = function.apply(input)?;
        let rendered = format_number(result);
        let entry = HistoryEntry::new(
            format!("{}({})", function.symbol(), format_number(input)),
            rendered.clone(),
        );
        self.state.display = rendered;
        Ok(entry)
    }

    /// √x
    pub fn square_root(&mut self) -> EngineResult<HistoryEntry> {
        self.apply_function(UnaryFunction::SquareRoot)
    }

    /// x²
    pub fn square(&mut self) -> EngineResult<HistoryEntry> {
        self.apply_function(UnaryFunction::Square)
    }

    /// 1/x
    pub fn reciprocal(&mut self) -> EngineResult<HistoryEntry> {
        self.apply_function(UnaryFunction::Reciprocal)
    }

    /// |x|
    pub fn absolute_value(&mut self) -> EngineResult<HistoryEntry> {
        self.apply_function(UnaryFunction::AbsoluteValue)
    }

    /// log₁₀ x
    pub fn log10(&mut self) -> EngineResult<HistoryEntry> {
        self.apply_function(UnaryFunction::Log10)
    }

    /// ln x
    pub fn natural_log(&mut self) -> EngineResult<HistoryEntry> {
        self.apply_function(UnaryFunction::NaturalLog)
    }

    /// Puts a constant on the display
    pub fn insert_constant(&mut self, constant: Constant) {
        self.state.display = format_number(constant.value());
    }

    /// Loads a previous result back onto the display
    pub fn recall(&mut self, result: &str) -> EngineResult<()> {
        let value = parse_numeral(result)
            .ok_or_else(|| EngineError::InvalidInput(format!("not a number: '{result}'")))?;
        self.state.display = format_number(value);
        self.state.awaiting_new_operand = false;
        Ok(())
    }

    /// Evaluates `stored pending input`. On failure the state is cleared.
    fn evaluate_pending(
        &mut self,
        stored: f64,
        pending: BinaryOperator,
        input: f64,
    ) -> EngineResult<(f64, HistoryEntry)> {
        let expression = format!(
            "{} {} {}",
            format_number(stored),
            pending.symbol(),
            format_number(input)
        );

        match self.evaluator.evaluate(&expression) {
            Ok(result) => {
                debug!(%expression, result, "calculation completed");
                let entry = HistoryEntry::new(expression, format_number(result));
                Ok((result, entry))
            }
            Err(err) => {
                debug!(%expression, error = %err, "calculation failed, resetting");
                self.clear();
                Err(EngineError::Evaluation(err))
            }
        }
    }
}
