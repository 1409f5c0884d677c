//! Input events accepted by the calculator engine

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::scientific::{Constant, UnaryFunction};
use crate::core::BinaryOperator;

/// A single button press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// Digit 0-9
    Digit(u8),
    /// Decimal point
    DecimalPoint,
    /// Binary operator
    Operator(BinaryOperator),
    /// Complete the pending calculation
    Equals,
    /// Remove the last typed character
    Backspace,
    /// Reset the calculator state
    Clear,
    /// Negate the display value
    ToggleSign,
    /// Divide the display value by 100
    Percent,
    /// Scientific function
    Function(UnaryFunction),
    /// Mathematical constant
    Constant(Constant),
}

impl InputEvent {
    /// Returns the canonical text token for this event
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::DecimalPoint => ".".into(),
            Self::Operator(op) => op.symbol().into(),
            Self::Equals => "=".into(),
            Self::Backspace => "back".into(),
            Self::Clear => "C".into(),
            Self::ToggleSign => "neg".into(),
            Self::Percent => "%".into(),
            Self::Function(f) => f.symbol().into(),
            Self::Constant(Constant::Pi) => "pi".into(),
            Self::Constant(Constant::E) => "e".into(),
        }
    }

    /// Returns true for events only exposed by the scientific keypad
    #[must_use]
    pub const fn is_scientific(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Constant(_))
    }
}

impl std::fmt::Display for InputEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}

/// Token that does not name any input event
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown input token: '{0}'")]
pub struct UnknownToken(pub String);

impl FromStr for InputEvent {
    type Err = UnknownToken;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let event = match token {
            "." => Self::DecimalPoint,
            "=" => Self::Equals,
            "back" | "bs" | "⌫" => Self::Backspace,
            "C" | "c" | "clear" => Self::Clear,
            "neg" | "±" | "+/-" => Self::ToggleSign,
            "%" => Self::Percent,
            "pi" | "π" => Self::Constant(Constant::Pi),
            "e" => Self::Constant(Constant::E),
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch @ '0'..='9'), None) => Self::Digit(ch as u8 - b'0'),
                    (Some(ch), None) => BinaryOperator::from_char(ch)
                        .map(Self::Operator)
                        .ok_or_else(|| UnknownToken(token.to_string()))?,
                    _ => UnaryFunction::from_symbol(token)
                        .map(Self::Function)
                        .ok_or_else(|| UnknownToken(token.to_string()))?,
                }
            }
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits() {
        for d in 0..=9u8 {
            assert_eq!(d.to_string().parse::<InputEvent>(), Ok(InputEvent::Digit(d)));
        }
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!(
            "*".parse::<InputEvent>(),
            Ok(InputEvent::Operator(BinaryOperator::Multiply))
        );
        assert_eq!(
            "-".parse::<InputEvent>(),
            Ok(InputEvent::Operator(BinaryOperator::Subtract))
        );
    }

    #[test]
    fn test_parse_named_tokens() {
        assert_eq!("=".parse(), Ok(InputEvent::Equals));
        assert_eq!("clear".parse(), Ok(InputEvent::Clear));
        assert_eq!("back".parse(), Ok(InputEvent::Backspace));
        assert_eq!("neg".parse(), Ok(InputEvent::ToggleSign));
        assert_eq!("%".parse(), Ok(InputEvent::Percent));
        assert_eq!("pi".parse(), Ok(InputEvent::Constant(Constant::Pi)));
        assert_eq!(
            "sqrt".parse(),
            Ok(InputEvent::Function(UnaryFunction::SquareRoot))
        );
        assert_eq!("ln".parse(), Ok(InputEvent::Function(UnaryFunction::NaturalLog)));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "42".parse::<InputEvent>(),
            Err(UnknownToken("42".into()))
        );
        assert!("cos".parse::<InputEvent>().is_err());
        assert!("".parse::<InputEvent>().is_err());
    }

    #[test]
    fn test_token_parses_back() {
        let events = [
            InputEvent::Digit(7),
            InputEvent::DecimalPoint,
            InputEvent::Operator(BinaryOperator::Divide),
            InputEvent::Equals,
            InputEvent::Backspace,
            InputEvent::Clear,
            InputEvent::ToggleSign,
            InputEvent::Percent,
            InputEvent::Function(UnaryFunction::Reciprocal),
            InputEvent::Constant(Constant::E),
        ];
        for event in events {
            assert_eq!(event.token().parse::<InputEvent>(), Ok(event));
        }
    }

    #[test]
    fn test_is_scientific() {
        assert!(InputEvent::Function(UnaryFunction::Square).is_scientific());
        assert!(InputEvent::Constant(Constant::Pi).is_scientific());
        assert!(!InputEvent::Percent.is_scientific());
    }
}
