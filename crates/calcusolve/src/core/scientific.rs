//! Static catalog of scientific functions and constants.

use serde::{Deserialize, Serialize};

use crate::core::DomainError;

/// Grouping used when listing functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionCategory {
    /// Roots
    Root,
    /// Powers
    Power,
    /// Plain arithmetic transforms
    Arithmetic,
    /// Logarithms
    Logarithm,
}

impl FunctionCategory {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Power => "power",
            Self::Arithmetic => "arithmetic",
            Self::Logarithm => "logarithm",
        }
    }
}

/// A single-argument function applied to the display value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFunction {
    /// √x
    SquareRoot,
    /// x²
    Square,
    /// 1/x
    Reciprocal,
    /// |x|
    AbsoluteValue,
    /// Base-10 logarithm
    Log10,
    /// Natural logarithm
    NaturalLog,
}

impl UnaryFunction {
    /// Every function, in keypad order
    pub const ALL: [Self; 6] = [
        Self::SquareRoot,
        Self::Square,
        Self::Reciprocal,
        Self::AbsoluteValue,
        Self::Log10,
        Self::NaturalLog,
    ];

    /// Symbol used in history expressions, e.g. `sqrt(9)`
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::SquareRoot => "sqrt",
            Self::Square => "sqr",
            Self::Reciprocal => "recip",
            Self::AbsoluteValue => "abs",
            Self::Log10 => "log",
            Self::NaturalLog => "ln",
        }
    }

    /// Keypad label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SquareRoot => "√",
            Self::Square => "x²",
            Self::Reciprocal => "1/x",
            Self::AbsoluteValue => "|x|",
            Self::Log10 => "log",
            Self::NaturalLog => "ln",
        }
    }

    /// Human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SquareRoot => "Square root",
            Self::Square => "Square",
            Self::Reciprocal => "Reciprocal",
            Self::AbsoluteValue => "Absolute value",
            Self::Log10 => "Logarithm base 10",
            Self::NaturalLog => "Natural logarithm",
        }
    }

    /// Catalog category
    #[must_use]
    pub const fn category(&self) -> FunctionCategory {
        match self {
            Self::SquareRoot => FunctionCategory::Root,
            Self::Square => FunctionCategory::Power,
            Self::Reciprocal | Self::AbsoluteValue => FunctionCategory::Arithmetic,
            Self::Log10 | Self::NaturalLog => FunctionCategory::Logarithm,
        }
    }

    /// Looks a function up by its history symbol
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.symbol() == symbol)
    }

    /// Applies the function, rejecting inputs outside its domain and
    /// non-finite results
    pub fn apply(&self, x: f64) -> Result<f64, DomainError> {
        let result = match self {
            Self::SquareRoot => {
                if x < 0.0 {
                    return Err(DomainError::NegativeSquareRoot);
                }
                x.sqrt()
            }
            Self::Square => x * x,
            Self::Reciprocal => {
                if x == 0.0 {
                    return Err(DomainError::ZeroReciprocal);
                }
                1.0 / x
            }
            Self::AbsoluteValue => x.abs(),
            Self::Log10 | Self::NaturalLog => {
                if x <= 0.0 {
                    return Err(DomainError::NonPositiveLogarithm {
                        function: self.symbol(),
                        message: self.domain_message(),
                    });
                }
                if matches!(self, Self::Log10) {
                    x.log10()
                } else {
                    x.ln()
                }
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(DomainError::NonFinite {
                function: self.symbol(),
            })
        }
    }

    /// Message shown when the input is outside the domain
    #[must_use]
    pub const fn domain_message(&self) -> &'static str {
        match self {
            Self::SquareRoot => "Cannot calculate square root of negative number",
            Self::Reciprocal => "Cannot divide by zero",
            Self::Log10 => "Invalid input for logarithm",
            Self::NaturalLog => "Invalid input for natural logarithm",
            Self::Square | Self::AbsoluteValue => "Result is not a finite number",
        }
    }
}

impl std::fmt::Display for UnaryFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Mathematical constants that can be placed on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
}

impl Constant {
    /// Both constants
    pub const ALL: [Self; 2] = [Self::Pi, Self::E];

    /// Numeric value
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    /// Keypad symbol
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Pi => "π",
            Self::E => "e",
        }
    }

    /// Human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Pi => "Ratio of a circle's circumference to its diameter",
            Self::E => "Base of the natural logarithm",
        }
    }
}
