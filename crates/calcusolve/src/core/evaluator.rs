//! Expression evaluation.
//!
//! The engine only depends on [`ExpressionEvaluator`]; [`Evaluator`] is the
//! built-in implementation that walks the AST produced by
//! [`Parser`](crate::core::parser::Parser).

use crate::core::parser::{AstNode, Parser};
use crate::core::{Arithmetic, CalcResult};

/// Evaluates a textual infix expression to a finite number
pub trait ExpressionEvaluator: std::fmt::Debug {
    /// Evaluates `expression`, failing on malformed input, division by zero
    /// or a non-finite result
    fn evaluate(&mut self, expression: &str) -> CalcResult<f64>;
}

/// AST-walking evaluator
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Creates a new evaluator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates an AST node
    pub fn evaluate_ast(&self, node: &AstNode) -> CalcResult<f64> {
        match node {
            AstNode::Number(n) => Arithmetic::check_finite(*n),
            AstNode::Negate(inner) => Ok(-self.evaluate_ast(inner)?),
            AstNode::BinaryOp { left, op, right } => {
                let left_val = self.evaluate_ast(left)?;
                let right_val = self.evaluate_ast(right)?;
                Arithmetic::apply(left_val, right_val, *op)
            }
        }
    }

    /// Parses and evaluates a string expression
    pub fn evaluate_str(&self, input: &str) -> CalcResult<f64> {
        let ast = Parser::parse_str(input)?;
        self.evaluate_ast(&ast)
    }
}

impl ExpressionEvaluator for Evaluator {
    fn evaluate(&mut self, expression: &str) -> CalcResult<f64> {
        self.evaluate_str(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BinaryOperator, CalcError};

    // ===== AST evaluation tests =====

    #[test]
    fn test_evaluate_number() {
        assert_eq!(Evaluator::new().evaluate_ast(&AstNode::number(42.0)), Ok(42.0));
    }

    #[test]
    fn test_evaluate_double_negative() {
        let ast = AstNode::negate(AstNode::negate(AstNode::number(5.0)));
        assert_eq!(Evaluator::new().evaluate_ast(&ast), Ok(5.0));
    }

    #[test]
    fn test_evaluate_binary_node() {
        let ast = AstNode::binary(
            AstNode::number(7.0),
            BinaryOperator::Subtract,
            AstNode::number(10.0),
        );
        assert_eq!(Evaluator::new().evaluate_ast(&ast), Ok(-3.0));
    }

    #[test]
    fn test_evaluate_literal_overflow() {
        // 1e400 parses to infinity
        assert_eq!(Evaluator::new().evaluate_str("1e400"), Err(CalcError::Overflow));
    }

    // ===== String evaluation tests =====

    #[test]
    fn test_evaluate_str_chained_expressions() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate("5 + 3"), Ok(8.0));
        assert_eq!(eval.evaluate("8 * 2"), Ok(16.0));
        assert_eq!(eval.evaluate("10 / 4"), Ok(2.5));
        assert_eq!(eval.evaluate("2 - 5"), Ok(-3.0));
    }

    #[test]
    fn test_evaluate_str_negative_operand() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate("-5 * -2"), Ok(10.0));
        assert_eq!(eval.evaluate("3 - -4"), Ok(7.0));
    }

    #[test]
    fn test_evaluate_str_floating_point() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate("0.1 + 0.2"), Ok(0.1 + 0.2));
    }

    #[test]
    fn test_evaluate_str_division_by_zero() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate("5 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(eval.evaluate("0 / 0"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_evaluate_str_overflow() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate("1e308 * 10"), Err(CalcError::Overflow));
    }

    #[test]
    fn test_evaluate_str_errors() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate(""), Err(CalcError::EmptyExpression));
        assert!(matches!(eval.evaluate("5 +"), Err(CalcError::ParseError(_))));
    }

    #[test]
    fn test_evaluator_as_trait_object() {
        let mut eval: Box<dyn ExpressionEvaluator> = Box::new(Evaluator::new());
        assert_eq!(eval.evaluate("(1 + 2) * 3"), Ok(9.0));
    }
}
