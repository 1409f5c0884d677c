//! CalcuSolve - calculator engine, bounded history and expression evaluator
//!
//! The crate is layered:
//!
//! - [`core`]: synchronous, I/O free. The input state machine
//!   ([`CalculatorEngine`](core::engine::CalculatorEngine)), the expression
//!   evaluator, scientific functions and the bounded history cache.
//! - [`session`]: one user's calculator. Wires the engine to history,
//!   preferences, notifications and optional async stores.
//! - [`web`]: a DOM-backed front end over a session.
//! - [`driver`]: behavioral checks written once and run against every
//!   front end.
//!
//! # Example
//!
//! ```rust
//! use calcusolve::prelude::*;
//!
//! let mut engine = CalculatorEngine::new();
//! for event in ["5", "+", "3", "*", "2", "="] {
//!     engine.apply(event.parse().unwrap()).unwrap();
//! }
//! assert_eq!(engine.display(), "16");
//!
//! // The evaluator on its own
//! let result = Evaluator::new().evaluate_str("42 * -2").unwrap();
//! assert_eq!(result, -84.0);
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod driver;
pub mod session;
pub mod web;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::engine::{CalculatorEngine, CalculatorState, EngineError, EngineResult};
    pub use crate::core::evaluator::{Evaluator, ExpressionEvaluator};
    pub use crate::core::event::InputEvent;
    pub use crate::core::format::format_number;
    pub use crate::core::history::{HistoryCache, HistoryEntry};
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::scientific::{Constant, UnaryFunction};
    pub use crate::core::{BinaryOperator, CalcError, CalcResult, DomainError};
    pub use crate::driver::{CalculatorDriver, HistoryItem, SessionDriver};
    pub use crate::session::clipboard::{Clipboard, MemoryClipboard};
    pub use crate::session::notification::{Notification, NotificationReceiver, Severity};
    pub use crate::session::preferences::{CalculatorMode, Preferences};
    pub use crate::session::store::{
        HistoryStore, JsonFileStore, MemoryStore, PreferenceStore, StoreError,
    };
    pub use crate::session::Session;
    pub use crate::web::{DomElement, DomEvent, MockDom, WebCalculator, WebDriver};
}
