//! CalcuSolve CLI library
//!
//! Command-line front end for the calculator: one-shot button presses, an
//! interactive REPL, and history and preference management backed by a JSON
//! store.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod app;
mod commands;
mod config;
mod error;
pub mod logging;
mod output;

pub use app::{execute, App};
pub use commands::{Cli, ColorArg, Commands, HistoryArgs, ModeArg, PrefsAction, PrefsArgs, PressArgs};
pub use config::{CliConfig, ColorChoice, Storage, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
