//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CalcuSolve: calculator with a persistent history
#[derive(Parser, Debug)]
#[command(name = "calcusolve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Directory holding history.json and preferences.json
    #[arg(long, env = "CALCUSOLVE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is read or written
    #[arg(long, global = true)]
    pub offline: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Press a sequence of buttons and print the display
    ///
    /// Tokens: digits, `.`, `+ - * /`, `=`, `C`, `back`, `neg`, `%`,
    /// `sqrt`, `sqr`, `recip`, `abs`, `log`, `ln`, `pi`, `e`.
    Press(PressArgs),

    /// Interactive session reading tokens from stdin
    Repl,

    /// Show or clear the stored history
    History(HistoryArgs),

    /// Show or change preferences
    Prefs(PrefsArgs),
}

/// Arguments for the press command
#[derive(Parser, Debug)]
pub struct PressArgs {
    /// Button tokens, e.g. `5 + 3 =`
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

/// Arguments for the history command
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Delete the stored history
    #[arg(long)]
    pub clear: bool,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the prefs command
#[derive(Parser, Debug)]
pub struct PrefsArgs {
    /// Preference action (defaults to show)
    #[command(subcommand)]
    pub action: Option<PrefsAction>,
}

/// Preference actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrefsAction {
    /// Print the current preferences as JSON
    Show,
    /// Set how many history entries are kept
    SetLimit {
        /// New limit (1 to 1000)
        #[arg(value_parser = clap::value_parser!(u16).range(1..=1000))]
        limit: u16,
    },
    /// Set the mode sessions start in
    Mode {
        /// Keypad mode
        mode: ModeArg,
    },
    /// Switch between dark and light theme
    ToggleDark,
}

/// Keypad mode argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Basic keypad
    Basic,
    /// Scientific keypad
    Scientific,
}

impl From<ModeArg> for calcusolve::session::preferences::CalculatorMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Basic => Self::Basic,
            ModeArg::Scientific => Self::Scientific,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_press_with_operator_tokens() {
        let cli = Cli::try_parse_from(["calcusolve", "press", "5", "-", "3", "="]).unwrap();
        match cli.command {
            Commands::Press(args) => assert_eq!(args.tokens, vec!["5", "-", "3", "="]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "calcusolve",
            "-vv",
            "--offline",
            "--color",
            "never",
            "history",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.offline);
        assert_eq!(cli.color, ColorArg::Never);
    }

    #[test]
    fn test_parse_prefs_actions() {
        let cli = Cli::try_parse_from(["calcusolve", "prefs", "set-limit", "25"]).unwrap();
        let Commands::Prefs(args) = cli.command else {
            panic!("expected prefs");
        };
        assert_eq!(args.action, Some(PrefsAction::SetLimit { limit: 25 }));

        let cli = Cli::try_parse_from(["calcusolve", "prefs", "mode", "scientific"]).unwrap();
        let Commands::Prefs(args) = cli.command else {
            panic!("expected prefs");
        };
        assert_eq!(
            args.action,
            Some(PrefsAction::Mode {
                mode: ModeArg::Scientific
            })
        );
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(Cli::try_parse_from(["calcusolve", "prefs", "set-limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["calcusolve", "prefs", "set-limit", "1001"]).is_err());
    }

    #[test]
    fn test_press_requires_tokens() {
        assert!(Cli::try_parse_from(["calcusolve", "press"]).is_err());
    }
}
