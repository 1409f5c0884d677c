//! CalcuSolve CLI
//!
//! ## Usage
//!
//! ```bash
//! calcusolve press 5 + 3 '*' 2 =     # prints 16
//! calcusolve press 9 sqrt            # prints 3
//! calcusolve repl                    # interactive session
//! calcusolve history                 # newest first
//! calcusolve history --clear
//! calcusolve prefs set-limit 25
//! calcusolve --offline press 1 / 0 = # nothing stored
//! ```

use calcusolve_cli::{logging, Cli, CliConfig, CliError, CliResult, ColorChoice, Storage, Verbosity};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    logging::init_logging(config.verbosity, config.color.should_color());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(e.to_string()))?;
    runtime.block_on(calcusolve_cli::execute(config, cli.command))
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    let storage = match (&cli.data_dir, cli.offline) {
        (_, true) => Storage::Offline,
        (Some(dir), false) => Storage::Directory(dir.clone()),
        (None, false) => Storage::Platform,
    };

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_storage(storage)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_for(args: &[&str]) -> CliConfig {
        build_config(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_build_config_defaults() {
        let config = config_for(&["calcusolve", "--data-dir", "/tmp/x", "history"]);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.color, ColorChoice::Auto);
        assert_eq!(config.storage, Storage::Directory("/tmp/x".into()));
    }

    #[test]
    fn test_build_config_quiet_wins() {
        let config = config_for(&["calcusolve", "-q", "-vv", "history"]);
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_build_config_offline_wins() {
        let config = config_for(&["calcusolve", "--offline", "--data-dir", "/tmp/x", "repl"]);
        assert_eq!(config.storage, Storage::Offline);
    }
}
