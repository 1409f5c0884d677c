//! Command execution over a calculator session

use std::io::IsTerminal;
use std::sync::Arc;

use calcusolve::core::event::InputEvent;
use calcusolve::session::clipboard::Clipboard;
use calcusolve::session::notification::{self, NotificationReceiver};
use calcusolve::session::preferences::{CalculatorMode, Preferences};
use calcusolve::session::store::JsonFileStore;
use calcusolve::session::Session;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::commands::{Commands, HistoryArgs, PrefsAction};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;

const REPL_HELP: &str = "\
Enter button tokens separated by spaces, e.g. `5 + 3 =` or `9 sqrt`.
Commands:
  :history          show history, newest first
  :clear-history    delete the history
  :recall N         load the result of history entry N (0 = newest)
  :copy             copy the display to the clipboard
  :mode MODE        switch to basic or scientific
  :theme            toggle dark mode
  :help             show this help
  :quit             leave";

/// Runs one CLI command to completion
pub async fn execute(config: CliConfig, command: Commands) -> CliResult<()> {
    let mut app = App::open(&config).await;
    let result = match command {
        Commands::Press(args) => app.press(&args.tokens),
        Commands::Repl => app.repl().await,
        Commands::History(args) => app.history(&args),
        Commands::Prefs(args) => app.prefs(args.action.unwrap_or(PrefsAction::Show)),
    };
    app.close().await;
    result
}

/// A session wired to the configured store and to terminal output
#[derive(Debug)]
pub struct App {
    session: Session,
    notifications: NotificationReceiver,
    reporter: Reporter,
    verbose: bool,
}

impl App {
    /// Opens a session, loading preferences and history from the store
    pub async fn open(config: &CliConfig) -> Self {
        let (session, notifications) = Session::new(Preferences::default());
        let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

        let session = match config.storage.resolve() {
            Some(dir) => {
                info!(dir = %dir.display(), "using JSON store");
                let store = Arc::new(JsonFileStore::new(dir));
                let mut session = session
                    .with_history_store(store.clone())
                    .with_preference_store(store);
                session.load_preferences().await;
                session.hydrate().await;
                session
            }
            None => {
                debug!("running without a store");
                session
            }
        };

        let mut app = Self {
            session,
            notifications,
            reporter,
            verbose: config.verbosity.is_verbose(),
        };
        app.report_notifications();
        app
    }

    /// Underlying session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Presses every token in order, then prints the display.
    ///
    /// All tokens are validated before any is pressed.
    pub fn press(&mut self, tokens: &[String]) -> CliResult<()> {
        let events = parse_tokens(tokens.iter().map(String::as_str))?;
        self.apply(events);
        self.reporter.display(self.session.display());
        Ok(())
    }

    /// Reads lines from stdin until EOF or `:quit`
    pub async fn repl(&mut self) -> CliResult<()> {
        let interactive = std::io::stdin().is_terminal();
        if interactive {
            self.reporter.info("CalcuSolve. Type :help for commands.");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            if interactive {
                eprint!("[{}] {} > ", self.session.mode(), self.session.display());
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, ":quit" | ":q" | "exit") {
                break;
            }

            if let Err(err) = self.repl_line(line) {
                warn!(error = %err, "repl input rejected");
                self.reporter.error(&err.to_string());
            }
        }
        Ok(())
    }

    fn repl_line(&mut self, line: &str) -> CliResult<()> {
        let Some(command) = line.strip_prefix(':') else {
            let events = parse_tokens(line.split_whitespace())?;
            self.apply(events);
            self.reporter.display(self.session.display());
            return Ok(());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("history"), None) => self.print_history(),
            (Some("clear-history"), None) => {
                self.session.clear_history();
                self.report_notifications();
            }
            (Some("recall"), Some(index)) => {
                let index: usize = index
                    .parse()
                    .map_err(|_| CliError::invalid_argument(format!("not an index: '{index}'")))?;
                self.session
                    .recall(index)
                    .map_err(|e| CliError::invalid_argument(e.to_string()))?;
                self.reporter.display(self.session.display());
            }
            (Some("copy"), None) => {
                let mut clipboard = clipboard();
                self.session.copy_display(clipboard.as_mut());
                self.report_notifications();
            }
            (Some("mode"), Some(mode)) => {
                let mode: CalculatorMode = mode.parse().map_err(CliError::invalid_argument)?;
                self.session.set_mode(mode);
                self.reporter.info(&format!("mode: {mode}"));
            }
            (Some("theme"), None) => {
                self.session.toggle_dark_mode();
                self.report_notifications();
            }
            (Some("help"), None) => self.reporter.info(REPL_HELP),
            _ => {
                return Err(CliError::invalid_argument(format!(
                    "unknown command ':{command}'"
                )))
            }
        }
        Ok(())
    }

    /// Lists or clears history
    pub fn history(&mut self, args: &HistoryArgs) -> CliResult<()> {
        if args.clear {
            self.session.clear_history();
            self.report_notifications();
            return Ok(());
        }
        if args.json {
            let entries: Vec<_> = self.session.history().list().collect();
            self.reporter.raw(&serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }
        self.print_history();
        Ok(())
    }

    /// Shows or changes preferences
    pub fn prefs(&mut self, action: PrefsAction) -> CliResult<()> {
        match action {
            PrefsAction::Show => {}
            PrefsAction::SetLimit { limit } => self.session.set_history_limit(usize::from(limit)),
            PrefsAction::Mode { mode } => self.session.set_default_mode(mode.into()),
            PrefsAction::ToggleDark => {
                self.session.toggle_dark_mode();
            }
        }
        self.report_notifications();
        self.reporter
            .raw(&serde_json::to_string_pretty(self.session.preferences())?);
        Ok(())
    }

    /// Waits for outstanding writes and reports their failures
    pub async fn close(mut self) {
        self.session.flush().await;
        self.report_notifications();
    }

    fn apply(&mut self, events: Vec<InputEvent>) {
        for event in events {
            if let Some(entry) = self.session.handle(event) {
                if self.verbose {
                    self.reporter.entry(&entry);
                }
            }
            self.report_notifications();
        }
    }

    fn print_history(&self) {
        let history = self.session.history();
        if history.is_empty() {
            self.reporter.info("No history");
            return;
        }
        for entry in history.list() {
            self.reporter.entry(entry);
        }
    }

    fn report_notifications(&mut self) {
        for note in notification::drain(&mut self.notifications) {
            self.reporter.notification(&note);
        }
    }
}

fn parse_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> CliResult<Vec<InputEvent>> {
    tokens
        .into_iter()
        .map(|token| {
            token
                .parse::<InputEvent>()
                .map_err(|e| CliError::invalid_argument(e.to_string()))
        })
        .collect()
}

#[cfg(feature = "clipboard")]
fn clipboard() -> Box<dyn Clipboard> {
    Box::new(calcusolve::session::clipboard::SystemClipboard)
}

#[cfg(not(feature = "clipboard"))]
fn clipboard() -> Box<dyn Clipboard> {
    Box::new(calcusolve::session::clipboard::MemoryClipboard::unavailable())
}
