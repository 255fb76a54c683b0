use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::{errors::LedgerError, tracker::BudgetTracker};

use super::{commands, output, registry::CommandRegistry};

/// How the shell consumes input: an interactive editor, or stdin line by line
/// with prompts auto-confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CommandError>;

/// Per-command failure, reported and swallowed by the loop.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Failed(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl From<LedgerError> for CommandError {
    fn from(err: LedgerError) -> Self {
        CommandError::Failed(err.to_string())
    }
}

impl From<dialoguer::Error> for CommandError {
    fn from(err: dialoguer::Error) -> Self {
        CommandError::Failed(err.to_string())
    }
}

/// Failure that aborts the whole shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// Shell state: the tracker, the command table, and the input mode.
pub struct ShellContext {
    pub tracker: BudgetTracker,
    pub mode: CliMode,
    pub running: bool,
    registry: CommandRegistry,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut tracker = BudgetTracker::from_env()?;
        tracker.initialize();
        Ok(Self {
            tracker,
            mode,
            running: true,
            registry: commands::build_registry(),
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Prompt showing the sync status so a parked error is visible.
    pub fn prompt(&self) -> String {
        format!("trousseau ({})> ", self.tracker.status().as_str())
    }

    pub fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        match self.registry.handler(command) {
            Some(handler) => handler(self, args),
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Gate for destructive operations; script mode auto-confirms.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit the shell?")
            .map_err(|err| CliError::Prompt(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        output::error(err.to_string());
        Ok(())
    }
}
