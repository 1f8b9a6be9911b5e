//! Shared runtime state for the shell and the errors its commands raise.

use std::{env, io};

use chrono::NaiveDate;
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, ConfigManager};
use crate::core::services::OperationOutcome;
use crate::core::{FixedClock, Session};

use super::handlers::{self, CommandEntry};
use super::output;

/// Pins the session date, `YYYY-MM-DD`. Used by scripted runs.
pub const TODAY_ENV: &str = "SAVINGS_CORE_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No goal selected. Use `goal <name> <target> [months]` or `use <name>` first.")]
    NoActiveGoal,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("exit requested")]
    ExitRequested,
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid input: {0}")]
    Input(String),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub session: Session,
    pub config_manager: ConfigManager,
    pub active_goal: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let mut session = Session::new(config);

        if let Some(raw) = env::var_os(TODAY_ENV) {
            let raw = raw.to_string_lossy();
            let today = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{} must be YYYY-MM-DD, got `{}`", TODAY_ENV, raw))
            })?;
            session.set_clock(Box::new(FixedClock::new(today)));
        }

        if mode == CliMode::Script {
            colored::control::set_override(false);
        }
        debug!(path = %config_manager.path().display(), ?mode, "shell context ready");

        Ok(Self::from_parts(mode, session, config_manager))
    }

    pub fn from_parts(mode: CliMode, session: Session, config_manager: ConfigManager) -> Self {
        Self {
            mode,
            session,
            config_manager,
            active_goal: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        match &self.active_goal {
            Some(goal) => format!("savings({})> ", goal),
            None => "savings> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        handlers::COMMANDS.iter().map(|entry| entry.name).collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&'static CommandEntry> {
        handlers::find(name)
    }

    /// Goal named explicitly, or the active one.
    pub(crate) fn target_goal(&self, explicit: Option<&str>) -> Result<String, CommandError> {
        explicit
            .map(str::to_string)
            .or_else(|| self.active_goal.clone())
            .ok_or(CommandError::NoActiveGoal)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match self.command(command) {
            Some(entry) => match (entry.handler)(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
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

        let best = handlers::COMMANDS
            .iter()
            .map(|entry| (levenshtein(entry.name, input), entry.name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_outcome(&self, outcome: &OperationOutcome) {
        for message in &outcome.messages {
            if outcome.is_success() {
                output::success(message);
            } else {
                output::error(message);
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}
