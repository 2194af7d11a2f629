use std::{io, sync::Arc};

use dialoguer::{theme::ColorfulTheme, Confirm};
use sbudget_config::ConfigError;
use sbudget_core::CoreError;
use strsim::levenshtein;

use crate::{
    app::{DataPaths, FileSession},
    errors::{AppError, CliError},
};

use super::{
    commands,
    output::{self, OutputPreferences},
    registry::CommandRegistry,
    system_clock::SystemClock,
};

/// Set to run the shell non-interactively, one command per stdin line.
pub const SCRIPT_ENV: &str = "SIMPLE_BUDGET_CLI_SCRIPT";

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

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: FileSession,
    pub paths: DataPaths,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_paths(mode, DataPaths::resolve())
    }

    pub fn with_paths(mode: CliMode, paths: DataPaths) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let session = FileSession::open(&paths, Arc::new(SystemClock))?;
        let context = Self {
            mode,
            registry,
            session,
            paths,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        };
        context.apply_preferences();
        if context.session.state().deletion_alert() {
            output::warning(
                "Transactions from the oldest month are deleted when the month changes. Run `export` to keep a copy.",
            );
        }
        Ok(context)
    }

    pub(crate) fn apply_preferences(&self) {
        output::set_preferences(OutputPreferences {
            dark_mode: self.session.state().settings().dark_mode,
            plain: self.mode == CliMode::Script,
        });
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        format!("simple-budget[{}]> ", self.session.state().view())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());
        self.dispatch(&command, raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, question: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(false)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::App(AppError::StorageUnavailable(message)) => {
                Err(CliError::from(AppError::StorageUnavailable(message)))
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::App(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

/// Runs `lines` against a context rooted at `paths`, as script mode would.
pub fn process_script(paths: DataPaths, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_paths(CliMode::Script, paths)?;
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(context)
}
