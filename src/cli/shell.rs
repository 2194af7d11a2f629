use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use colored::Colorize;

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use super::{
    core::{CliMode, LoopControl, ShellContext, SCRIPT_ENV},
    output,
};
use crate::{app::View, errors::CliError};

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Type `help` for the list of commands.");
    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                run_line(context, trimmed)?;
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm("Exit Simple Budget?").unwrap_or(true) {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        run_line(context, trimmed)?;
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    match context.process_line(line) {
        Ok(LoopControl::Continue) => Ok(()),
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(())
        }
        Err(err) => context.report_error(err),
    }
}

/// Completes command words, and view names after `view`.
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates<'a>(&'a self, words: &[&str], needle: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match words {
            [] => Box::new(
                self.commands
                    .iter()
                    .map(String::as_str)
                    .filter(move |name| name.starts_with(needle)),
            ),
            ["view"] => Box::new(
                View::NAMES
                    .iter()
                    .copied()
                    .filter(move |name| name.starts_with(needle)),
            ),
            _ => Box::new(std::iter::empty()),
        }
    }
}

/// Splits the text before the cursor into finished words and the word being typed.
fn split_at_cursor(line: &str, pos: usize) -> (Vec<&str>, usize, &str) {
    let prefix = &line[..pos];
    let start = prefix
        .rfind(char::is_whitespace)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let words = prefix[..start].split_whitespace().collect();
    (words, start, &prefix[start..])
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (words, start, needle) = split_at_cursor(line, pos);
        let needle = needle.to_ascii_lowercase();
        let pairs = self
            .candidates(&words, &needle)
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (words, _, needle) = split_at_cursor(line, pos);
        if needle.is_empty() {
            return None;
        }
        let mut matches = self.candidates(&words, needle);
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first[needle.len()..].to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}
