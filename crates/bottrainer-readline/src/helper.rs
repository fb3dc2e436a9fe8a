use std::borrow::Cow::{self, Borrowed, Owned};

use bottrainer_core::schema;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::{COMMANDS, HELP};

/// Arguments completed after a command, by command name.
fn arguments(command: &str) -> Vec<&'static str> {
    match command {
        "/tab" => vec!["query", "batch", "evaluation", "schema", "comparison", "history"],
        "/model" => vec!["primary", "alternate"],
        "/raw" => vec!["on", "off"],
        "/history" => vec!["clear"],
        "/batch" => schema::names().collect(),
        "/schema" => schema::names().chain(["all", "none"]).collect(),
        _ => Vec::new(),
    }
}

/// rustyline helper: command and argument completion, hints, highlighting.
#[derive(Clone, Default)]
pub struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let pair = |candidate: &str| Pair {
            display: candidate.to_string(),
            replacement: candidate.to_string(),
        };

        match line.split_once(' ') {
            None => Ok((
                0,
                COMMANDS
                    .iter()
                    .filter(|cmd| cmd.starts_with(line))
                    .map(|cmd| pair(*cmd))
                    .collect(),
            )),
            Some((command, arg)) if !arg.contains(' ') => Ok((
                command.len() + 1,
                arguments(command)
                    .into_iter()
                    .filter(|candidate| candidate.starts_with(arg))
                    .map(pair)
                    .collect(),
            )),
            Some(_) => Ok((pos, vec![])),
        }
    }
}

impl Highlighter for CliHelper {
    /// Known commands are cyan, unknown ones red; recognised arguments are green.
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if matches!(line.trim(), "quit" | "exit") {
            return Owned(line.yellow().to_string());
        }
        if !line.starts_with('/') {
            return Borrowed(line);
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        if !COMMANDS.iter().any(|known| *known == command) {
            return Owned(line.red().to_string());
        }
        let known = arguments(command);
        let args = rest
            .split(' ')
            .map(|arg| {
                if known.iter().any(|candidate| *candidate == arg) {
                    arg.green().to_string()
                } else {
                    arg.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        if line.len() == command.len() {
            Owned(command.bright_cyan().to_string())
        } else {
            Owned(format!("{} {args}", command.bright_cyan()))
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.dimmed().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    /// Completes a command prefix, then shows the command's usage once a space is typed.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return None;
        }

        match line.split_once(' ') {
            None => COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string()),
            Some((command, "")) => usage(command).map(str::to_string),
            Some(_) => None,
        }
    }
}

/// Argument synopsis from the help table, e.g. `<intent> <n>` for `/batch`.
fn usage(command: &str) -> Option<&'static str> {
    HELP.iter().find_map(|(syntax, _)| {
        syntax
            .strip_prefix(command)
            .and_then(|rest| rest.strip_prefix(' '))
    })
}

impl Validator for CliHelper {}
