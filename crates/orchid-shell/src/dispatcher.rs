//! Tokenizing, validating and routing submitted lines.

use orchid_types::error::{OrchidError, Result};

use crate::environment::Environment;
use crate::interpreter::{Arity, Builtin, CommandOutput, CommandRegistry, Handler, arg};
use crate::screen::OUTPUT_ROWS;

/// How many `exe` scripts may be running inside each other.
pub const MAX_SCRIPT_DEPTH: usize = 4;

/// Outcome of dispatching one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// A handler ran. Handler failures arrive here as an error output.
    Invoked {
        command: String,
        args: Vec<String>,
        output: CommandOutput,
    },
    /// The line held no tokens.
    NoCommandGiven,
    /// No command of that name takes that many arguments.
    CommandNotFound { command: String },
    /// More than two arguments were given.
    TooManyParameters { count: usize },
}

impl DispatchResult {
    /// What the user sees for this result.
    pub fn into_output(self) -> CommandOutput {
        match self {
            Self::Invoked { output, .. } => output,
            Self::NoCommandGiven => CommandOutput::Error("No command given!".to_string()),
            Self::CommandNotFound { .. } => CommandOutput::Error("Command not found!".to_string()),
            Self::TooManyParameters { .. } => {
                CommandOutput::Error("Too many parameters!".to_string())
            },
        }
    }
}

/// Split a line on whitespace, dropping empty pieces.
pub fn tokenize(value: &str) -> Vec<&str> {
    value.split_whitespace().collect()
}

/// Routes lines to handlers in a [`CommandRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r CommandRegistry,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r CommandRegistry {
        self.registry
    }

    /// Dispatch a line typed at the prompt, recording it in the history.
    pub fn dispatch(&self, value: &str, env: &mut Environment<'_>) -> DispatchResult {
        env.history.push(value);
        self.dispatch_at_depth(value, env, 0)
    }

    fn dispatch_at_depth(
        &self,
        value: &str,
        env: &mut Environment<'_>,
        depth: usize,
    ) -> DispatchResult {
        let tokens = tokenize(value);
        let Some((first, params)) = tokens.split_first() else {
            return DispatchResult::NoCommandGiven;
        };
        let Some(arity) = Arity::from_count(params.len()) else {
            log::debug!("{first}: {} parameters", params.len());
            return DispatchResult::TooManyParameters {
                count: params.len(),
            };
        };

        let command = env.expand_alias(first).to_ascii_lowercase();
        let Some(handler) = self.registry.resolve(&command, arity) else {
            log::debug!("{command}/{} not found", arity.count());
            return DispatchResult::CommandNotFound { command };
        };

        log::debug!("dispatch {command} {params:?}");
        let result = match handler {
            Handler::Command(cmd) => cmd.execute(params, env),
            Handler::Builtin(builtin) => self.run_builtin(*builtin, params, env, depth),
        };
        let output = result.unwrap_or_else(|e| {
            log::warn!("{command} failed: {e}");
            CommandOutput::Error(e.to_string())
        });

        DispatchResult::Invoked {
            command,
            args: params.iter().map(|s| s.to_string()).collect(),
            output,
        }
    }

    fn run_builtin(
        &self,
        builtin: Builtin,
        args: &[&str],
        env: &mut Environment<'_>,
        depth: usize,
    ) -> Result<CommandOutput> {
        match builtin {
            Builtin::Help => self.help(arg(args, 0)?, env),
            Builtin::History => Ok(history(env)),
            Builtin::Exe => self.exe(arg(args, 0)?, env, depth),
            Builtin::Alias => self.alias(arg(args, 0)?, arg(args, 1)?, env),
        }
    }

    /// Alias names may not shadow a registered command, and the target must
    /// be a registered command (aliases do not chain).
    fn alias(
        &self,
        command: &str,
        name: &str,
        env: &mut Environment<'_>,
    ) -> Result<CommandOutput> {
        let command = command.to_ascii_lowercase();
        let name = name.to_ascii_lowercase();
        if self.registry.find(&name).is_some() {
            return Err(OrchidError::Command(format!("{name} is already a command")));
        }
        if self.registry.find(&command).is_none() {
            return Err(OrchidError::Command(format!("no such command: {command}")));
        }
        env.aliases.insert(name.clone(), command.clone());
        Ok(CommandOutput::Text(format!("{name} -> {command}")))
    }

    fn help(&self, topic: &str, env: &Environment<'_>) -> Result<CommandOutput> {
        if topic.eq_ignore_ascii_case("all") {
            let lines: Vec<String> = Arity::ALL
                .into_iter()
                .map(|arity| {
                    let names: Vec<&str> = self.registry.names(arity).collect();
                    format!("{}: {}", arity.count(), names.join(" "))
                })
                .collect();
            return Ok(CommandOutput::Highlight(lines.join("\n")));
        }
        let name = env.expand_alias(topic);
        let handler = self
            .registry
            .find(name)
            .ok_or_else(|| OrchidError::Command(format!("no help for {topic}")))?;
        Ok(CommandOutput::Highlight(format!(
            "{}\n{}",
            handler.usage(),
            handler.description()
        )))
    }

    fn exe(&self, path: &str, env: &mut Environment<'_>, depth: usize) -> Result<CommandOutput> {
        if depth >= MAX_SCRIPT_DEPTH {
            return Err(OrchidError::Command(format!(
                "scripts nested deeper than {MAX_SCRIPT_DEPTH}"
            )));
        }
        let path = env.resolve(path);
        let bytes = env.vfs.read(&path)?;
        let script = String::from_utf8(bytes)
            .map_err(|_| OrchidError::Command(format!("{path} is not a text file")))?;
        log::info!("Running script {path}");

        let outputs = script
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| self.dispatch_at_depth(line, env, depth + 1).into_output())
            .collect();
        Ok(CommandOutput::Batch(outputs))
    }
}

fn history(env: &Environment<'_>) -> CommandOutput {
    if env.history.is_empty() {
        return CommandOutput::Text("(no history)".to_string());
    }
    let shown = OUTPUT_ROWS.len();
    let first = env.history.len().saturating_sub(shown) + 1;
    let lines: Vec<String> = env
        .history
        .recent(shown)
        .enumerate()
        .map(|(i, line)| format!("{:>3} {line}", first + i))
        .collect();
    CommandOutput::Highlight(lines.join("\n"))
}
