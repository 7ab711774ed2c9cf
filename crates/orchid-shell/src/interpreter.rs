//! Command trait, arity classes and the command registry.
//!
//! Every command belongs to exactly one arity class: it takes zero, one or
//! two arguments, never a variable number. The registry keeps one table per
//! class, so a name registered as a one-argument command simply does not
//! exist when typed with zero or two arguments.

use std::collections::BTreeMap;

use orchid_types::color::Color;
use orchid_types::error::{OrchidError, Result};

use crate::environment::Environment;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Command produced no visible output.
    None,
    /// Plain text, one or more lines, in the text color.
    Text(String),
    /// Listings and reports, in the highlight color.
    Highlight(String),
    /// Text in an explicit color.
    Colored { text: String, color: Color },
    /// A failure message, in red.
    Error(String),
    /// Signal to clear the screen and show a bare prompt.
    Clear,
    /// Signal to blank the screen and switch the backlight off.
    Lock,
    /// Signal to change backlight brightness (0-100).
    Brightness(u8),
    /// Several outputs in order (script runs).
    Batch(Vec<CommandOutput>),
}

/// Number of arguments a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arity {
    Zero,
    One,
    Two,
}

impl Arity {
    /// All classes, in argument-count order.
    pub const ALL: [Arity; 3] = [Arity::Zero, Arity::One, Arity::Two];

    /// The class for `n` trailing arguments, if any.
    pub fn from_count(n: usize) -> Option<Self> {
        match n {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Argument count of this class.
    pub fn count(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
        }
    }

    fn index(self) -> usize {
        self.count()
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types), lowercase.
    fn name(&self) -> &str;

    /// How many arguments the command takes.
    fn arity(&self) -> Arity;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "mkdir <path>").
    fn usage(&self) -> &str;

    /// Execute with exactly `arity().count()` arguments.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Commands the dispatcher runs itself because they need the registry or
/// recursive dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `help <command>`
    Help,
    /// `exe <file>`
    Exe,
    /// `history`
    History,
    /// `alias <command> <name>`
    Alias,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [
        Builtin::Help,
        Builtin::Exe,
        Builtin::History,
        Builtin::Alias,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Exe => "exe",
            Self::History => "history",
            Self::Alias => "alias",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Help | Self::Exe => Arity::One,
            Self::History => Arity::Zero,
            Self::Alias => Arity::Two,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Help => "Show usage of a command ('all' lists them)",
            Self::Exe => "Run each line of a file as a command",
            Self::History => "Show recent commands",
            Self::Alias => "Give a command another name",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Self::Help => "help <command|all>",
            Self::Exe => "exe <file>",
            Self::History => "history",
            Self::Alias => "alias <command> <name>",
        }
    }
}

/// A registered handler.
pub enum Handler {
    /// Runs against the shell environment.
    Command(Box<dyn Command>),
    /// Run by the dispatcher.
    Builtin(Builtin),
}

impl Handler {
    pub fn name(&self) -> &str {
        match self {
            Self::Command(cmd) => cmd.name(),
            Self::Builtin(b) => b.name(),
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Command(cmd) => cmd.arity(),
            Self::Builtin(b) => b.arity(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Command(cmd) => cmd.description(),
            Self::Builtin(b) => b.description(),
        }
    }

    pub fn usage(&self) -> &str {
        match self {
            Self::Command(cmd) => cmd.usage(),
            Self::Builtin(b) => b.usage(),
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(cmd) => write!(f, "Command({})", cmd.name()),
            Self::Builtin(b) => write!(f, "Builtin({b:?})"),
        }
    }
}

/// Registry of commands, one table per arity class.
///
/// Built once at startup; the shell only holds it by shared reference
/// afterwards.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    classes: [BTreeMap<String, Handler>; 3],
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in command.
    pub fn with_builtins() -> Result<Self> {
        let mut reg = Self::new();
        crate::commands::register_builtins(&mut reg)?;
        Ok(reg)
    }

    /// Register a command. Fails if the name is taken in any class.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        self.insert(Handler::Command(cmd))
    }

    /// Register a dispatcher-level builtin.
    pub fn register_builtin(&mut self, builtin: Builtin) -> Result<()> {
        self.insert(Handler::Builtin(builtin))
    }

    fn insert(&mut self, handler: Handler) -> Result<()> {
        let name = handler.name().to_ascii_lowercase();
        if let Some(existing) = self.find(&name) {
            return Err(OrchidError::Command(format!(
                "{name} is already registered with {} argument(s)",
                existing.arity().count()
            )));
        }
        self.classes[handler.arity().index()].insert(name, handler);
        Ok(())
    }

    /// Look up `name` in the class for `arity` only.
    pub fn resolve(&self, name: &str, arity: Arity) -> Option<&Handler> {
        self.classes[arity.index()].get(&name.to_ascii_lowercase())
    }

    /// Look up `name` in any class.
    pub fn find(&self, name: &str) -> Option<&Handler> {
        let name = name.to_ascii_lowercase();
        self.classes.iter().find_map(|class| class.get(&name))
    }

    /// Command names of one class, sorted.
    pub fn names(&self, arity: Arity) -> impl Iterator<Item = &str> {
        self.classes[arity.index()].keys().map(String::as_str)
    }

    /// Total number of registered commands.
    pub fn len(&self) -> usize {
        self.classes.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetch argument `i`, for commands whose arity guarantees it.
pub(crate) fn arg<'a>(args: &[&'a str], i: usize) -> Result<&'a str> {
    args.get(i)
        .copied()
        .ok_or_else(|| OrchidError::Command(format!("missing argument {}", i + 1)))
}
