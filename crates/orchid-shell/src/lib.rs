//! Line editor and command dispatcher for the Orchid shell.
//!
//! The editor is a state machine over polled key snapshots. A submitted line
//! goes to the dispatcher, which resolves the command against a registry
//! split by argument count and invokes its handler. The [`Shell`] loop ties
//! keyboard, editor, dispatcher and display together.

mod commands;
pub mod display_commands;
mod dispatcher;
mod editor;
mod environment;
pub mod file_commands;
pub mod fun_commands;
mod history;
mod interpreter;
pub mod network_commands;
pub mod screen;
mod shell;
pub mod storage_commands;
pub mod system_commands;

#[cfg(test)]
mod testing;

/// Register every built-in command into a registry.
pub use commands::register_builtins;
/// Outcome of dispatching one line.
pub use dispatcher::{DispatchResult, Dispatcher, MAX_SCRIPT_DEPTH, tokenize};
/// Editor state machine.
pub use editor::{EditAction, EditorState};
/// Mutable shell state passed to every handler.
pub use environment::Environment;
/// Bounded command history.
pub use history::{History, MAX_HISTORY};
/// Command trait, arity classes and the registry.
pub use interpreter::{Arity, Builtin, Command, CommandOutput, CommandRegistry, Handler};
/// Screen colors.
pub use screen::Theme;
/// Polling loop controller.
pub use shell::Shell;
