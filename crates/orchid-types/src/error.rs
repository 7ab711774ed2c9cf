//! Error types for the Orchid shell.

use std::io;

/// Errors produced by the Orchid shell and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum OrchidError {
    #[error("display error: {0}")]
    Display(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("VFS error: {0}")]
    Vfs(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, OrchidError>;
