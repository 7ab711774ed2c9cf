//! Keyboard collaborator and a scripted implementation.
//!
//! ## Script format
//!
//! One snapshot per line, each listing the labels held at that poll:
//!
//! ```text
//! # comment
//! l                # "l" held
//! -                # nothing held
//! SHIFT a          # two keys held together
//! "ls /sd"         # typed text: press/release per character
//! ENT
//! -
//! ```
//!
//! Inside quoted text a space types `SPC`.

use std::collections::VecDeque;

use thiserror::Error;

use orchid_types::input::{ENTER_KEY, KeySnapshot, SPACE_KEY};

/// Source of keyboard state.
pub trait KeyEventSource {
    /// The set of keys held right now.
    fn poll(&mut self) -> KeySnapshot;

    /// Whether the source can still produce input. Hardware keyboards are
    /// always open.
    fn is_open(&self) -> bool {
        true
    }
}

/// Key script error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyScriptError {
    #[error("unterminated quote at line {0}")]
    UnterminatedQuote(usize),

    #[error("empty script")]
    EmptyScript,
}

/// A keyboard that replays a fixed sequence of snapshots.
///
/// Once the script runs out every poll returns an empty snapshot and
/// [`KeyEventSource::is_open`] turns false.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeyboard {
    snapshots: VecDeque<KeySnapshot>,
}

impl ScriptedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a key script.
    pub fn from_text(text: &str) -> Result<Self, KeyScriptError> {
        let mut kb = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix('"') {
                let body = rest
                    .strip_suffix('"')
                    .ok_or(KeyScriptError::UnterminatedQuote(idx + 1))?;
                kb.type_text(body);
            } else if line == "-" {
                kb.push(KeySnapshot::new());
            } else {
                kb.push(KeySnapshot::from_labels(line.split_whitespace()));
            }
        }
        if kb.snapshots.is_empty() {
            return Err(KeyScriptError::EmptyScript);
        }
        Ok(kb)
    }

    /// Queue one snapshot.
    pub fn push(&mut self, snapshot: KeySnapshot) {
        self.snapshots.push_back(snapshot);
    }

    /// Queue a press/release pair for every character of `text`.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let label = if c == ' ' {
                SPACE_KEY.to_string()
            } else {
                c.to_string()
            };
            self.push(KeySnapshot::from_labels([label]));
            self.push(KeySnapshot::new());
        }
    }

    /// Queue `line` followed by an enter press/release.
    pub fn type_line(&mut self, line: &str) {
        self.type_text(line);
        self.push(KeySnapshot::from_labels([ENTER_KEY]));
        self.push(KeySnapshot::new());
    }

    /// Snapshots not yet polled.
    pub fn remaining(&self) -> usize {
        self.snapshots.len()
    }
}

impl KeyEventSource for ScriptedKeyboard {
    fn poll(&mut self) -> KeySnapshot {
        self.snapshots.pop_front().unwrap_or_default()
    }

    fn is_open(&self) -> bool {
        !self.snapshots.is_empty()
    }
}

/// Strip a `# comment`. A comment marker is a `#` with whitespace on both
/// sides (or at line start); a `#` at the end of a line is the hash key.
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '#' if !in_quote => {
                let before_is_gap = i == 0 || line[..i].ends_with(char::is_whitespace);
                let after_is_gap = line[i + 1..].starts_with(char::is_whitespace);
                if before_is_gap && after_is_gap {
                    return &line[..i];
                }
            },
            _ => {},
        }
    }
    line
}
