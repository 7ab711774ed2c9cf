//! Keystroke-driven line editor.
//!
//! The editor never sees key events, only the set of keys held at each poll.
//! A key acts on the rising edge: it is in the new snapshot but was not in
//! the previous one. Holding a key therefore types it once.

use orchid_types::input::{ControlKey, KeySnapshot, literal_char};

/// What a single editor step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Snapshot identical to the previous poll.
    Unchanged,
    /// Snapshot changed but no rule touched the buffer (key releases,
    /// modifier keys, backspace on an empty buffer).
    Ignored,
    /// The toggle key was pressed.
    ChargeToggle,
    /// The buffer changed and the prompt row needs a redraw.
    Edited,
    /// Enter with a non-empty buffer; the buffer is now empty.
    Submit(String),
    /// Enter with an empty buffer.
    EmptySubmit,
}

/// Edit buffer plus the two most recent key snapshots.
#[derive(Debug, Clone)]
pub struct EditorState {
    buffer: String,
    prompt: String,
    previous: KeySnapshot,
    current: KeySnapshot,
}

impl EditorState {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            prompt: prompt.into(),
            previous: KeySnapshot::new(),
            current: KeySnapshot::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Prompt followed by the buffer, as drawn on the prompt row.
    pub fn line(&self) -> String {
        format!("{}{}", self.prompt, self.buffer)
    }

    /// Feed one polled snapshot. At most one rule fires per change.
    pub fn step(&mut self, snapshot: KeySnapshot) -> EditAction {
        self.current = snapshot;
        if self.current == self.previous {
            return EditAction::Unchanged;
        }

        let action = match self.current.control_pressed_since(&self.previous) {
            Some(ControlKey::Toggle) => EditAction::ChargeToggle,
            Some(ControlKey::Backspace) => match self.buffer.pop() {
                Some(_) => EditAction::Edited,
                None => EditAction::Ignored,
            },
            Some(ControlKey::Space) => {
                self.buffer.push(' ');
                EditAction::Edited
            },
            Some(ControlKey::Enter) => {
                let value = std::mem::take(&mut self.buffer);
                if value.is_empty() {
                    EditAction::EmptySubmit
                } else {
                    EditAction::Submit(value)
                }
            },
            None => {
                let before = self.buffer.len();
                self.buffer.extend(
                    self.current
                        .pressed_since(&self.previous)
                        .filter_map(literal_char),
                );
                if self.buffer.len() == before {
                    EditAction::Ignored
                } else {
                    EditAction::Edited
                }
            },
        };

        self.previous = self.current.clone();
        action
    }
}
