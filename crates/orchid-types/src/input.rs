//! Key snapshots and key labels.
//!
//! The keyboard matrix is scanned, not event-driven: each poll yields the
//! full set of keys held at that instant. The shell derives presses by
//! comparing consecutive snapshots.

use std::collections::BTreeSet;
use std::fmt;

/// Label of the G0 button (charge-mode / backlight toggle).
pub const TOGGLE_KEY: &str = "GO";
/// Label of the backspace key.
pub const BACKSPACE_KEY: &str = "BSPC";
/// Label of the space bar.
pub const SPACE_KEY: &str = "SPC";
/// Label of the enter key.
pub const ENTER_KEY: &str = "ENT";

/// Editor control keys, in the priority order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Toggle,
    Backspace,
    Space,
    Enter,
}

impl ControlKey {
    /// All control keys, highest priority first.
    pub const PRIORITY: [ControlKey; 4] = [
        ControlKey::Toggle,
        ControlKey::Backspace,
        ControlKey::Space,
        ControlKey::Enter,
    ];

    /// The hardware label for this key.
    pub fn label(self) -> &'static str {
        match self {
            Self::Toggle => TOGGLE_KEY,
            Self::Backspace => BACKSPACE_KEY,
            Self::Space => SPACE_KEY,
            Self::Enter => ENTER_KEY,
        }
    }
}

/// The set of key labels held at one polling instant.
///
/// Stored ordered so that iterating newly-pressed keys is deterministic
/// (lexicographic by label) regardless of the hardware scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    keys: BTreeSet<String>,
}

impl KeySnapshot {
    /// An empty snapshot (no keys held).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a list of labels. Duplicates collapse.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `label` is held.
    pub fn contains(&self, label: &str) -> bool {
        self.keys.contains(label)
    }

    /// Whether no keys are held.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of held keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterate held labels in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Whether `label` is held now but was not held in `previous`.
    pub fn newly_pressed(&self, previous: &KeySnapshot, label: &str) -> bool {
        self.contains(label) && !previous.contains(label)
    }

    /// Labels held now but not in `previous`, in lexicographic order.
    pub fn pressed_since<'a>(
        &'a self,
        previous: &'a KeySnapshot,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |k| !previous.contains(k))
    }

    /// The highest-priority control key newly pressed since `previous`.
    pub fn control_pressed_since(&self, previous: &KeySnapshot) -> Option<ControlKey> {
        ControlKey::PRIORITY
            .into_iter()
            .find(|key| self.newly_pressed(previous, key.label()))
    }
}

impl fmt::Display for KeySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return f.write_str("-");
        }
        let labels: Vec<&str> = self.iter().collect();
        f.write_str(&labels.join(" "))
    }
}

/// The character a literal key types, if it is a single printable character.
///
/// Named keys (`SHIFT`, `FN`, `TAB`, ...) and control characters yield `None`.
pub fn literal_char(label: &str) -> Option<char> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}
