//! Mutable shell state handed to every command.

use std::collections::BTreeMap;

use rand::RngCore;

use orchid_platform::Platform;
use orchid_types::config::OrchidConfig;
use orchid_vfs::{Vfs, resolve_path};

use crate::history::History;
use crate::screen::Theme;

/// Execution environment passed to commands.
///
/// Holds everything a handler may read or change: the working directory,
/// theme colors, variables and aliases, plus borrowed access to the file
/// system and the device services.
pub struct Environment<'a> {
    /// Current working directory (VFS path).
    pub cwd: String,
    /// Home directory; also the prompt text.
    pub home: String,
    /// Colors used for the prompt and command output.
    pub theme: Theme,
    /// Variables set with `env_set`.
    pub variables: BTreeMap<String, String>,
    /// Alias name to command name.
    pub aliases: BTreeMap<String, String>,
    /// Submitted lines.
    pub history: History,
    /// Saved Wi-Fi network for `net connect`.
    pub wifi_credentials: Option<(String, String)>,
    /// The virtual file system.
    pub vfs: &'a mut dyn Vfs,
    /// Device services.
    pub platform: &'a mut dyn Platform,
    /// Randomness for `flip` and `roll`.
    pub rng: &'a mut dyn RngCore,
}

impl<'a> Environment<'a> {
    pub fn new(
        config: &OrchidConfig,
        vfs: &'a mut dyn Vfs,
        platform: &'a mut dyn Platform,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            cwd: config.home_dir.clone(),
            home: config.home_dir.clone(),
            theme: Theme::from_config(config),
            variables: BTreeMap::new(),
            aliases: BTreeMap::new(),
            history: History::new(),
            wifi_credentials: config
                .wifi_credentials()
                .map(|(ssid, pw)| (ssid.to_string(), pw.to_string())),
            vfs,
            platform,
            rng,
        }
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &str) -> String {
        resolve_path(&self.cwd, path)
    }

    /// The prompt prefix shown before the edit buffer.
    pub fn prompt(&self) -> String {
        format!("{}>", self.home)
    }

    /// Follow one level of aliasing.
    pub fn expand_alias<'s>(&'s self, name: &'s str) -> &'s str {
        self.aliases
            .get(&name.to_ascii_lowercase())
            .map_or(name, String::as_str)
    }
}
