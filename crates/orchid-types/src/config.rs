//! Shell configuration.
//!
//! Loaded once at startup, either from a TOML file or from the device's
//! legacy positional `config.txt` (one value per line).

use std::path::Path;

use serde::Deserialize;

use crate::color::Color;
use crate::error::{OrchidError, Result};

/// Default debounce delay between keyboard polls after a transition.
pub const DEFAULT_DEBOUNCE_MS: u64 = 40;

/// Top-level shell configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrchidConfig {
    /// Screen background color.
    pub bg_color: Color,
    /// Text color.
    pub fg_color: Color,
    /// Highlight color (multi-line output, listings).
    pub hi_color: Color,
    /// Color of the bare prompt after the screen is cleared.
    pub prompt_color: Color,
    /// Mount the SD card at startup.
    pub automount: bool,
    /// Reserved; Bluetooth is not supported yet.
    pub bluetooth_enabled: bool,
    /// Saved Wi-Fi network. Auto-connect needs both `ssid` and `password`.
    pub ssid: Option<String>,
    /// Saved Wi-Fi password.
    pub password: Option<String>,
    /// Home directory; the prompt is `<home_dir>>`.
    pub home_dir: String,
    /// Minimum delay between polls after a key transition, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for OrchidConfig {
    fn default() -> Self {
        Self {
            bg_color: Color::BLACK,
            fg_color: Color::ORCHID,
            hi_color: Color::YELLOW,
            prompt_color: Color::ORCHID,
            automount: false,
            bluetooth_enabled: false,
            ssid: None,
            password: None,
            home_dir: "/".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl OrchidConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the legacy positional format: background, text, highlight and
    /// prompt colors, automount, bluetooth, ssid, password -- one per line.
    ///
    /// Missing trailing lines keep their defaults. Empty or `none` ssid and
    /// password lines mean "not set".
    pub fn from_legacy_lines(s: &str) -> Result<Self> {
        let mut config = Self::default();
        let lines: Vec<&str> = s.lines().map(str::trim).collect();
        let line = |i: usize| lines.get(i).copied().filter(|l| !l.is_empty());

        if let Some(v) = line(0) {
            config.bg_color = Color::parse(v)?;
        }
        if let Some(v) = line(1) {
            config.fg_color = Color::parse(v)?;
        }
        if let Some(v) = line(2) {
            config.hi_color = Color::parse(v)?;
        }
        if let Some(v) = line(3) {
            config.prompt_color = Color::parse(v)?;
        }
        if let Some(v) = line(4) {
            config.automount = parse_flag(v)?;
        }
        if let Some(v) = line(5) {
            config.bluetooth_enabled = parse_flag(v)?;
        }
        config.ssid = line(6).filter(|v| !v.eq_ignore_ascii_case("none")).map(String::from);
        config.password = line(7).filter(|v| !v.eq_ignore_ascii_case("none")).map(String::from);
        Ok(config)
    }

    /// Load from a file. `.toml` files are parsed as TOML, anything else as
    /// the legacy positional format.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|e| e == "toml") {
            Self::from_toml_str(&text)?
        } else {
            Self::from_legacy_lines(&text)?
        };
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saved Wi-Fi credentials, when both halves are present.
    pub fn wifi_credentials(&self) -> Option<(&str, &str)> {
        match (self.ssid.as_deref(), self.password.as_deref()) {
            (Some(ssid), Some(pw)) if !ssid.is_empty() && !pw.is_empty() => Some((ssid, pw)),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.home_dir.starts_with('/') {
            return Err(OrchidError::Config(format!(
                "home_dir must be absolute: {}",
                self.home_dir
            )));
        }
        Ok(())
    }
}

fn parse_flag(v: &str) -> Result<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(OrchidError::Config(format!("expected true/false, got: {v}"))),
    }
}
