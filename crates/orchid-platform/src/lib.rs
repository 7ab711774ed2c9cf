//! Hardware collaborators for the Orchid shell.
//!
//! The shell core only talks to the device through the traits in this
//! crate. Desktop implementations let the shell run (and be tested) without
//! the handheld attached.

pub mod display;
pub mod keyboard;
pub mod services;
pub mod test_utils;

pub use display::{Display, TextDisplay};
pub use keyboard::{KeyEventSource, KeyScriptError, ScriptedKeyboard};
pub use services::{
    AccessPoint, AudioService, AuthMode, DesktopPlatform, NetworkService, PingStats, Platform,
    PowerService, SD_MOUNT_POINT, SpaceInfo, StorageService, SystemTime, TimeService, WifiStatus,
};
