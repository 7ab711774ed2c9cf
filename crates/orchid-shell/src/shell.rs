//! The polling loop: keyboard to editor to dispatcher to display.

use std::time::Duration;

use orchid_platform::{Display, KeyEventSource};
use orchid_types::color::Color;
use orchid_types::config::OrchidConfig;
use orchid_types::error::Result;

use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::editor::{EditAction, EditorState};
use crate::environment::Environment;
use crate::interpreter::CommandRegistry;
use crate::network_commands::connect_saved;
use crate::screen;
use crate::storage_commands::mount_sd;

/// Shown when enter is pressed on an empty line.
pub const EMPTY_LINE_NOTICE: &str = "Give nothing, get nothing";
/// Shown when the boot-time SD mount fails.
pub const MOUNT_FAIL_NOTICE: &str = "SD mount fail!";

/// Owns the editor and drives one shell session.
///
/// Each [`tick`](Shell::tick) polls the keyboard once. Nothing that happens
/// inside a tick is fatal: user errors and handler failures are drawn on
/// screen, display failures are logged.
pub struct Shell<'a> {
    keys: &'a mut dyn KeyEventSource,
    display: &'a mut dyn Display,
    dispatcher: Dispatcher<'a>,
    env: Environment<'a>,
    editor: EditorState,
    automount: bool,
    debounce: Duration,
}

impl<'a> Shell<'a> {
    pub fn new(
        config: &OrchidConfig,
        keys: &'a mut dyn KeyEventSource,
        display: &'a mut dyn Display,
        registry: &'a CommandRegistry,
        env: Environment<'a>,
    ) -> Self {
        let editor = EditorState::new(env.prompt());
        Self {
            keys,
            display,
            dispatcher: Dispatcher::new(registry),
            env,
            editor,
            automount: config.automount,
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }

    pub fn env(&self) -> &Environment<'a> {
        &self.env
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// Draw the first prompt, then mount the SD card and join Wi-Fi as
    /// configured.
    pub fn boot(&mut self) {
        log::info!(
            "Orchid shell starting on {} in {}",
            self.env.platform.name(),
            self.env.home
        );
        let line = self.editor.line();
        let result = screen::redraw_prompt(self.display, &self.env.theme, &line);
        self.report(result);

        if self.automount && !self.env.home.contains("sd") && !self.env.platform.is_mounted() {
            if let Err(e) = mount_sd(&mut self.env) {
                log::warn!("Automount failed: {e}");
                let result = screen::show_notice(
                    self.display,
                    &self.env.theme,
                    self.editor.prompt(),
                    MOUNT_FAIL_NOTICE,
                    Color::RED,
                );
                self.report(result);
            }
        }

        if self.env.wifi_credentials.is_some() {
            match connect_saved(&mut self.env) {
                Ok(status) => log::debug!("{status}"),
                Err(e) => log::warn!("Wi-Fi auto-connect failed: {e}"),
            }
        }
    }

    /// Poll once and act on the change, if any.
    pub fn tick(&mut self) -> EditAction {
        let snapshot = self.keys.poll();
        let action = self.editor.step(snapshot);
        match &action {
            EditAction::Unchanged | EditAction::Ignored => {},
            EditAction::ChargeToggle => {
                let line = self.editor.line();
                let result = screen::toggle_charge_mode(self.display, &self.env.theme, &line);
                self.report(result);
            },
            EditAction::Edited => {
                let line = self.editor.line();
                let result = screen::redraw_prompt(self.display, &self.env.theme, &line);
                self.report(result);
            },
            EditAction::EmptySubmit => {
                let result = screen::show_notice(
                    self.display,
                    &self.env.theme,
                    self.editor.prompt(),
                    EMPTY_LINE_NOTICE,
                    Color::YELLOW,
                );
                self.report(result);
            },
            EditAction::Submit(value) => self.submit(value),
        }
        if action != EditAction::Unchanged && !self.debounce.is_zero() {
            std::thread::sleep(self.debounce);
        }
        action
    }

    /// Tick until the key source closes.
    pub fn run(&mut self) {
        while self.keys.is_open() {
            self.tick();
        }
        log::info!("Key source closed, leaving shell");
    }

    fn submit(&mut self, value: &str) {
        let result = self.dispatcher.dispatch(value, &mut self.env);
        match &result {
            DispatchResult::Invoked { command, args, .. } => {
                log::debug!("Ran {command} {args:?}");
            },
            other => log::debug!("Rejected {value:?}: {other:?}"),
        }
        let output = result.into_output();
        let drawn = screen::show_output(
            self.display,
            &self.env.theme,
            self.editor.prompt(),
            &output,
        );
        self.report(drawn);
    }

    fn report(&self, result: Result<()>) {
        if let Err(e) = result {
            log::warn!("Display update failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchid_platform::ScriptedKeyboard;
    use orchid_platform::test_utils::{DrawCall, MockPlatform, RecordingDisplay};
    use orchid_types::input::KeySnapshot;
    use orchid_vfs::MemoryVfs;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config() -> OrchidConfig {
        OrchidConfig {
            debounce_ms: 0,
            ..OrchidConfig::default()
        }
    }

    #[test]
    fn typed_line_is_dispatched_and_drawn() {
        let config = config();
        let registry = CommandRegistry::with_builtins().unwrap();
        let mut keys = ScriptedKeyboard::new();
        keys.type_line("clock");
        let mut display = RecordingDisplay::new();
        let mut vfs = MemoryVfs::new();
        let mut platform = MockPlatform::new();
        let mut rng = StdRng::seed_from_u64(3);
        let env = Environment::new(&config, &mut vfs, &mut platform, &mut rng);
        {
            let mut shell = Shell::new(&config, &mut keys, &mut display, &registry, env);
            shell.run();
            assert_eq!(shell.editor().buffer(), "");
            assert_eq!(shell.env().history.len(), 1);
        }
        assert!(display.rendered_contains("/>clock"));
        assert!(display.rendered_contains("2024-05-17 13:37:00"));
    }

    #[test]
    fn unchanged_poll_does_nothing() {
        let config = config();
        let registry = CommandRegistry::with_builtins().unwrap();
        let mut keys = ScriptedKeyboard::new();
        keys.push(KeySnapshot::new());
        let mut display = RecordingDisplay::new();
        let mut vfs = MemoryVfs::new();
        let mut platform = MockPlatform::new();
        let mut rng = StdRng::seed_from_u64(3);
        let env = Environment::new(&config, &mut vfs, &mut platform, &mut rng);
        {
            let mut shell = Shell::new(&config, &mut keys, &mut display, &registry, env);
            assert_eq!(shell.tick(), EditAction::Unchanged);
        }
        assert!(display.calls.is_empty());
    }

    #[test]
    fn display_failures_are_not_fatal() {
        let config = config();
        let registry = CommandRegistry::with_builtins().unwrap();
        let mut keys = ScriptedKeyboard::new();
        keys.type_line("env_set a b");
        let mut display = RecordingDisplay::new();
        display.fail_renders = true;
        let mut vfs = MemoryVfs::new();
        let mut platform = MockPlatform::new();
        let mut rng = StdRng::seed_from_u64(3);
        let env = Environment::new(&config, &mut vfs, &mut platform, &mut rng);
        let mut shell = Shell::new(&config, &mut keys, &mut display, &registry, env);
        shell.run();
        assert_eq!(shell.env().variables.get("a").map(String::as_str), Some("b"));
    }

    #[test]
    fn boot_mount_failure_shows_notice() {
        let config = OrchidConfig {
            automount: true,
            ..config()
        };
        let registry = CommandRegistry::with_builtins().unwrap();
        let mut keys = ScriptedKeyboard::new();
        let mut display = RecordingDisplay::new();
        let mut vfs = MemoryVfs::new();
        let mut platform = MockPlatform::new();
        platform.sd_present = false;
        let mut rng = StdRng::seed_from_u64(3);
        let env = Environment::new(&config, &mut vfs, &mut platform, &mut rng);
        {
            let mut shell = Shell::new(&config, &mut keys, &mut display, &registry, env);
            shell.boot();
        }
        match display.last_render_at(screen::OUTPUT_ROWS[0]) {
            Some(DrawCall::Render { text, fg, .. }) => {
                assert_eq!(text, MOUNT_FAIL_NOTICE);
                assert_eq!(*fg, Color::RED);
            },
            other => panic!("unexpected {other:?}"),
        }
    }
}
