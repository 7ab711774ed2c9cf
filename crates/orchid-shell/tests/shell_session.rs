//! End-to-end sessions: a key script drives the full loop against a
//! recording display, the mock platform and an in-memory file system.

use orchid_platform::ScriptedKeyboard;
use orchid_platform::test_utils::{DrawCall, MockPlatform, RecordingDisplay};
use orchid_shell::screen::{OUTPUT_ROWS, PROMPT_ROW};
use orchid_shell::{CommandRegistry, Environment, Shell, Theme};
use orchid_types::color::Color;
use orchid_types::config::OrchidConfig;
use orchid_vfs::{MemoryVfs, Vfs};
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Outcome {
    display: RecordingDisplay,
    vfs: MemoryVfs,
    platform: MockPlatform,
    cwd: String,
    buffer: String,
    history: Vec<String>,
    theme: Theme,
}

impl Outcome {
    /// Text and color at an output row in the final frame.
    fn row(&self, y: i32) -> Option<(&str, Color)> {
        match self.display.last_render_at(y) {
            Some(DrawCall::Render { text, fg, .. }) => Some((text.as_str(), *fg)),
            _ => None,
        }
    }

    fn prompt_row(&self) -> &str {
        self.row(PROMPT_ROW).map(|(t, _)| t).unwrap_or_default()
    }
}

fn quiet_config() -> OrchidConfig {
    OrchidConfig {
        debounce_ms: 0,
        ..OrchidConfig::default()
    }
}

fn session_with(
    config: OrchidConfig,
    script: &str,
    mut vfs: MemoryVfs,
    mut platform: MockPlatform,
) -> Outcome {
    let registry = CommandRegistry::with_builtins().unwrap();
    let mut keys = ScriptedKeyboard::from_text(script).unwrap();
    let mut display = RecordingDisplay::new();
    let mut rng = StdRng::seed_from_u64(11);
    let (cwd, buffer, history, theme) = {
        let env = Environment::new(&config, &mut vfs, &mut platform, &mut rng);
        let mut shell = Shell::new(&config, &mut keys, &mut display, &registry, env);
        shell.boot();
        shell.run();
        (
            shell.env().cwd.clone(),
            shell.editor().buffer().to_string(),
            shell.env().history.entries().map(String::from).collect(),
            shell.env().theme,
        )
    };
    Outcome {
        display,
        vfs,
        platform,
        cwd,
        buffer,
        history,
        theme,
    }
}

fn session(script: &str) -> Outcome {
    session_with(quiet_config(), script, MemoryVfs::new(), MockPlatform::new())
}

#[test]
fn held_key_types_once() {
    let out = session("a\na\na\n-\n");
    assert_eq!(out.buffer, "a");
    assert_eq!(out.prompt_row(), "/>a");
}

#[test]
fn simultaneous_keys_land_in_label_order() {
    let out = session("c a b\n-\n");
    assert_eq!(out.buffer, "abc");
}

#[test]
fn backspace_on_empty_stays_empty() {
    let out = session("BSPC\n-\nBSPC\n-\n");
    assert_eq!(out.buffer, "");
    assert!(out.display.rendered_texts().iter().all(|t| *t == "/>"));
}

#[test]
fn backspace_edits_buffer() {
    let out = session("\"lisx\"\nBSPC\n-\n");
    assert_eq!(out.buffer, "lis");
    assert_eq!(out.prompt_row(), "/>lis");
}

#[test]
fn modifier_keys_do_not_type() {
    let out = session("SHIFT\nSHIFT a\n-\n");
    assert_eq!(out.buffer, "a");
}

#[test]
fn empty_enter_shows_notice() {
    let out = session("ENT\n-\n");
    assert_eq!(
        out.row(OUTPUT_ROWS[0]),
        Some(("Give nothing, get nothing", Color::YELLOW))
    );
    assert!(out.history.is_empty());
}

#[test]
fn unknown_command_reported_and_buffer_reset() {
    let out = session("\"frobnicate\"\nENT\n-\n");
    assert_eq!(out.buffer, "");
    assert_eq!(
        out.row(OUTPUT_ROWS[0]),
        Some(("Command not found!", Color::RED))
    );
    assert_eq!(out.prompt_row(), "/>");
}

#[test]
fn too_many_parameters_reported() {
    let out = session("\"help a b c\"\nENT\n-\n");
    assert_eq!(
        out.row(OUTPUT_ROWS[0]),
        Some(("Too many parameters!", Color::RED))
    );
}

#[test]
fn whitespace_only_line_is_no_command() {
    let out = session("SPC\n-\nSPC\n-\nENT\n-\n");
    assert_eq!(out.buffer, "");
    assert_eq!(
        out.row(OUTPUT_ROWS[0]),
        Some(("No command given!", Color::RED))
    );
}

#[test]
fn wrong_arity_is_not_found() {
    let out = session("\"vol\"\nENT\n-\n");
    assert_eq!(
        out.row(OUTPUT_ROWS[0]),
        Some(("Command not found!", Color::RED))
    );
}

#[test]
fn theme_change_applies_to_later_output() {
    let out = session("\"fg_color green\"\nENT\n-\n\"clock\"\nENT\n-\n");
    assert_eq!(out.theme.fg, Color::GREEN);
    assert_eq!(
        out.row(OUTPUT_ROWS[0]),
        Some(("2024-05-17 13:37:00", Color::GREEN))
    );
}

#[test]
fn file_commands_work_together() {
    let script = "\
\"mkdir notes\"
ENT
-
\"chdir notes\"
ENT
-
\"mkfile todo.txt\"
ENT
-
\"list cur\"
ENT
-
";
    let out = session(script);
    assert_eq!(out.cwd, "/notes");
    assert!(out.vfs.exists("/notes/todo.txt"));
    assert_eq!(out.row(OUTPUT_ROWS[0]), Some(("todo.txt 0", Color::YELLOW)));
}

#[test]
fn script_runs_with_alias_and_history() {
    let mut vfs = MemoryVfs::new();
    vfs.write("/init.sh", b"# boot script\nalias clock t\nenv_set mood calm\n")
        .unwrap();
    let script = "\"exe init.sh\"\nENT\n-\n\"t\"\nENT\n-\n\"history\"\nENT\n-\n";
    let out = session_with(quiet_config(), script, vfs, MockPlatform::new());
    assert_eq!(out.history, ["exe init.sh", "t", "history"]);
    assert!(out.display.rendered_contains("2024-05-17 13:37:00"));
    assert!(out.display.rendered_contains("  3 history"));
}

#[test]
fn charge_toggle_round_trip_keeps_buffer() {
    let out = session("\"ab\"\nGO\n-\nGO\n-\n");
    assert_eq!(out.buffer, "ab");
    let backlight: Vec<bool> = out
        .display
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Backlight(on) => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(backlight, [false, true]);
    assert_eq!(out.prompt_row(), "/>ab");
}

#[test]
fn lock_then_toggle_restores() {
    let out = session("\"lock\"\nENT\n-\nGO\n-\n");
    assert!(out.display.calls.contains(&DrawCall::Backlight(false)));
    assert_eq!(
        out.display.calls.last(),
        Some(&DrawCall::Render {
            text: "/>".into(),
            x: 10,
            y: PROMPT_ROW,
            fg: Color::ORCHID,
            bg: Color::BLACK,
        })
    );
}

#[test]
fn automount_and_wifi_at_boot() {
    let config = OrchidConfig {
        automount: true,
        ssid: Some("orchid-lab".into()),
        password: Some("hunter22".into()),
        ..quiet_config()
    };
    let out = session_with(config, "\"space\"\nENT\n-\n", MemoryVfs::new(), MockPlatform::new());
    assert!(out.platform.sd_mounted);
    assert!(out.platform.wifi.connected);
    assert!(out.vfs.exists("/sd"));
    assert_eq!(out.row(OUTPUT_ROWS[0]), Some(("total=1.4 MiB", Color::YELLOW)));
}

#[test]
fn home_on_card_skips_automount() {
    let mut vfs = MemoryVfs::new();
    vfs.mkdir("/sd").unwrap();
    let config = OrchidConfig {
        automount: true,
        home_dir: "/sd".into(),
        ..quiet_config()
    };
    let out = session_with(config, "-\n", vfs, MockPlatform::new());
    assert!(!out.platform.sd_mounted);
    assert_eq!(out.prompt_row(), "/sd>");
}

#[test]
fn handler_failure_does_not_stop_the_loop() {
    let out = session("\"chdir nowhere\"\nENT\n-\n\"env_set k v\"\nENT\n-\n\"env_get k\"\nENT\n-\n");
    assert_eq!(out.row(OUTPUT_ROWS[0]), Some(("k=v", Color::ORCHID)));
    assert_eq!(out.history.len(), 3);
}
