//! Screen and theme commands: clear, clean, lock, bright, bg/fg/hi_color.

use orchid_types::color::Color;
use orchid_types::error::{OrchidError, Result};

use crate::environment::Environment;
use crate::interpreter::{Arity, Command, CommandOutput, CommandRegistry, arg};

/// Register screen and theme commands into a registry.
pub fn register_display_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(ClearCmd))?;
    reg.register(Box::new(CleanCmd))?;
    reg.register(Box::new(LockCmd))?;
    reg.register(Box::new(BrightCmd))?;
    reg.register(Box::new(ThemeColorCmd(ThemeSlot::Background)))?;
    reg.register(Box::new(ThemeColorCmd(ThemeSlot::Text)))?;
    reg.register(Box::new(ThemeColorCmd(ThemeSlot::Highlight)))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Clear the screen"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// clean
// ---------------------------------------------------------------------------

struct CleanCmd;
impl Command for CleanCmd {
    fn name(&self) -> &str {
        "clean"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Clear the screen and free the command history"
    }
    fn usage(&self) -> &str {
        "clean"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        log::debug!("Dropping {} history entries", env.history.len());
        env.history.clear();
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// lock
// ---------------------------------------------------------------------------

struct LockCmd;
impl Command for LockCmd {
    fn name(&self) -> &str {
        "lock"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Blank the screen (GO restores it)"
    }
    fn usage(&self) -> &str {
        "lock"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Lock)
    }
}

// ---------------------------------------------------------------------------
// bright
// ---------------------------------------------------------------------------

struct BrightCmd;
impl Command for BrightCmd {
    fn name(&self) -> &str {
        "bright"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Set screen brightness"
    }
    fn usage(&self) -> &str {
        "bright <0-100>"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Brightness(parse_percent(arg(args, 0)?, "brightness")?))
    }
}

/// Parse a 0-100 percentage argument.
pub(crate) fn parse_percent(s: &str, what: &str) -> Result<u8> {
    s.trim_end_matches('%')
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| OrchidError::Command(format!("{what} must be 0-100, got {s}")))
}

// ---------------------------------------------------------------------------
// bg_color / fg_color / hi_color
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum ThemeSlot {
    Background,
    Text,
    Highlight,
}

struct ThemeColorCmd(ThemeSlot);
impl Command for ThemeColorCmd {
    fn name(&self) -> &str {
        match self.0 {
            ThemeSlot::Background => "bg_color",
            ThemeSlot::Text => "fg_color",
            ThemeSlot::Highlight => "hi_color",
        }
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        match self.0 {
            ThemeSlot::Background => "Set the background color",
            ThemeSlot::Text => "Set the text color",
            ThemeSlot::Highlight => "Set the highlight color",
        }
    }
    fn usage(&self) -> &str {
        match self.0 {
            ThemeSlot::Background => "bg_color <name|hex>",
            ThemeSlot::Text => "fg_color <name|hex>",
            ThemeSlot::Highlight => "hi_color <name|hex>",
        }
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let color = Color::parse(arg(args, 0)?)?;
        let theme = &mut env.theme;
        match self.0 {
            ThemeSlot::Background => theme.bg = color,
            ThemeSlot::Text => theme.fg = color,
            ThemeSlot::Highlight => theme.hi = color,
        }
        // Text drawn in the background color would be invisible.
        let shown = match self.0 {
            ThemeSlot::Background => theme.fg,
            _ => color,
        };
        Ok(CommandOutput::Colored {
            text: format!("{}={color}", self.name()),
            color: shown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Rig, run, text};

    #[test]
    fn clear_and_lock_are_signals() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        assert_eq!(run(&disp, &mut env, "clear"), CommandOutput::Clear);
        assert_eq!(run(&disp, &mut env, "lock"), CommandOutput::Lock);
    }

    #[test]
    fn clean_drops_history() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        run(&disp, &mut env, "clock");
        run(&disp, &mut env, "batt");
        assert_eq!(run(&disp, &mut env, "clean"), CommandOutput::Clear);
        assert!(env.history.is_empty());
    }

    #[test]
    fn bright_range() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        assert_eq!(run(&disp, &mut env, "bright 40"), CommandOutput::Brightness(40));
        assert_eq!(run(&disp, &mut env, "bright 100%"), CommandOutput::Brightness(100));
        assert!(matches!(run(&disp, &mut env, "bright 101"), CommandOutput::Error(_)));
        assert!(matches!(run(&disp, &mut env, "bright dim"), CommandOutput::Error(_)));
    }

    #[test]
    fn fg_color_updates_theme_and_echoes() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        let out = run(&disp, &mut env, "fg_color red");
        assert_eq!(
            out,
            CommandOutput::Colored {
                text: "fg_color=red".into(),
                color: Color::RED,
            }
        );
        assert_eq!(env.theme.fg, Color::RED);
    }

    #[test]
    fn hex_colors_accepted() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        run(&disp, &mut env, "hi_color 0x1234");
        assert_eq!(env.theme.hi, Color(0x1234));
    }

    #[test]
    fn malformed_color_is_an_error_not_a_crash() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        let before = env.theme;
        assert!(matches!(
            run(&disp, &mut env, "bg_color #a\u{e9}\u{20ac}"),
            CommandOutput::Error(_)
        ));
        assert_eq!(env.theme, before);
    }

    #[test]
    fn bg_color_echo_stays_visible() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        match run(&disp, &mut env, "bg_color blue") {
            CommandOutput::Colored { color, .. } => assert_eq!(color, env.theme.fg),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(env.theme.bg, Color::BLUE);
    }

    #[test]
    fn bad_color_keeps_theme() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        let before = env.theme;
        let out = run(&disp, &mut env, "fg_color plaid");
        assert!(matches!(out, CommandOutput::Error(_)));
        assert!(!text(&out).is_empty());
        assert_eq!(env.theme, before);
    }
}
