//! Screen layout: where the prompt and command output are drawn.
//!
//! The panel holds six rows of the small font. The bottom row is the prompt;
//! output fills the five rows above it from the top down. Every redraw
//! starts from a filled background.

use orchid_platform::Display;
use orchid_types::color::Color;
use orchid_types::config::OrchidConfig;
use orchid_types::error::Result;

use crate::interpreter::CommandOutput;

/// Left margin of every text row.
pub const TEXT_X: i32 = 10;
/// Row holding the prompt and edit buffer.
pub const PROMPT_ROW: i32 = 112;
/// Output rows, top to bottom.
pub const OUTPUT_ROWS: [i32; 5] = [10, 27, 44, 61, 78];
/// Characters per row in the small font.
pub const LINE_CHARS: usize = 26;

/// Colors for prompt and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub hi: Color,
    pub prompt: Color,
}

impl Theme {
    pub fn from_config(config: &OrchidConfig) -> Self {
        Self {
            bg: config.bg_color,
            fg: config.fg_color,
            hi: config.hi_color,
            prompt: config.prompt_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&OrchidConfig::default())
    }
}

/// Redraw the prompt row with the current edit line.
pub fn redraw_prompt(display: &mut dyn Display, theme: &Theme, line: &str) -> Result<()> {
    display.fill(theme.bg)?;
    display.render(line, TEXT_X, PROMPT_ROW, theme.fg, theme.bg)
}

/// Show a single message above a bare prompt.
pub fn show_notice(
    display: &mut dyn Display,
    theme: &Theme,
    prompt: &str,
    text: &str,
    color: Color,
) -> Result<()> {
    let mut lines = Vec::new();
    push(&mut lines, text, color);
    show_lines(display, theme, prompt, &lines)
}

/// Apply a command's output: run display signals, then draw any text.
pub fn show_output(
    display: &mut dyn Display,
    theme: &Theme,
    prompt: &str,
    output: &CommandOutput,
) -> Result<()> {
    let mut lines = Vec::new();
    apply(display, theme, output, &mut lines)?;
    if !display.backlight() {
        return Ok(());
    }
    show_lines(display, theme, prompt, &lines)
}

/// Toggle between the shell and the dark charging screen.
pub fn toggle_charge_mode(display: &mut dyn Display, theme: &Theme, line: &str) -> Result<()> {
    if display.backlight() {
        display.fill(theme.bg)?;
        display.set_backlight(false)
    } else {
        display.set_backlight(true)?;
        display.fill(Color::BLACK)?;
        display.render(line, TEXT_X, PROMPT_ROW, theme.fg, theme.bg)
    }
}

fn apply(
    display: &mut dyn Display,
    theme: &Theme,
    output: &CommandOutput,
    lines: &mut Vec<(String, Color)>,
) -> Result<()> {
    match output {
        CommandOutput::None => {},
        CommandOutput::Text(text) => push(lines, text, theme.fg),
        CommandOutput::Highlight(text) => push(lines, text, theme.hi),
        CommandOutput::Colored { text, color } => push(lines, text, *color),
        CommandOutput::Error(text) => push(lines, text, Color::RED),
        CommandOutput::Clear => lines.clear(),
        CommandOutput::Lock => {
            lines.clear();
            display.fill(Color::BLACK)?;
            display.set_backlight(false)?;
        },
        CommandOutput::Brightness(percent) => match display.set_brightness(*percent) {
            Ok(()) => push(lines, &format!("bright={percent}%"), theme.fg),
            Err(e) => push(lines, &e.to_string(), Color::RED),
        },
        CommandOutput::Batch(outputs) => {
            for out in outputs {
                apply(display, theme, out, lines)?;
            }
        },
    }
    Ok(())
}

fn push(lines: &mut Vec<(String, Color)>, text: &str, color: Color) {
    lines.extend(wrap(text).into_iter().map(|l| (l, color)));
}

fn show_lines(
    display: &mut dyn Display,
    theme: &Theme,
    prompt: &str,
    lines: &[(String, Color)],
) -> Result<()> {
    display.fill(theme.bg)?;
    let skip = lines.len().saturating_sub(OUTPUT_ROWS.len());
    for ((text, color), y) in lines[skip..].iter().zip(OUTPUT_ROWS) {
        display.render(text, TEXT_X, y, *color, theme.bg)?;
    }
    display.render(prompt, TEXT_X, PROMPT_ROW, theme.prompt, theme.bg)
}

/// Split text into display rows: on newlines, then every [`LINE_CHARS`].
pub fn wrap(text: &str) -> Vec<String> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(LINE_CHARS).map(|c| c.iter().collect::<String>()));
    }
    rows
}
