//! Display collaborator.
//!
//! The panel is a 240x135 ST7789 driven with an 8x16 bitmap font. The shell
//! only ever draws whole text lines and fills the screen; it never reads
//! pixels back.

use std::io::Write;

use orchid_types::color::Color;
use orchid_types::error::{OrchidError, Result};

/// Panel width in pixels.
pub const DISPLAY_WIDTH: i32 = 240;
/// Panel height in pixels.
pub const DISPLAY_HEIGHT: i32 = 135;

/// Text output and backlight control.
pub trait Display {
    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn render(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color) -> Result<()>;

    /// Fill the whole panel with `color`.
    fn fill(&mut self, color: Color) -> Result<()>;

    /// Whether the backlight is on.
    fn backlight(&self) -> bool;

    /// Switch the backlight on or off.
    fn set_backlight(&mut self, on: bool) -> Result<()>;

    /// Set backlight brightness, 0-100.
    fn set_brightness(&mut self, _percent: u8) -> Result<()> {
        Err(OrchidError::Display(
            "brightness control not supported on this display".into(),
        ))
    }
}

/// A display that writes every draw call as a text line, for running the
/// shell on a terminal.
pub struct TextDisplay<W: Write> {
    out: W,
    backlight: bool,
    brightness: u8,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            backlight: true,
            brightness: 100,
        }
    }

    /// Current brightness, 0-100.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Consume the display and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) -> Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Display for TextDisplay<W> {
    fn render(&mut self, text: &str, _x: i32, y: i32, fg: Color, bg: Color) -> Result<()> {
        if !self.backlight {
            return Ok(());
        }
        self.emit(format_args!("[{y:>3}] {text}    ({fg} on {bg})"))
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        if !self.backlight {
            return Ok(());
        }
        self.emit(format_args!("----- {color} -----"))
    }

    fn backlight(&self) -> bool {
        self.backlight
    }

    fn set_backlight(&mut self, on: bool) -> Result<()> {
        self.backlight = on;
        self.emit(format_args!(
            "===== backlight {} =====",
            if on { "on" } else { "off" }
        ))
    }

    fn set_brightness(&mut self, percent: u8) -> Result<()> {
        self.brightness = percent.min(100);
        let brightness = self.brightness;
        self.emit(format_args!("===== brightness {brightness}% ====="))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(d: TextDisplay<Vec<u8>>) -> String {
        String::from_utf8(d.into_inner()).unwrap()
    }

    #[test]
    fn render_writes_row_and_text() {
        let mut d = TextDisplay::new(Vec::new());
        d.render("/>ls", 10, 112, Color::ORCHID, Color::BLACK).unwrap();
        assert_eq!(output(d), "[112] />ls    (orchid on black)\n");
    }

    #[test]
    fn backlight_off_suppresses_drawing() {
        let mut d = TextDisplay::new(Vec::new());
        d.set_backlight(false).unwrap();
        d.render("hidden", 10, 112, Color::WHITE, Color::BLACK).unwrap();
        d.fill(Color::BLACK).unwrap();
        assert!(!d.backlight());
        let out = output(d);
        assert!(!out.contains("hidden"));
        assert!(out.contains("backlight off"));
    }

    #[test]
    fn brightness_clamped() {
        let mut d = TextDisplay::new(Vec::new());
        d.set_brightness(180).unwrap();
        assert_eq!(d.brightness(), 100);
    }

    #[test]
    fn brightness_change_is_reported() {
        let mut d = TextDisplay::new(Vec::new());
        d.set_brightness(35).unwrap();
        assert_eq!(d.brightness(), 35);
        assert!(output(d).contains("brightness 35%"));
    }
}
