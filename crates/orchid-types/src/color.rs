//! RGB565 colors and the built-in named palette.
//!
//! The display panel takes 16-bit RGB565 values. Colors can be written by
//! name (`orchid`), as a raw RGB565 value (`0xDCFA`), or as a 24-bit web
//! color (`#FF8800`) which is packed down to RGB565.

use std::fmt;

use serde::Deserialize;

use crate::error::{OrchidError, Result};

/// A 16-bit RGB565 panel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const BLUE: Color = Color(0x001F);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const CYAN: Color = Color(0x07FF);
    pub const MAGENTA: Color = Color(0xF81F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const WHITE: Color = Color(0xFFFF);
    pub const VIOLET: Color = Color(0x897B);
    pub const PURPLE: Color = Color(0x48CF);
    pub const SMOKE: Color = Color(0x6B2D);
    pub const GRAY: Color = Color(0x3A2A);
    pub const ORANGE: Color = Color(0xB8A1);
    pub const LIME: Color = Color(0x07E0);
    pub const PINK: Color = Color(0xF9B9);
    pub const FUCHSIA: Color = Color(0xF81F);
    pub const ORCHID: Color = Color(0xDCFA);
    pub const CRT: Color = Color(0x1061);

    /// Pack an 8-bit-per-channel color into RGB565.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 >> 3) << 11;
        let g = (g as u16 >> 2) << 5;
        let b = b as u16 >> 3;
        Color(r | g | b)
    }

    /// Raw RGB565 value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Look up a palette entry by name (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        PALETTE
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, c)| *c)
    }

    /// Parse a palette name, `0xRRRR` RGB565 value, or `#RRGGBB` web color.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(color) = Self::named(s) {
            return Ok(color);
        }
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u16::from_str_radix(hex, 16)
                .map(Color)
                .map_err(|_| OrchidError::Config(format!("invalid RGB565 value: {s}")));
        }
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(OrchidError::Config(format!("invalid color: {s}")));
            }
            return match hex.len() {
                4 => u16::from_str_radix(hex, 16)
                    .map(Color)
                    .map_err(|_| OrchidError::Config(format!("invalid color: {s}"))),
                6 => {
                    let channel = |range: std::ops::Range<usize>| {
                        u8::from_str_radix(&hex[range], 16)
                            .map_err(|_| OrchidError::Config(format!("invalid color: {s}")))
                    };
                    Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
                },
                _ => Err(OrchidError::Config(format!("invalid color: {s}"))),
            };
        }
        Err(OrchidError::Config(format!("unknown color: {s}")))
    }

    /// The palette name for this color, if it has one.
    pub fn name(self) -> Option<&'static str> {
        PALETTE.iter().find(|(_, c)| *c == self).map(|(n, _)| *n)
    }
}

impl TryFrom<String> for Color {
    type Error = OrchidError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:04X}", self.0),
        }
    }
}

/// Named colors accepted by `parse`. Aliased values (`lime`/`green`,
/// `fuchsia`/`magenta`) resolve to the first name when displayed.
pub const PALETTE: &[(&str, Color)] = &[
    ("black", Color::BLACK),
    ("blue", Color::BLUE),
    ("red", Color::RED),
    ("green", Color::GREEN),
    ("cyan", Color::CYAN),
    ("magenta", Color::MAGENTA),
    ("yellow", Color::YELLOW),
    ("white", Color::WHITE),
    ("violet", Color::VIOLET),
    ("purple", Color::PURPLE),
    ("smoke", Color::SMOKE),
    ("gray", Color::GRAY),
    ("orange", Color::ORANGE),
    ("lime", Color::LIME),
    ("pink", Color::PINK),
    ("fuchsia", Color::FUCHSIA),
    ("orchid", Color::ORCHID),
    ("crt", Color::CRT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_color() {
        assert_eq!(Color::parse("red").unwrap(), Color::RED);
        assert_eq!(Color::parse("Orchid").unwrap(), Color::ORCHID);
    }

    #[test]
    fn parse_rgb565_hex() {
        assert_eq!(Color::parse("0xF800").unwrap(), Color::RED);
        assert_eq!(Color::parse("0x1061").unwrap(), Color::CRT);
    }

    #[test]
    fn parse_short_hash_is_rgb565() {
        assert_eq!(Color::parse("#07E0").unwrap(), Color::GREEN);
    }

    #[test]
    fn parse_web_color_packs_to_565() {
        assert_eq!(Color::parse("#FF0000").unwrap(), Color::RED);
        assert_eq!(Color::parse("#FFFFFF").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#000000").unwrap(), Color::BLACK);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Color::parse("mauve").is_err());
        assert!(Color::parse("0xZZZZ").is_err());
        assert!(Color::parse("#12").is_err());
    }

    #[test]
    fn parse_rejects_non_ascii_hex() {
        // Six bytes, but not six hex digits.
        assert!(Color::parse("#a\u{e9}\u{20ac}").is_err());
        assert!(Color::parse("#\u{e9}\u{e9}\u{e9}").is_err());
        assert!(Color::parse("#+F00").is_err());
    }

    #[test]
    fn parse_trims_whitespace() {
        // Legacy config lines carry their trailing newline.
        assert_eq!(Color::parse("blue\n").unwrap(), Color::BLUE);
    }

    #[test]
    fn display_prefers_name() {
        assert_eq!(Color::YELLOW.to_string(), "yellow");
        assert_eq!(Color(0x1234).to_string(), "0x1234");
    }

    #[test]
    fn aliases_display_first_name() {
        assert_eq!(Color::LIME.to_string(), "green");
        assert_eq!(Color::FUCHSIA.to_string(), "magenta");
    }

    #[test]
    fn deserialize_from_string() {
        let c: Color = serde_json::from_str("\"cyan\"").unwrap();
        assert_eq!(c, Color::CYAN);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
