//! Color parsing and the canonical RGB representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Color parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Malformed hex color: {0:?} (expected #rrggbb)")]
    MalformedHex(String),
    #[error("Malformed RGB triple: {0:?} (expected r,g,b)")]
    MalformedTriple(String),
    #[error("RGB component out of range: {0} (expected 0-255)")]
    ComponentOutOfRange(i64),
}

/// Canonical color used by the drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`. Exactly six hex digits are accepted, in either case.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let malformed = || ColorError::MalformedHex(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(malformed)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| malformed());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse a comma separated `r,g,b` triple such as `"255, 0, 0"`.
    pub fn from_rgb_text(s: &str) -> Result<Self, ColorError> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ColorError::MalformedTriple(s.to_string()))?;

        match parts.as_slice() {
            [r, g, b] => Self::from_components(*r, *g, *b),
            _ => Err(ColorError::MalformedTriple(s.to_string())),
        }
    }

    /// Build a color from unchecked integer components.
    pub fn from_components(r: i64, g: i64, b: i64) -> Result<Self, ColorError> {
        let channel = |v: i64| u8::try_from(v).map_err(|_| ColorError::ComponentOutOfRange(v));
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `r,g,b` as shown in the RGB text field.
    pub fn to_rgb_text(self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }

    /// RGBA8 pixel with full opacity.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}

/// The three equivalent ways a color reaches the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColorInput {
    /// Text typed into the hex field.
    Hex(String),
    /// Text typed into the RGB field.
    RgbText(String),
    /// Raw integer components.
    Triple(i64, i64, i64),
    /// Value reported by the native color picker.
    Picker(String),
}

impl ColorInput {
    /// Normalize to the canonical form.
    pub fn resolve(&self) -> Result<Rgb, ColorError> {
        match self {
            ColorInput::Hex(s) | ColorInput::Picker(s) => Rgb::from_hex(s),
            ColorInput::RgbText(s) => Rgb::from_rgb_text(s),
            ColorInput::Triple(r, g, b) => Rgb::from_components(*r, *g, *b),
        }
    }
}

impl From<Rgb> for ColorInput {
    fn from(color: Rgb) -> Self {
        ColorInput::Triple(color.r.into(), color.g.into(), color.b.into())
    }
}

/// Values shown by the color widgets for one canonical color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMirror {
    pub picker: String,
    pub hex: String,
    pub rgb: String,
}

impl From<Rgb> for ColorMirror {
    fn from(color: Rgb) -> Self {
        let hex = color.to_hex();
        Self {
            picker: hex.clone(),
            hex,
            rgb: color.to_rgb_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FF0000"), Ok(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("#00ff7f"), Ok(Rgb::new(0, 255, 127)));
    }

    #[test]
    fn test_malformed_hex() {
        for bad in ["#ZZZZZZ", "FF0000", "#FF000", "#FF00000", "#fff", "", "#", "#+1+2+3"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(ColorError::MalformedHex(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rgb_text_to_hex() {
        let color = Rgb::from_rgb_text("255,0,0").unwrap();
        assert_eq!(color.to_hex(), "#ff0000");

        let spaced = Rgb::from_rgb_text(" 12 , 34 ,56 ").unwrap();
        assert_eq!(spaced, Rgb::new(12, 34, 56));
    }

    #[test]
    fn test_rgb_text_rejections() {
        assert_eq!(
            Rgb::from_rgb_text("256,0,0"),
            Err(ColorError::ComponentOutOfRange(256))
        );
        assert_eq!(
            Rgb::from_rgb_text("0,-1,0"),
            Err(ColorError::ComponentOutOfRange(-1))
        );
        assert!(matches!(
            Rgb::from_rgb_text("1,2"),
            Err(ColorError::MalformedTriple(_))
        ));
        assert!(matches!(
            Rgb::from_rgb_text("1,2,3,4"),
            Err(ColorError::MalformedTriple(_))
        ));
        assert!(matches!(
            Rgb::from_rgb_text("red,0,0"),
            Err(ColorError::MalformedTriple(_))
        ));
        assert!(matches!(
            Rgb::from_rgb_text("1.5,0,0"),
            Err(ColorError::MalformedTriple(_))
        ));
    }

    #[test]
    fn test_color_input_resolve() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(ColorInput::Hex("#FF0000".into()).resolve(), Ok(red));
        assert_eq!(ColorInput::Picker("#ff0000".into()).resolve(), Ok(red));
        assert_eq!(ColorInput::RgbText("255,0,0".into()).resolve(), Ok(red));
        assert_eq!(ColorInput::Triple(255, 0, 0).resolve(), Ok(red));
        assert!(ColorInput::Triple(0, 0, 300).resolve().is_err());
    }

    #[test]
    fn test_mirror() {
        let mirror = ColorMirror::from(Rgb::new(16, 32, 255));
        assert_eq!(mirror.hex, "#1020ff");
        assert_eq!(mirror.picker, "#1020ff");
        assert_eq!(mirror.rgb, "16,32,255");
    }

    #[test]
    fn test_display_and_from_str() {
        let color: Rgb = "#ABCDEF".parse().unwrap();
        assert_eq!(color.to_string(), "#abcdef");
    }
}
