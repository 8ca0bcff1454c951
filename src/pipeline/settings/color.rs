//! Hex color values for the icon layers.

use std::{fmt, str::FromStr};

/// An opaque RGB color, written as `#RRGGBB` (or shorthand `#RGB`).
///
/// # Example
///
/// ```toml
/// foreground = "#d1e2fc"
/// background = "#1c232b"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Pure black. Foreground recoloring is skipped for this value.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Creates a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the color as an RGBA pixel with the given alpha.
    pub fn to_rgba(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, alpha])
    }

    /// Returns true for `#000000`.
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color {s:?} must start with '#'"))?;

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color {s:?} contains non-hex digits"));
        }

        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|e| format!("color {s:?}: {e}"))
        };

        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #abc expands to #aabbcc
            3 => Ok(Self::rgb(
                channel(&hex[0..1])? * 0x11,
                channel(&hex[1..2])? * 0x11,
                channel(&hex[2..3])? * 0x11,
            )),
            _ => Err(format!("color {s:?} must have 3 or 6 hex digits")),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
