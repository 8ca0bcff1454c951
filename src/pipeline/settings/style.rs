//! Icon canvas geometry and layer colors.

use super::Color;

/// How every generated icon pair is drawn.
///
/// The glyph is rendered at `size * scale` pixels (truncated) and centered on
/// a `size × size` canvas. HyperOS crops the foreground layer to roughly two
/// thirds, so a scale of `0.4` keeps the glyph clear of the mask edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconStyle {
    /// Glyph color applied to every non-transparent foreground pixel.
    pub foreground: Color,

    /// Solid fill of the background layer.
    pub background: Color,

    /// Square canvas edge in pixels.
    pub size: u32,

    /// Fraction of the canvas occupied by the glyph, in `(0, 1]`.
    pub scale: f64,
}

impl IconStyle {
    /// Edge length of the rasterized glyph.
    pub fn glyph_size(&self) -> u32 {
        (f64::from(self.size) * self.scale) as u32
    }

    /// Offset of the glyph from the top-left corner on both axes.
    pub fn glyph_offset(&self) -> u32 {
        (self.size - self.glyph_size()) / 2
    }
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            foreground: Color::rgb(0xd1, 0xe2, 0xfc),
            background: Color::rgb(0x1c, 0x23, 0x2b),
            size: 432,
            scale: 0.4,
        }
    }
}
