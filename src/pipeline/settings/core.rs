//! Core Settings struct and implementations.

use super::{IconStyle, TemplateLayout};
use std::path::{Path, PathBuf};

/// Immutable configuration for one pipeline run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which applies
/// defaults, resolves relative paths against the work directory and validates
/// the icon geometry. Every stage reads from the same `Settings` value.
///
/// # Examples
///
/// ```no_run
/// use hypermonet_iconpack::pipeline::{Color, SettingsBuilder};
///
/// # fn example() -> hypermonet_iconpack::pipeline::Result<()> {
/// let settings = SettingsBuilder::new()
///     .work_dir("/srv/iconpack")
///     .foreground(Color::rgb(0xd1, 0xe2, 0xfc))
///     .icon_size(432)
///     .build()?;
/// assert_eq!(settings.style().glyph_size(), 172);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Colors and geometry of generated icons.
    style: IconStyle,

    /// Template trees used by the packer.
    layout: TemplateLayout,

    /// Base directory; the module archive is written here.
    work_dir: PathBuf,

    /// Source `appfilter.xml`.
    appfilter: PathBuf,

    /// Normalized mapping written by the mapping stage.
    icon_mapper: PathBuf,

    /// Directory holding `<drawable>.svg` files.
    svg_dir: PathBuf,

    /// Generated `<package>/{0,1}.png` tree.
    output_dir: PathBuf,

    /// Module file name containing a `{timestamp}` placeholder.
    output_pattern: String,
}

impl Settings {
    /// Returns the icon style.
    pub fn style(&self) -> &IconStyle {
        &self.style
    }

    /// Returns the template layout.
    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    /// Returns the work directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the source appfilter path.
    pub fn appfilter(&self) -> &Path {
        &self.appfilter
    }

    /// Returns the normalized mapping path.
    pub fn icon_mapper(&self) -> &Path {
        &self.icon_mapper
    }

    /// Returns the SVG asset directory.
    pub fn svg_dir(&self) -> &Path {
        &self.svg_dir
    }

    /// Returns the generated icon directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the module file name pattern.
    pub fn output_pattern(&self) -> &str {
        &self.output_pattern
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        style: IconStyle,
        layout: TemplateLayout,
        work_dir: PathBuf,
        appfilter: PathBuf,
        icon_mapper: PathBuf,
        svg_dir: PathBuf,
        output_dir: PathBuf,
        output_pattern: String,
    ) -> Self {
        Self {
            style,
            layout,
            work_dir,
            appfilter,
            icon_mapper,
            svg_dir,
            output_dir,
            output_pattern,
        }
    }
}
