//! Builder for constructing Settings.

use super::{Color, IconStyle, Settings, TemplateLayout};
use crate::pipeline::{Error, Result};
use std::path::{Path, PathBuf};

/// Placeholder replaced with `YYYYMMDD_HHMMSS` in the module file name.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// Default module file name.
pub const DEFAULT_OUTPUT_PATTERN: &str = "magisk_module_Lawnicon_HyperMonetTheme_{timestamp}.zip";

/// Builder for constructing [`Settings`].
///
/// Unset fields fall back to the conventional layout of an icon pack
/// checkout (`appfilter.xml`, `svgs/`, `icons_template/`,
/// `magisk_template_HyperOS2/`, ...). Relative paths are resolved against
/// the work directory, which itself defaults to `.`.
///
/// # Examples
///
/// ```no_run
/// use hypermonet_iconpack::pipeline::{Color, SettingsBuilder};
///
/// # fn example() -> hypermonet_iconpack::pipeline::Result<()> {
/// let settings = SettingsBuilder::new()
///     .work_dir("iconpack")
///     .foreground(Color::rgb(0x1c, 0x23, 0x2b))
///     .background(Color::rgb(0xd1, 0xe2, 0xfc))
///     .svg_dir("lawnicons/svgs")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct SettingsBuilder {
    foreground: Option<Color>,
    background: Option<Color>,
    icon_size: Option<u32>,
    icon_scale: Option<f64>,
    work_dir: Option<PathBuf>,
    appfilter: Option<PathBuf>,
    icon_mapper: Option<PathBuf>,
    svg_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    icons_template: Option<PathBuf>,
    module_template: Option<PathBuf>,
    extra_templates: Vec<PathBuf>,
    resource_subdir: Option<PathBuf>,
    output_pattern: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the glyph color.
    ///
    /// Default: `#d1e2fc`
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Sets the background layer color.
    ///
    /// Default: `#1c232b`
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Sets the square canvas edge in pixels.
    ///
    /// Default: 432
    pub fn icon_size(mut self, size: u32) -> Self {
        self.icon_size = Some(size);
        self
    }

    /// Sets the glyph fraction of the canvas.
    ///
    /// Default: 0.4
    pub fn icon_scale(mut self, scale: f64) -> Self {
        self.icon_scale = Some(scale);
        self
    }

    /// Sets the base directory for relative paths and the module output.
    pub fn work_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.work_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the source appfilter.
    pub fn appfilter<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.appfilter = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the normalized mapping output.
    pub fn icon_mapper<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icon_mapper = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the SVG asset directory.
    pub fn svg_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.svg_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the generated icon directory.
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the template packed into the inner `icons` archive.
    pub fn icons_template<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icons_template = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the template packed into the module archive.
    pub fn module_template<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.module_template = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets additional templates whose stale `icons` file is cleaned.
    pub fn extra_templates(mut self, paths: Vec<PathBuf>) -> Self {
        self.extra_templates = paths;
        self
    }

    /// Sets the density bucket inside the icons template.
    ///
    /// Default: `res/drawable-xxhdpi`
    pub fn resource_subdir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.resource_subdir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the module file name pattern.
    ///
    /// Must contain `{timestamp}`.
    pub fn output_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.output_pattern = Some(pattern.into());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if:
    /// - the icon size is zero
    /// - the scale is outside `(0, 1]` or yields an empty glyph
    /// - the output pattern lacks `{timestamp}` or contains a path separator
    /// - the resource subdirectory is absolute
    pub fn build(self) -> Result<Settings> {
        let defaults = IconStyle::default();
        let style = IconStyle {
            foreground: self.foreground.unwrap_or(defaults.foreground),
            background: self.background.unwrap_or(defaults.background),
            size: self.icon_size.unwrap_or(defaults.size),
            scale: self.icon_scale.unwrap_or(defaults.scale),
        };

        if style.size == 0 {
            return Err(Error::InvalidSettings("icon size must be positive".into()));
        }
        if !(style.scale > 0.0 && style.scale <= 1.0) {
            return Err(Error::InvalidSettings(format!(
                "icon scale must be in (0, 1], got {}",
                style.scale
            )));
        }
        if style.glyph_size() == 0 {
            return Err(Error::InvalidSettings(format!(
                "icon scale {} leaves no room for a glyph on a {}px canvas",
                style.scale, style.size
            )));
        }

        let output_pattern = self
            .output_pattern
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATTERN.to_string());
        if !output_pattern.contains(TIMESTAMP_PLACEHOLDER) {
            return Err(Error::InvalidSettings(format!(
                "output pattern {output_pattern:?} must contain {TIMESTAMP_PLACEHOLDER}"
            )));
        }
        if output_pattern.contains(['/', '\\']) {
            return Err(Error::InvalidSettings(format!(
                "output pattern {output_pattern:?} must be a file name"
            )));
        }

        let resource_subdir = self
            .resource_subdir
            .unwrap_or_else(|| PathBuf::from("res").join("drawable-xxhdpi"));
        if resource_subdir.is_absolute() {
            return Err(Error::InvalidSettings(format!(
                "resource subdirectory {} must be relative to the icons template",
                resource_subdir.display()
            )));
        }

        let work_dir = self.work_dir.unwrap_or_else(|| PathBuf::from("."));
        let resolve = |path: Option<PathBuf>, default: &str| {
            let path = path.unwrap_or_else(|| PathBuf::from(default));
            if path.is_absolute() {
                path
            } else {
                work_dir.join(path)
            }
        };

        let layout = TemplateLayout {
            icons_template: resolve(self.icons_template, "icons_template"),
            module_template: resolve(self.module_template, "magisk_template_HyperOS2"),
            extra_templates: self
                .extra_templates
                .into_iter()
                .map(|p| resolve(Some(p), ""))
                .collect(),
            resource_subdir,
        };

        Ok(Settings::new(
            style,
            layout,
            work_dir.clone(),
            resolve(self.appfilter, "appfilter.xml"),
            resolve(self.icon_mapper, "icon_mapper.xml"),
            resolve(self.svg_dir, "svgs"),
            resolve(self.output_dir, "output"),
            output_pattern,
        ))
    }
}
