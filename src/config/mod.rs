//! Configuration file loading.
//!
//! An optional `iconpack.toml` in the work directory (or any file passed with
//! `--config`) overrides the built-in defaults. Every key is optional:
//!
//! ```toml
//! foreground = "#1c232b"
//! background = "#d1e2fc"
//! icon-size = 432
//! icon-scale = 0.4
//! svg-dir = "lawnicons/svgs"
//! module-template = "magisk_template_HyperOS2"
//! extra-templates = ["mtz_template_HyperOS2"]
//! output-pattern = "magisk_module_Lawnicon_HyperMonetTheme_{timestamp}.zip"
//! ```

use crate::error::{CliError, IconPackError, Result};
use crate::pipeline::{Color, SettingsBuilder};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the work directory.
pub const DEFAULT_CONFIG_FILE: &str = "iconpack.toml";

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub icon_size: Option<u32>,
    pub icon_scale: Option<f64>,
    pub appfilter: Option<PathBuf>,
    pub icon_mapper: Option<PathBuf>,
    pub svg_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub icons_template: Option<PathBuf>,
    pub module_template: Option<PathBuf>,
    #[serde(default)]
    pub extra_templates: Vec<PathBuf>,
    pub resource_subdir: Option<PathBuf>,
    pub output_pattern: Option<String>,
}

impl ConfigFile {
    /// Applies every key that is set onto `builder`.
    pub fn apply(self, mut builder: SettingsBuilder) -> SettingsBuilder {
        if let Some(color) = self.foreground {
            builder = builder.foreground(color);
        }
        if let Some(color) = self.background {
            builder = builder.background(color);
        }
        if let Some(size) = self.icon_size {
            builder = builder.icon_size(size);
        }
        if let Some(scale) = self.icon_scale {
            builder = builder.icon_scale(scale);
        }
        if let Some(path) = self.appfilter {
            builder = builder.appfilter(path);
        }
        if let Some(path) = self.icon_mapper {
            builder = builder.icon_mapper(path);
        }
        if let Some(path) = self.svg_dir {
            builder = builder.svg_dir(path);
        }
        if let Some(path) = self.output_dir {
            builder = builder.output_dir(path);
        }
        if let Some(path) = self.icons_template {
            builder = builder.icons_template(path);
        }
        if let Some(path) = self.module_template {
            builder = builder.module_template(path);
        }
        if !self.extra_templates.is_empty() {
            builder = builder.extra_templates(self.extra_templates);
        }
        if let Some(path) = self.resource_subdir {
            builder = builder.resource_subdir(path);
        }
        if let Some(pattern) = self.output_pattern {
            builder = builder.output_pattern(pattern);
        }
        builder
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(text)?)
}

/// Loads a configuration file.
///
/// With `required` false a missing file yields the empty configuration.
pub fn load_config(path: &Path, required: bool) -> Result<ConfigFile> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(ConfigFile::default());
        }
        Err(e) => {
            return Err(IconPackError::Cli(CliError::ExecutionFailed {
                command: "read_config".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            }));
        }
    };

    log::info!("Using config file {}", path.display());
    parse_config(&text)
}
