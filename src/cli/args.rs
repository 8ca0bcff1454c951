//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap. Flags override the
//! configuration file, which overrides the built-in defaults.

use crate::config::{ConfigFile, DEFAULT_CONFIG_FILE};
use crate::pipeline::{Color, SettingsBuilder};
use clap::Parser;
use std::path::PathBuf;

/// Material You themed icon pack builder for HyperOS
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hypermonet_iconpack",
    version,
    about = "Builds a Monet themed HyperOS icon pack Magisk module from SVG icons",
    long_about = "Builds a Monet themed HyperOS icon pack Magisk module from SVG icons.

Reads appfilter.xml, renders every mapped SVG onto a solid background, packs the
icons template into an `icons` archive and the module template into a
timestamped Magisk module zip in the work directory.

Usage:
  hypermonet_iconpack
  hypermonet_iconpack --work-dir ~/iconpack --fg-color '#1c232b' --bg-color '#d1e2fc'
  hypermonet_iconpack --config light.toml --report run.json

Exit code 0 = module archive written."
)]
pub struct Args {
    /// Directory holding appfilter.xml, svgs/ and the templates
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".", env = "ICONPACK_WORK_DIR")]
    pub work_dir: PathBuf,

    /// Configuration file (default: <work-dir>/iconpack.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Glyph color, e.g. #d1e2fc
    #[arg(long, value_name = "HEX")]
    pub fg_color: Option<Color>,

    /// Background color, e.g. #1c232b
    #[arg(long, value_name = "HEX")]
    pub bg_color: Option<Color>,

    /// Icon canvas edge in pixels
    #[arg(long, value_name = "PX")]
    pub icon_size: Option<u32>,

    /// Glyph fraction of the canvas, in (0, 1]
    #[arg(long, value_name = "FRACTION")]
    pub icon_scale: Option<f64>,

    /// Source appfilter
    #[arg(long, value_name = "FILE")]
    pub appfilter: Option<PathBuf>,

    /// Directory of <drawable>.svg files
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,

    /// Directory receiving <package>/{0,1}.png
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Template packed into the `icons` archive
    #[arg(long, value_name = "DIR")]
    pub icons_template: Option<PathBuf>,

    /// Template packed into the module archive
    #[arg(long, value_name = "DIR")]
    pub module_template: Option<PathBuf>,

    /// Module file name; must contain {timestamp}
    #[arg(long, value_name = "PATTERN")]
    pub output_pattern: Option<String>,

    /// Write the run report as JSON to this path
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.work_dir.is_dir() {
            return Err(format!(
                "Work directory does not exist: {}",
                self.work_dir.display()
            ));
        }
        if let Some(report) = &self.report {
            if report.is_dir() {
                return Err(format!("Report path is a directory: {}", report.display()));
            }
        }
        Ok(())
    }

    /// Configuration file to load and whether it must exist.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (self.work_dir.join(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Layers flags over the configuration file.
    pub fn settings_builder(&self, config: ConfigFile) -> SettingsBuilder {
        let mut builder = config.apply(SettingsBuilder::new().work_dir(&self.work_dir));

        if let Some(color) = self.fg_color {
            builder = builder.foreground(color);
        }
        if let Some(color) = self.bg_color {
            builder = builder.background(color);
        }
        if let Some(size) = self.icon_size {
            builder = builder.icon_size(size);
        }
        if let Some(scale) = self.icon_scale {
            builder = builder.icon_scale(scale);
        }
        if let Some(path) = &self.appfilter {
            builder = builder.appfilter(path);
        }
        if let Some(path) = &self.svg_dir {
            builder = builder.svg_dir(path);
        }
        if let Some(path) = &self.output_dir {
            builder = builder.output_dir(path);
        }
        if let Some(path) = &self.icons_template {
            builder = builder.icons_template(path);
        }
        if let Some(path) = &self.module_template {
            builder = builder.module_template(path);
        }
        if let Some(pattern) = &self.output_pattern {
            builder = builder.output_pattern(pattern.clone());
        }
        builder
    }
}
