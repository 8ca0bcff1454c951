//! Configuration structures for the icon pack pipeline.
//!
//! This module provides the immutable [`Settings`] record passed to every
//! stage, the [`IconStyle`] and [`TemplateLayout`] it is composed of, and the
//! [`SettingsBuilder`] that applies defaults and validation.

mod builder;
mod color;
mod core;
mod layout;
mod style;

pub use builder::{DEFAULT_OUTPUT_PATTERN, SettingsBuilder, TIMESTAMP_PLACEHOLDER};
pub use color::Color;
pub use core::Settings;
pub use layout::{ICONS_ARCHIVE_NAME, ICONS_TEMP_ARCHIVE_NAME, TemplateLayout};
pub use style::IconStyle;
