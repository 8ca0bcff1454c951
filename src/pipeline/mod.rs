//! Icon pack pipeline library.
//!
//! Turns an `appfilter.xml` and a directory of SVG icons into a HyperOS
//! themed icon pack packaged as a Magisk module:
//!
//! 1. [`stages::cleaner`] removes the previous run's artifacts
//! 2. [`stages::mapping`] reduces the appfilter to one row per package
//! 3. [`stages::icons`] renders a background and a recolored glyph per package
//! 4. [`stages::packer`] builds the `icons` archive, then the module archive
//!
//! [`Pipeline`] runs all of them with one immutable [`Settings`] value.

pub mod builder;
pub mod error;
pub mod report;
pub mod settings;
pub mod stages;
pub mod utils;

pub use builder::Pipeline;
pub use error::{Error, Result};
pub use report::RunReport;
pub use settings::{Color, IconStyle, Settings, SettingsBuilder, TemplateLayout};
