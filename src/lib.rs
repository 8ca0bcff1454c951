//! Monet themed HyperOS icon pack builder.
//!
//! This library provides the pipeline that turns an Android `appfilter.xml`
//! and a directory of SVG icons into:
//! - `icon_mapper.xml`, one row per application package
//! - `output/<package>/{0,1}.png` background and foreground layers
//! - an `icons` theme archive and a timestamped Magisk module zip
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{CliError, IconPackError, Result};
