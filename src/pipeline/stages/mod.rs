//! The four pipeline stages, in run order.
//!
//! - [`cleaner`] - removes artifacts of the previous run
//! - [`mapping`] - normalizes `appfilter.xml` into `icon_mapper.xml`
//! - [`icons`] - renders a background/foreground pair per package
//! - [`packer`] - builds the `icons` archive and the module archive

pub mod cleaner;
pub mod icons;
pub mod mapping;
pub mod packer;
