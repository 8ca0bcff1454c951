//! Pipeline orchestration.
//!
//! - [`checksum`] - SHA-256 digests of the module archive and icon tree
//! - [`orchestrator`] - the [`Pipeline`] runner

pub mod checksum;
mod orchestrator;

pub use orchestrator::Pipeline;
