//! Per-item outcomes collected while the pipeline runs.
//!
//! Recoverable problems (a malformed appfilter row, a missing SVG, an SVG that
//! fails to render) never abort the run. They are logged and recorded here so
//! callers and tests can inspect exactly what was skipped and why.

use super::utils::fs::RemovedKind;
use serde::Serialize;
use std::path::PathBuf;

/// Paths deleted by the cleaner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Every path that existed and was removed, in cleanup order.
    pub removed: Vec<RemovedPath>,
}

/// A single removed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedPath {
    pub path: PathBuf,
    pub kind: RemovedKind,
}

/// Why an appfilter row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSkipReason {
    /// No `component` attribute, or an empty one
    MissingComponent,
    /// No `drawable` attribute, or an empty one
    MissingDrawable,
    /// Component is not `ComponentInfo{<package>/<class>}`
    UnparseableComponent,
}

/// A dropped appfilter row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSkip {
    /// Zero-based position among the `item` rows.
    pub index: usize,
    pub component: String,
    pub drawable: String,
    pub reason: MappingSkipReason,
}

/// Result of normalizing the appfilter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingReport {
    /// Number of `item` rows in the source table.
    pub items_read: usize,
    /// Number of unique packages written.
    pub packages: usize,
    /// Rows dropped before deduplication.
    pub skipped: Vec<MappingSkip>,
}

/// What happened to one package during rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IconOutcome {
    /// Both `0.png` and `1.png` were written.
    Generated,
    /// `<drawable>.svg` does not exist; no directory was created.
    MissingAsset { svg_path: PathBuf },
    /// The SVG could not be rasterized; only `0.png` was written.
    RenderFailed { reason: String },
}

/// Outcome for a single mapped package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconResult {
    pub package: String,
    pub drawable: String,
    pub outcome: IconOutcome,
}

/// Result of the render stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    pub results: Vec<IconResult>,
}

impl RenderReport {
    /// Number of packages in the mapping.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of packages with a generated icon pair.
    pub fn generated(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == IconOutcome::Generated)
            .count()
    }

    /// Packages that were skipped or failed.
    pub fn skipped(&self) -> impl Iterator<Item = &IconResult> {
        self.results
            .iter()
            .filter(|r| r.outcome != IconOutcome::Generated)
    }

    /// Outcome for a package, if it was mapped.
    pub fn outcome(&self, package: &str) -> Option<&IconOutcome> {
        self.results
            .iter()
            .find(|r| r.package == package)
            .map(|r| &r.outcome)
    }
}

/// The final module archive.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleArtifact {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the archive.
    pub checksum: String,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub clean: CleanReport,
    pub mapping: MappingReport,
    pub render: RenderReport,
    /// SHA-256 over the generated `<package>/{0,1}.png` tree; stable across
    /// runs with identical inputs.
    pub icons_digest: String,
    /// Size of the inner `icons` archive in bytes.
    pub icons_archive_size: u64,
    pub module: ModuleArtifact,
}
