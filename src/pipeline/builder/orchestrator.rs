//! Main pipeline orchestration.
//!
//! This module provides the [`Pipeline`] orchestrator that runs the stages in
//! order and assembles the [`RunReport`].

use crate::pipeline::{
    Result, Settings,
    error::ErrorExt,
    report::{ModuleArtifact, RunReport},
    stages::{cleaner, icons, mapping, packer},
};

use super::checksum::{file_sha256, tree_sha256};

/// Runs `Clean → Map → Render → Pack(icons) → Pack(module)`.
///
/// Stages run strictly one after another. A failure inside a single icon is
/// recorded in the report; any other failure stops the run.
///
/// # Examples
///
/// ```no_run
/// use hypermonet_iconpack::pipeline::{Pipeline, SettingsBuilder};
///
/// # async fn example() -> hypermonet_iconpack::pipeline::Result<()> {
/// let settings = SettingsBuilder::new().work_dir("iconpack").build()?;
/// let report = Pipeline::new(settings).run().await?;
///
/// println!(
///     "{} of {} icons -> {} (sha256 {})",
///     report.render.generated(),
///     report.render.total(),
///     report.module.path.display(),
///     report.module.checksum,
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    /// Creates a pipeline for the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the pipeline settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Executes every stage and returns what was produced.
    pub async fn run(&self) -> Result<RunReport> {
        let settings = &self.settings;

        log::info!("(1/4) Cleaner: removing previous artifacts");
        let clean = cleaner::cleanup(&cleaner::cleanup_targets(settings)).await?;

        log::info!("(2/4) MappingProcessor: normalizing appfilter");
        let mapping = mapping::convert_icon_mapper(settings.appfilter(), settings.icon_mapper()).await?;

        log::info!("(3/4) IconProcessor: rendering icons");
        log::info!("  (1/4) Reading icon mapper");
        let entries = mapping::read_icon_mapper(settings.icon_mapper()).await?;
        let render = icons::generate_icons(
            &entries,
            settings.svg_dir(),
            settings.output_dir(),
            settings.style(),
        )
        .await?;
        let icons_digest = tree_sha256(settings.output_dir()).await?;

        log::info!("(4/4) ThemePacker: packing");
        let icons_archive = packer::pack_icons_archive(settings.output_dir(), settings.layout()).await?;
        let module_path = packer::pack_final_module(
            &settings.layout().module_template,
            settings.output_pattern(),
            settings.work_dir(),
            &icons_archive,
        )
        .await?;

        let size = tokio::fs::metadata(&module_path)
            .await
            .fs_context("reading module archive metadata", &module_path)?
            .len();
        let checksum = file_sha256(&module_path).await?;

        log::info!("Done: {} ({} bytes, sha256 {})", module_path.display(), size, checksum);

        Ok(RunReport {
            clean,
            mapping,
            render,
            icons_digest,
            icons_archive_size: icons_archive.bytes().len() as u64,
            module: ModuleArtifact {
                path: module_path,
                size,
                checksum,
            },
        })
    }
}
