//! Removal of artifacts left by a previous run.

use crate::pipeline::{
    error::Result,
    report::{CleanReport, RemovedPath},
    settings::{ICONS_ARCHIVE_NAME, ICONS_TEMP_ARCHIVE_NAME, Settings},
    utils::fs::{RemovedKind, remove_path},
};
use std::path::PathBuf;

/// Every path a run may have generated, in removal order.
pub fn cleanup_targets(settings: &Settings) -> Vec<PathBuf> {
    let layout = settings.layout();
    let mut targets = vec![
        settings.output_dir().to_path_buf(),
        layout.resource_dir(),
        layout.icons_template.join(ICONS_TEMP_ARCHIVE_NAME),
    ];
    targets.extend(layout.all_templates().map(|t| t.join(ICONS_ARCHIVE_NAME)));
    targets.push(settings.icon_mapper().to_path_buf());
    targets
}

/// Removes each target that exists.
///
/// Absent paths are skipped silently. A path that exists but cannot be
/// removed aborts the run, since it would otherwise end up in the archives.
pub async fn cleanup(targets: &[PathBuf]) -> Result<CleanReport> {
    log::info!("  (1/1) Cleaning {} paths", targets.len());
    let mut report = CleanReport::default();

    for path in targets {
        if let Some(kind) = remove_path(path).await? {
            match kind {
                RemovedKind::File => log::info!("    Removed file: {}", path.display()),
                RemovedKind::Directory => log::info!("    Removed directory: {}", path.display()),
            }
            report.removed.push(RemovedPath {
                path: path.clone(),
                kind,
            });
        }
    }

    Ok(report)
}
