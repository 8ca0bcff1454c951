//! Template tree layout for the two archive phases.

use std::path::{Path, PathBuf};

/// Name of the packed icons archive inside both templates and the module zip.
pub const ICONS_ARCHIVE_NAME: &str = "icons";

/// Legacy temporary name of the icons archive, still removed by the cleaner.
pub const ICONS_TEMP_ARCHIVE_NAME: &str = "icons.zip";

/// Where the icon pack is assembled and where the module is staged.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLayout {
    /// Tree packed into the inner `icons` archive.
    pub icons_template: PathBuf,

    /// Tree packed into the final module archive.
    pub module_template: PathBuf,

    /// Further templates that receive a copy of `icons` from older runs
    /// (for example an mtz theme template); only cleaned.
    pub extra_templates: Vec<PathBuf>,

    /// Density bucket inside the icons template, relative to it.
    pub resource_subdir: PathBuf,
}

impl TemplateLayout {
    /// Directory populated with per-package icon pairs.
    pub fn resource_dir(&self) -> PathBuf {
        self.icons_template.join(&self.resource_subdir)
    }

    /// Inner archive persisted inside the icons template.
    pub fn icons_archive_path(&self) -> PathBuf {
        self.icons_template.join(ICONS_ARCHIVE_NAME)
    }

    /// Copy of the inner archive staged in the module template.
    pub fn module_icons_path(&self) -> PathBuf {
        self.module_template.join(ICONS_ARCHIVE_NAME)
    }

    /// Every template that may hold a stale `icons` archive.
    pub fn all_templates(&self) -> impl Iterator<Item = &Path> {
        [self.icons_template.as_path(), self.module_template.as_path()]
            .into_iter()
            .chain(self.extra_templates.iter().map(PathBuf::as_path))
    }
}
