//! Two-phase archive assembly.
//!
//! Phase 1 copies the generated icon pairs into the icons template's density
//! bucket and packs that whole template into the `icons` archive, held in
//! memory as an [`IconsArchive`]. Phase 2 packs the module template and embeds
//! the phase 1 bytes as its `icons` entry. Phase 2 takes the archive by
//! reference, so it cannot run before phase 1 has finished.
//!
//! Both archives use stored (uncompressed) entries; the theme engine reads
//! some resources directly out of the archive.

use crate::pipeline::{
    error::{ErrorExt, Result, join_blocking},
    settings::{ICONS_ARCHIVE_NAME, ICONS_TEMP_ARCHIVE_NAME, TIMESTAMP_PLACEHOLDER, TemplateLayout},
    utils::fs::{archive_name, copy_dir, create_dir_all, walk_files},
};
use std::{
    io::{self, Cursor, Seek, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Format of the module file name timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The packed icons template.
#[derive(Debug, Clone)]
pub struct IconsArchive {
    bytes: Arc<[u8]>,
    icons_template_path: PathBuf,
    module_template_path: PathBuf,
}

impl IconsArchive {
    /// Raw archive bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy persisted inside the icons template.
    pub fn icons_template_path(&self) -> &Path {
        &self.icons_template_path
    }

    /// Copy staged inside the module template.
    pub fn module_template_path(&self) -> &Path {
        &self.module_template_path
    }
}

fn stored_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

/// Writes files and in-memory entries into a stored zip.
///
/// `files` are `(absolute, relative)` pairs; entry names are the relative
/// paths joined with `/`.
fn write_stored_zip<W: Write + Seek>(
    writer: W,
    files: &[(PathBuf, PathBuf)],
    extra: &[(&str, &[u8])],
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = stored_options();

    for (abs, rel) in files {
        zip.start_file(archive_name(rel), options)?;
        let mut file = std::fs::File::open(abs).fs_context("opening file for archiving", abs)?;
        io::copy(&mut file, &mut zip).fs_context("archiving file", abs)?;
    }

    for (name, data) in extra {
        zip.start_file(*name, options)?;
        zip.write_all(data)?;
    }

    Ok(zip.finish()?)
}

/// True for an `icons`/`icons.zip` left at the template root by an earlier run.
fn is_stale_root_archive(rel: &Path) -> bool {
    rel == Path::new(ICONS_ARCHIVE_NAME) || rel == Path::new(ICONS_TEMP_ARCHIVE_NAME)
}

/// True for module template files that go into the module archive.
///
/// Files below a directory whose path contains `icons` are unpacked icon
/// resources, and the root `icons` is replaced by the freshly built archive.
/// Files at the template root are kept whatever their name.
fn is_module_entry(rel: &Path) -> bool {
    if rel == Path::new(ICONS_ARCHIVE_NAME) {
        return false;
    }
    rel.parent()
        .is_none_or(|dir| !archive_name(dir).contains(ICONS_ARCHIVE_NAME))
}

/// Builds the `icons` archive from the generated icon pairs (phase 1).
///
/// Clears and recreates the density bucket, copies every package directory
/// from `output_dir` into it, packs the icons template, then writes the
/// archive as `icons` into both the icons and module templates.
pub async fn pack_icons_archive(output_dir: &Path, layout: &TemplateLayout) -> Result<IconsArchive> {
    let resource_dir = layout.resource_dir();
    log::info!("  (1/6) Preparing {}", resource_dir.display());
    create_dir_all(&resource_dir, true).await?;

    log::info!("  (2/6) Copying icons from {}", output_dir.display());
    let mut packages = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir)
        .await
        .fs_context("reading icon output directory", output_dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading icon output directory", output_dir)?
    {
        let file_type = entry
            .file_type()
            .await
            .fs_context("inspecting icon output entry", entry.path())?;
        if file_type.is_dir() {
            packages.push(entry.path());
        }
    }
    packages.sort();
    for package_dir in &packages {
        if let Some(name) = package_dir.file_name() {
            copy_dir(package_dir, &resource_dir.join(name)).await?;
        }
    }
    log::debug!("Copied {} package directories", packages.len());

    log::info!("  (3/6) Packing {}", layout.icons_template.display());
    let template = layout.icons_template.clone();
    let bytes = join_blocking("icons archive", move || {
        let files: Vec<_> = walk_files(&template)?
            .into_iter()
            .filter(|(_, rel)| !is_stale_root_archive(rel))
            .collect();
        log::debug!("Archiving {} files from {}", files.len(), template.display());
        Ok(write_stored_zip(Cursor::new(Vec::new()), &files, &[])?.into_inner())
    })
    .await?;

    log::info!("  (4/6) Staging icons in the templates");
    let icons_template_path = layout.icons_archive_path();
    let module_template_path = layout.module_icons_path();
    for path in [&icons_template_path, &module_template_path] {
        tokio::fs::write(path, &bytes)
            .await
            .fs_context("writing icons archive", path)?;
    }

    Ok(IconsArchive {
        bytes: Arc::from(bytes),
        icons_template_path,
        module_template_path,
    })
}

/// Expands `{timestamp}` in the module file name pattern.
pub fn module_file_name(pattern: &str, now: chrono::DateTime<chrono::Local>) -> String {
    pattern.replace(TIMESTAMP_PLACEHOLDER, &now.format(TIMESTAMP_FORMAT).to_string())
}

/// Packs the module template into `<dest_dir>/<pattern>` (phase 2).
///
/// Every file of the template is stored under its path relative to the
/// template root, except the staged `icons` copy and anything inside a
/// directory whose path contains `icons`. The phase 1 archive is then added
/// as the `icons` entry.
pub async fn pack_final_module(
    module_template: &Path,
    output_pattern: &str,
    dest_dir: &Path,
    icons: &IconsArchive,
) -> Result<PathBuf> {
    log::info!("  (5/6) Packing {}", module_template.display());
    let target = dest_dir.join(module_file_name(output_pattern, chrono::Local::now()));

    let template = module_template.to_path_buf();
    let bytes = Arc::clone(&icons.bytes);
    let module_path = target.clone();
    join_blocking("module archive", move || {
        let files: Vec<_> = walk_files(&template)?
            .into_iter()
            .filter(|(abs, rel)| abs != &module_path && is_module_entry(rel))
            .collect();
        log::debug!("Archiving {} files from {}", files.len(), template.display());

        if let Some(parent) = module_path.parent() {
            std::fs::create_dir_all(parent).fs_context("creating module directory", parent)?;
        }
        let file = std::fs::File::create(&module_path)
            .fs_context("creating module archive", &module_path)?;
        let mut file = write_stored_zip(file, &files, &[(ICONS_ARCHIVE_NAME, &bytes[..])])?;
        file.flush().fs_context("flushing module archive", &module_path)?;
        Ok(())
    })
    .await?;

    log::info!("  (6/6) Module archive written ({})", target.display());
    Ok(target)
}
