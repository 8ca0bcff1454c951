//! File system utilities for pipeline stages.
//!
//! Provides idempotent removal and creation, recursive copies, and the
//! sorted tree walk used by both archive phases.

use crate::pipeline::error::{Error, ErrorExt, Result, join_blocking};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// What kind of filesystem entry a removal deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovedKind {
    /// A regular file or symlink
    File,
    /// A directory and its contents
    Directory,
}

/// Removes a file or directory if it exists.
///
/// Symlinks are removed as files and never followed. Returns `None` when
/// nothing was there.
pub async fn remove_path(path: &Path) -> Result<Option<RemovedKind>> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).fs_context("inspecting stale path", path),
    };

    let (result, kind) = if metadata.is_dir() {
        (fs::remove_dir_all(path).await, RemovedKind::Directory)
    } else {
        (fs::remove_file(path).await, RemovedKind::File)
    };

    match result {
        Ok(()) => Ok(Some(kind)),
        // Raced with another remover; still gone
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).fs_context("removing stale path", path),
    }
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).fs_context("erasing directory", path),
        }
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Fails if the source path is not a directory or doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{from:?} is not a directory"
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    join_blocking("directory copy", move || {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating destination parent", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from).sort_by_file_name() {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)
                    .fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
}

/// Lists every regular file under `root` as `(absolute, relative)` pairs.
///
/// Entries are sorted by file name at each level so archives and digests are
/// deterministic. Symlinks are followed; broken links fail the walk.
pub fn walk_files(root: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(root)?.to_path_buf();
            files.push((entry.path().to_path_buf(), rel));
        }
    }
    Ok(files)
}

/// Converts a relative path into a `/`-separated archive entry name.
pub fn archive_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_path_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("icon_mapper.xml");
        let dir = tmp.path().join("output");
        std::fs::write(&file, "x").unwrap();
        std::fs::create_dir_all(dir.join("com.example")).unwrap();

        assert_eq!(remove_path(&file).await.unwrap(), Some(RemovedKind::File));
        assert_eq!(remove_path(&dir).await.unwrap(), Some(RemovedKind::Directory));
        assert_eq!(remove_path(&file).await.unwrap(), None);
        assert_eq!(remove_path(&dir).await.unwrap(), None);
        assert!(!file.exists() && !dir.exists());
    }

    #[tokio::test]
    async fn create_dir_all_erases_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("res/drawable-xxhdpi");
        std::fs::create_dir_all(dir.join("stale")).unwrap();

        create_dir_all(&dir, true).await.unwrap();

        assert!(dir.is_dir());
        assert!(!dir.join("stale").exists());
    }

    #[tokio::test]
    async fn copy_dir_copies_nested_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(src.join("a/b")).unwrap();
        std::fs::write(src.join("a/b/0.png"), b"png").unwrap();
        std::fs::write(src.join("top.txt"), b"top").unwrap();

        let dst = tmp.path().join("deep/dst");
        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read(dst.join("a/b/0.png")).unwrap(), b"png");
        assert_eq!(std::fs::read(dst.join("top.txt")).unwrap(), b"top");
    }

    #[test]
    fn walk_files_is_sorted_and_relative() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("b")).unwrap();
        std::fs::write(tmp.path().join("b/2"), b"").unwrap();
        std::fs::write(tmp.path().join("a"), b"").unwrap();
        std::fs::write(tmp.path().join("c"), b"").unwrap();

        let names: Vec<String> = walk_files(tmp.path())
            .unwrap()
            .into_iter()
            .map(|(_, rel)| archive_name(&rel))
            .collect();
        assert_eq!(names, ["a", "b/2", "c"]);
    }
}
