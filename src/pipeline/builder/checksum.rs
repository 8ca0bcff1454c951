//! SHA-256 digests of generated artifacts.
//!
//! The module archive embeds wall-clock timestamps, so two runs never produce
//! the same archive bytes. The digest of the generated icon tree is what stays
//! stable between runs with the same inputs.

use crate::pipeline::{
    error::{ErrorExt, Result, join_blocking},
    utils::fs::{archive_name, walk_files},
};
use sha2::{Digest, Sha256};
use std::{
    io::{self, Read},
    path::Path,
};

/// Hex-encoded SHA-256 of a single file.
pub async fn file_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    join_blocking("file hashing", move || {
        let mut file = std::fs::File::open(&path).fs_context("opening file for hashing", &path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher).fs_context("reading file for hashing", &path)?;
        Ok(format!("{:x}", hasher.finalize()))
    })
    .await
}

/// Hex-encoded SHA-256 over a directory tree.
///
/// Files are visited in sorted order; each contributes its `/`-separated
/// relative path, its length and its content, so renames and moves change
/// the digest while timestamps and permissions do not.
pub async fn tree_sha256(root: &Path) -> Result<String> {
    let root = root.to_path_buf();
    join_blocking("tree hashing", move || {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 8192];

        for (abs, rel) in walk_files(&root)? {
            let mut file = std::fs::File::open(&abs).fs_context("opening file for hashing", &abs)?;
            let len = file
                .metadata()
                .fs_context("reading file metadata", &abs)?
                .len();

            hasher.update(archive_name(&rel).as_bytes());
            hasher.update([0u8]);
            hasher.update(len.to_le_bytes());

            loop {
                let n = file
                    .read(&mut buffer)
                    .fs_context("reading file for hashing", &abs)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
        }

        Ok(format!("{:x}", hasher.finalize()))
    })
    .await
}
