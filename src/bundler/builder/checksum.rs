//! Artifact checksum and size calculation.
//!
//! Every produced bundle gets a SHA-256 checksum. App images are
//! directories, so directory trees are hashed file-by-file in deterministic
//! order (relative path then content).

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::bundler::error::{ErrorExt, Result};

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading metadata", path)?;
    if metadata.is_dir() {
        calculate_directory_sha256(path).await
    } else {
        calculate_file_sha256(path).await
    }
}

/// Total byte size of a file or directory tree.
pub async fn artifact_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading metadata", path)?;
    if !metadata.is_dir() {
        return Ok(metadata.len());
    }

    let root = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut total = 0u64;
        for entry in walkdir::WalkDir::new(&root) {
            let entry = entry?;
            if entry.file_type().is_file() {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    })
    .await
    .map_err(|e| {
        crate::bundler::error::Error::GenericError(format!("size calculation panicked: {e}"))
    })?
}

async fn calculate_file_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];
    loop {
        let n = file.read(&mut buffer).await.fs_context("reading file", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

async fn calculate_directory_sha256(root: &Path) -> Result<String> {
    let mut files: Vec<PathBuf> = Vec::new();
    {
        let root = root.to_path_buf();
        let collected: Result<Vec<PathBuf>> = tokio::task::spawn_blocking(move || {
            let mut out = Vec::new();
            for entry in walkdir::WalkDir::new(&root).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    out.push(entry.into_path());
                }
            }
            Ok(out)
        })
        .await
        .map_err(|e| {
            crate::bundler::error::Error::GenericError(format!("directory hash panicked: {e}"))
        })?;
        files.extend(collected?);
    }
    files.sort();

    let mut hasher = Sha256::new();
    for file in files {
        let rel = file.strip_prefix(root)?;
        hasher.update(rel.to_string_lossy().as_bytes());
        let content = tokio::fs::read(&file)
            .await
            .fs_context("reading file", &file)?;
        hasher.update(&content);
    }
    Ok(hex::encode(hasher.finalize()))
}
