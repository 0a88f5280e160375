//! File system utilities for bundling.
//!
//! Provides safe file operations with automatic directory creation,
//! symlink preservation, and comprehensive error handling.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::bundler::error::{Error, ErrorExt, Result};
use crate::bundler::fileset::RelativeFileSet;

/// Creates all of the directories of the specified path, erasing it first if
/// specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists. Idempotent.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file, creating any parent directories of the destination
/// path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory, creating any parent directories of the
/// destination path as necessary. Preserves symlinks.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)?;
                } else {
                    symlink_file(&target, &dest_path)?;
                }
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(dest_path)?;
            } else {
                std::fs::copy(entry.path(), dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("directory copy task panicked: {e}")))?
}

/// Re-roots every member of a file set under `dest`, preserving the relative
/// layout. Member paths that are symlinks are recreated, not followed.
pub async fn copy_file_set(set: &RelativeFileSet, dest: &Path) -> Result<()> {
    for rel in set.files() {
        let from = set.base_dir().join(rel);
        let to = dest.join(rel);
        let meta = from
            .symlink_metadata()
            .fs_context("inspecting file", &from)?;
        if meta.file_type().is_symlink() {
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)
                    .await
                    .fs_context("creating directory", parent)?;
            }
            let target = std::fs::read_link(&from).fs_context("reading link", &from)?;
            symlink_file(&target, &to).fs_context("creating link", &to)?;
        } else {
            copy_file(&from, &to).await?;
        }
    }
    Ok(())
}

/// Marks a file executable. No-op on platforms without a mode bit.
#[cfg(unix)]
pub async fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .await
        .fs_context("reading permissions", path)?
        .permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
        .await
        .fs_context("setting permissions", path)
}

#[cfg(not(unix))]
pub async fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_dir_all_erase_wipes_existing_content() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("image");
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join("stale.txt"), b"old").expect("write");

        create_dir_all(&dir, true).await.expect("recreate");
        assert!(dir.is_dir());
        assert!(!dir.join("stale.txt").exists());
    }

    #[tokio::test]
    async fn remove_dir_all_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let gone = tmp.path().join("never-existed");
        remove_dir_all(&gone).await.expect("first");
        remove_dir_all(&gone).await.expect("second");
    }

    #[tokio::test]
    async fn copy_file_creates_parents() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src.txt");
        std::fs::write(&src, b"payload").expect("write");

        let dest = tmp.path().join("a/b/c/dest.txt");
        copy_file(&src, &dest).await.expect("copy");
        assert_eq!(std::fs::read(&dest).expect("read"), b"payload");
    }

    #[tokio::test]
    async fn copy_file_set_preserves_layout() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("base");
        std::fs::create_dir_all(base.join("lib")).expect("mkdir");
        std::fs::write(base.join("main.jar"), b"a").expect("write");
        std::fs::write(base.join("lib/util.jar"), b"b").expect("write");

        let set = RelativeFileSet::new(
            &base,
            vec![base.join("main.jar"), base.join("lib/util.jar")],
        )
        .expect("set");

        let dest = tmp.path().join("out");
        copy_file_set(&set, &dest).await.expect("copy");
        assert!(dest.join("main.jar").is_file());
        assert!(dest.join("lib/util.jar").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_dir_preserves_symlinks() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).expect("mkdir");
        std::fs::write(src.join("real.so"), b"lib").expect("write");
        std::os::unix::fs::symlink("real.so", src.join("alias.so")).expect("symlink");

        let dest = tmp.path().join("dest");
        copy_dir(&src, &dest).await.expect("copy");
        assert!(
            dest.join("alias.so")
                .symlink_metadata()
                .expect("meta")
                .file_type()
                .is_symlink()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn set_executable_adds_mode_bits() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().expect("tempdir");
        let file = tmp.path().join("launcher");
        std::fs::write(&file, b"#!/bin/sh\n").expect("write");

        set_executable(&file).await.expect("chmod");
        let mode = std::fs::metadata(&file).expect("meta").permissions().mode();
        assert_eq!(mode & 0o755, 0o755);
    }
}
