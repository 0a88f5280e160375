//! Base-directory-relative file sets.
//!
//! A [`RelativeFileSet`] is the value every bundler copy step consumes: a
//! base directory plus the set of files under it that survived collection or
//! runtime subsetting. Membership is stored as relative path strings, so the
//! set can be re-rooted into a bundle layout with a plain join.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::{Error, Result};

/// An immutable set of files, each a strict descendant of a base directory.
///
/// Construction validates containment; the entry equal to the base directory
/// itself is silently dropped rather than rejected. Iteration order is
/// deterministic (lexicographic over the relative paths).
#[derive(Clone, Debug, Serialize)]
pub struct RelativeFileSet {
    base_dir: PathBuf,
    files: BTreeSet<String>,
}

impl RelativeFileSet {
    /// Builds a set from a base directory and any iterator of file paths.
    ///
    /// Every path must lie under `base_dir` (absolute-path prefix
    /// comparison, case-sensitive). A path equal to `base_dir` is skipped.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        files: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self> {
        let base_dir = base_dir.into();
        let base_abs = std::path::absolute(&base_dir)?;

        let mut set = BTreeSet::new();
        for file in files {
            let file_abs = std::path::absolute(&file)?;
            if file_abs == base_abs {
                // the base directory itself carries no payload
                continue;
            }
            let rel = file_abs.strip_prefix(&base_abs).map_err(|_| {
                Error::GenericError(format!(
                    "file {} is not under base directory {}",
                    file_abs.display(),
                    base_abs.display()
                ))
            })?;
            let rel = rel
                .to_str()
                .ok_or_else(|| {
                    Error::GenericError(format!("path {} is not valid UTF-8", rel.display()))
                })?
                .to_string();
            set.insert(rel);
        }

        Ok(Self {
            base_dir,
            files: set,
        })
    }

    /// An empty set rooted at `base_dir`.
    pub fn empty(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: BTreeSet::new(),
        }
    }

    /// The base directory all members are relative to.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Relative member paths, in deterministic order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Whether `relative` names a member of the set (exact string match).
    pub fn contains(&self, relative: &str) -> bool {
        self.files.contains(relative)
    }

    /// Absolute path of a member, or `None` if it is not in the set.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        self.contains(relative)
            .then(|| self.base_dir.join(relative))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_stored_relative_to_base() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("app");
        std::fs::create_dir_all(base.join("lib")).expect("mkdir");
        std::fs::write(base.join("main.jar"), b"jar").expect("write");
        std::fs::write(base.join("lib").join("util.jar"), b"jar").expect("write");

        let set = RelativeFileSet::new(
            &base,
            vec![base.join("main.jar"), base.join("lib").join("util.jar")],
        )
        .expect("fileset");

        assert_eq!(set.len(), 2);
        assert!(set.contains("main.jar"));
        let nested = Path::new("lib").join("util.jar");
        assert!(set.contains(nested.to_str().expect("utf-8")));
    }

    #[test]
    fn file_outside_base_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("app");
        std::fs::create_dir_all(&base).expect("mkdir");
        let stray = tmp.path().join("stray.jar");
        std::fs::write(&stray, b"jar").expect("write");

        let err = RelativeFileSet::new(&base, vec![stray]).expect_err("must fail");
        assert!(err.to_string().contains("not under base directory"));
    }

    #[test]
    fn base_directory_itself_is_silently_dropped() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("app");
        std::fs::create_dir_all(&base).expect("mkdir");

        let set = RelativeFileSet::new(&base, vec![base.clone()]).expect("fileset");
        assert!(set.is_empty());
    }

    #[test]
    fn iteration_order_is_deterministic() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().to_path_buf();
        for name in ["b.jar", "a.jar", "c.jar"] {
            std::fs::write(base.join(name), b"jar").expect("write");
        }
        let set = RelativeFileSet::new(
            &base,
            vec![base.join("b.jar"), base.join("a.jar"), base.join("c.jar")],
        )
        .expect("fileset");
        let order: Vec<&str> = set.files().collect();
        assert_eq!(order, vec!["a.jar", "b.jar", "c.jar"]);
    }
}
