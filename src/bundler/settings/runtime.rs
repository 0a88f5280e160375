//! Java runtime location checks and subsetting.
//!
//! Packaging a runtime is optional; when one is requested its directory must
//! actually be a JDK image with JavaFX in it. Three marker files prove that:
//! the `java` executable, `rt.jar`, and `jfxrt.jar` in one of its known
//! locations. The selected runtime is then subsetted through the OS ruleset
//! so deployment machinery never ships inside an app bundle.

use std::path::{Path, PathBuf};

use crate::bundler::error::{Error, Result};
use crate::bundler::fileset::RelativeFileSet;
use crate::bundler::rules;

use super::TargetOs;

const JFXRT_LOCATIONS: &[&str] = &[
    "lib/ext/jfxrt.jar",
    "lib/jfxrt.jar",
    "jre/lib/ext/jfxrt.jar",
    "jre/lib/jfxrt.jar",
];

fn java_executable() -> &'static str {
    if TargetOs::current() == TargetOs::Windows {
        "bin/java.exe"
    } else {
        "bin/java"
    }
}

/// On macOS a JDK root wraps the actual java home in `Contents/Home`.
fn normalize(base: &Path) -> PathBuf {
    if TargetOs::current() == TargetOs::MacOs {
        let home = base.join("Contents/Home");
        if home.is_dir() {
            return home;
        }
    }
    base.to_path_buf()
}

/// Checks that `base`, when given, points at a JDK image with JavaFX.
///
/// `None` passes through: it means "use the system-installed runtime".
/// Returns the normalized java home on success.
pub fn validate_runtime_location(base: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(base) = base else {
        return Ok(None);
    };
    let home = normalize(base);

    if !home.join(java_executable()).is_file() {
        return Err(Error::config(
            format!(
                "runtime directory {} has no {} executable",
                home.display(),
                java_executable()
            ),
            "point the runtime setting at a JDK installation root",
        ));
    }
    if !home.join("lib/rt.jar").is_file() && !home.join("jre/lib/rt.jar").is_file() {
        return Err(Error::config(
            format!("runtime directory {} has no rt.jar", home.display()),
            "point the runtime setting at a JDK installation root",
        ));
    }
    if !JFXRT_LOCATIONS.iter().any(|rel| home.join(rel).is_file()) {
        return Err(Error::config(
            format!("runtime directory {} has no jfxrt.jar", home.display()),
            "install a JDK that bundles JavaFX, or co-locate jfxrt.jar in its lib directory",
        ));
    }

    Ok(Some(home))
}

/// Builds the subsetted runtime file set rooted at the image to copy.
///
/// On macOS the whole JDK bundle (the directory *containing*
/// `Contents/Home`) is the copy root; elsewhere it is the java home itself.
pub fn select_runtime(base: &Path) -> Result<RelativeFileSet> {
    let root = if TargetOs::current() == TargetOs::MacOs && base.ends_with("Contents/Home") {
        // step back up to the .jdk bundle root
        base.ancestors().nth(2).unwrap_or(base).to_path_buf()
    } else {
        base.to_path_buf()
    };

    let rules = rules::ruleset_for(TargetOs::current());
    let mut files = Vec::new();
    rules::walk(&root, &root, &rules, &mut files)?;
    RelativeFileSet::new(root, files)
}

/// Re-checks that an already-selected runtime still carries JavaFX.
///
/// App bundlers call this right before copying; `advice` tells the user how
/// to fix their configuration for that particular bundler.
pub fn test_runtime(runtime: &RelativeFileSet, advice: &str) -> Result<()> {
    let has_fx = JFXRT_LOCATIONS
        .iter()
        .any(|rel| runtime.contains(rel) || runtime.files().any(|f| f.ends_with("jfxrt.jar")));
    if has_fx {
        Ok(())
    } else {
        Err(Error::config(
            format!(
                "selected runtime at {} does not include JavaFX",
                runtime.base_dir().display()
            ),
            advice,
        ))
    }
}
