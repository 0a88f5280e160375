//! Bundler selection and sequential execution.
//!
//! Nothing here is global: a [`PackagingRun`] value owns the scratch
//! directories, resource locator and verbosity for exactly one packaging
//! invocation, and is dropped (tearing the scratch space down) when the run
//! ends. Bundlers execute strictly one after another; a failing bundler is
//! recorded and its siblings still run.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::bundler::error::{Error, ErrorExt, Result};
use crate::bundler::platform::{self, BundleType, BundlerKind};
use crate::bundler::resources::ResourceLocator;
use crate::bundler::settings::BundleParams;
use crate::bundler::utils;

use super::checksum;

/// Whether a bundler can run for the given parameters, and if not, why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applicability {
    Applicable,
    /// Excluded by the caller's bundler/format selection.
    NotRequested,
    /// The bundler targets a different OS than the one we run on.
    WrongPlatform,
    /// A precondition failed: missing tool, bad version string, runtime
    /// without JavaFX. Carries the user-facing explanation.
    Misconfigured {
        message: String,
        advice: Option<String>,
    },
}

impl Applicability {
    /// Maps a validation error to its applicability verdict.
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Config { message, advice } => Applicability::Misconfigured {
                message: message.clone(),
                advice: advice.clone(),
            },
            other => Applicability::Misconfigured {
                message: other.to_string(),
                advice: None,
            },
        }
    }
}

/// One produced bundle.
#[derive(Clone, Debug)]
pub struct BundledArtifact {
    pub kind: BundlerKind,
    pub path: PathBuf,
    /// Total byte size (summed over the tree for app-image directories).
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
}

/// A bundler that started and failed. Siblings keep running.
#[derive(Debug)]
pub struct BundleFailure {
    pub kind: BundlerKind,
    pub error: Error,
}

/// Result of a full packaging run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub artifacts: Vec<BundledArtifact>,
    pub failures: Vec<BundleFailure>,
}

/// Per-run state: scratch space, resource overrides, verbosity.
///
/// The build root is a temp directory removed when the run is dropped;
/// verbose mode preserves scratch images for inspection instead.
pub struct PackagingRun {
    build_root: TempDir,
    images_root: PathBuf,
    config_root: PathBuf,
    locator: ResourceLocator,
    verbose: bool,
}

impl PackagingRun {
    pub fn new(drop_in_root: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let build_root = TempDir::new().fs_context("creating build root", std::env::temp_dir())?;
        let images_root = build_root.path().join("images");
        let config_root = build_root.path().join("config");
        std::fs::create_dir_all(&images_root).fs_context("creating images root", &images_root)?;
        std::fs::create_dir_all(&config_root).fs_context("creating config root", &config_root)?;
        Ok(Self {
            build_root,
            images_root,
            config_root,
            locator: ResourceLocator::new(drop_in_root, verbose),
            verbose,
        })
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Keeps the run's scratch space alive past the run itself.
    ///
    /// Used in verbose mode so preserved images survive; returns the root
    /// they live under.
    pub fn into_preserved(self) -> PathBuf {
        self.build_root.keep()
    }

    /// Removes a scratch image, unless verbose mode wants it preserved.
    pub async fn cleanup_image(&self, image: &Path) -> Result<()> {
        if self.verbose {
            log::info!("keeping scratch image at {}", image.display());
            Ok(())
        } else {
            utils::fs::remove_dir_all(image).await
        }
    }

    /// In verbose mode, copies a generated config file into the config root
    /// so the user can inspect (and later override) it.
    pub async fn publish_config(&self, file: &Path) -> Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let name = file
            .file_name()
            .ok_or_else(|| Error::GenericError(format!("{} has no file name", file.display())))?;
        utils::fs::copy_file(file, &self.config_root.join(name)).await
    }
}

/// Asks one bundler whether it can run.
pub async fn validate(
    kind: BundlerKind,
    params: &BundleParams,
    run: &PackagingRun,
) -> Applicability {
    match kind {
        BundlerKind::LinuxApp => platform::linux::app::do_validate(params, run).await,
        BundlerKind::MacApp => platform::macos::app::do_validate(params, run).await,
        BundlerKind::WinApp => platform::windows::app::do_validate(params, run).await,
        BundlerKind::LinuxDeb => platform::linux::deb::validate(params, run).await,
        BundlerKind::WinMsi => platform::windows::msi::validate(params, run).await,
        BundlerKind::WinExe => platform::windows::exe::validate(params, run).await,
    }
}

/// Selects the bundlers that will run: requested, right platform, and
/// correctly configured.
pub async fn candidates(
    params: &BundleParams,
    selector: Option<&[&str]>,
    format: BundleType,
    run: &PackagingRun,
) -> Vec<BundlerKind> {
    let mut selected = Vec::new();
    for kind in BundlerKind::all() {
        let requested = selector.is_none_or(|ids| ids.contains(&kind.id()))
            && (format == BundleType::All || kind.bundle_type() == format);
        if !requested {
            log::debug!("skipping {}: not requested", kind.name());
            continue;
        }
        match validate(kind, params, run).await {
            Applicability::Applicable => selected.push(kind),
            Applicability::NotRequested => {
                log::debug!("skipping {}: not requested", kind.name());
            }
            Applicability::WrongPlatform => {
                log::debug!("skipping {}: targets another platform", kind.name());
            }
            Applicability::Misconfigured { message, advice } => {
                log::info!("skipping {}: {message}", kind.name());
                if let Some(advice) = advice {
                    log::info!("  advice: {advice}");
                }
            }
        }
    }
    selected
}

/// Runs every candidate bundler sequentially.
///
/// In verbose mode the effective parameters are dumped as JSON into the
/// config root first. A bundler failure is logged and recorded; remaining
/// bundlers still run.
pub async fn bundle_all(
    params: &BundleParams,
    out_dir: &Path,
    selector: Option<&[&str]>,
    format: BundleType,
    run: &PackagingRun,
) -> Result<RunOutcome> {
    if run.verbose() {
        let dump = serde_json::to_string_pretty(params)?;
        let dump_path = run.config_root().join("bundle-params.json");
        tokio::fs::write(&dump_path, dump)
            .await
            .fs_context("writing parameter dump", &dump_path)?;
        log::info!("effective parameters written to {}", dump_path.display());
    }

    utils::fs::create_dir_all(out_dir, false).await?;

    let mut outcome = RunOutcome::default();
    for kind in candidates(params, selector, format, run).await {
        log::info!("running {}", kind.name());
        let produced = match kind {
            BundlerKind::LinuxApp => platform::linux::app::bundle_project(params, out_dir, run).await,
            BundlerKind::MacApp => platform::macos::app::bundle_project(params, out_dir, run).await,
            BundlerKind::WinApp => {
                platform::windows::app::bundle_project(params, out_dir, run).await
            }
            BundlerKind::LinuxDeb => {
                platform::linux::deb::bundle_project(params, out_dir, run).await
            }
            BundlerKind::WinMsi => platform::windows::msi::bundle_project(params, out_dir, run).await,
            BundlerKind::WinExe => platform::windows::exe::bundle_project(params, out_dir, run).await,
        };
        match produced {
            Ok(path) => {
                let checksum = checksum::calculate_sha256(&path).await?;
                let size = checksum::artifact_size(&path).await?;
                log::info!(
                    "{} produced {} ({size} bytes, sha256 {checksum})",
                    kind.name(),
                    path.display()
                );
                outcome.artifacts.push(BundledArtifact {
                    kind,
                    path,
                    size,
                    checksum,
                });
            }
            Err(error) => {
                log::error!("{} failed: {error}", kind.name());
                outcome.failures.push(BundleFailure { kind, error });
            }
        }
    }
    Ok(outcome)
}
