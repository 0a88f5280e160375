//! Windows application image.
//!
//! Layout: `<Name>/{<Name>.exe, <Name>.ico, app/<resources+package.cfg>,
//! runtime/<subset>}`. The launcher executable is a prebuilt binary that
//! cannot be synthesized here, so it must come from the resource override
//! directory; the optional icon-swap helper (same origin) rebrands it with
//! the application icon.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::bundler::builder::{Applicability, PackagingRun};
use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::jar::{self, MainJarInfo};
use crate::bundler::platform::package_descriptor;
use crate::bundler::resources::ResourceDefault;
use crate::bundler::settings::{BundleParams, TargetOs, runtime};
use crate::bundler::utils;

/// Drop-in name of the prebuilt launcher binary.
const LAUNCHER_RESOURCE: &str = "launcher.exe";
/// Drop-in name of the optional icon-swap helper.
const ICONSWAP_RESOURCE: &str = "iconswap.exe";

const RUNTIME_ADVICE: &str =
    "bundle a JavaFX-capable runtime, or leave the runtime unset to use the system one";

pub async fn do_validate(params: &BundleParams, run: &PackagingRun) -> Applicability {
    if TargetOs::current() != TargetOs::Windows {
        return Applicability::WrongPlatform;
    }
    if run
        .locator()
        .locate(LAUNCHER_RESOURCE, "application launcher", &ResourceDefault::None)
        .is_none()
    {
        return Applicability::Misconfigured {
            message: format!("no {LAUNCHER_RESOURCE} available"),
            advice: Some(format!(
                "place a prebuilt {LAUNCHER_RESOURCE} in the resource override directory"
            )),
        };
    }
    if let Err(e) = jar::discover_main_jar(params) {
        return Applicability::from_error(&e);
    }
    if let Some(rt) = &params.runtime
        && let Err(e) = runtime::test_runtime(rt, RUNTIME_ADVICE)
    {
        return Applicability::from_error(&e);
    }
    Applicability::Applicable
}

/// Rebrands the launcher with the application icon when the icon-swap
/// helper is available. The launcher's read-only attribute is cleared for
/// the swap and restored afterwards.
async fn swap_icon(launcher: &Path, icon: &Path, run: &PackagingRun) -> Result<()> {
    if run
        .locator()
        .locate(ICONSWAP_RESOURCE, "icon swap helper", &ResourceDefault::None)
        .is_none()
    {
        log::debug!("no icon swap helper available, launcher keeps its stock icon");
        return Ok(());
    }
    let helper_dest = run.images_root().join(ICONSWAP_RESOURCE);
    run.locator()
        .fetch(
            ICONSWAP_RESOURCE,
            "icon swap helper",
            &ResourceDefault::None,
            &helper_dest,
        )
        .await?;

    let metadata = tokio::fs::metadata(launcher)
        .await
        .fs_context("reading launcher metadata", launcher)?;
    let was_readonly = metadata.permissions().readonly();
    if was_readonly {
        let mut perms = metadata.permissions();
        perms.set_readonly(false);
        tokio::fs::set_permissions(launcher, perms)
            .await
            .fs_context("unlocking launcher", launcher)?;
    }

    let mut command = Command::new(&helper_dest);
    command.arg(icon).arg(launcher);
    let swapped = utils::process::exec(command, run.verbose()).await;

    if was_readonly {
        let mut perms = tokio::fs::metadata(launcher)
            .await
            .fs_context("reading launcher metadata", launcher)?
            .permissions();
        perms.set_readonly(true);
        tokio::fs::set_permissions(launcher, perms)
            .await
            .fs_context("relocking launcher", launcher)?;
    }
    swapped
}

pub async fn do_bundle(
    params: &BundleParams,
    main_jar: &MainJarInfo,
    out_root: &Path,
    dependent_task: bool,
    run: &PackagingRun,
) -> Result<PathBuf> {
    if !dependent_task {
        log::info!(
            "building Windows application image for {}",
            params.display_name()
        );
    }

    let image = out_root.join(params.fs_name());
    utils::fs::create_dir_all(&image, true).await?;

    let launcher = image.join(format!("{}.exe", params.fs_name()));
    run.locator()
        .fetch(
            LAUNCHER_RESOURCE,
            "application launcher",
            &ResourceDefault::None,
            &launcher,
        )
        .await?;

    if let Some(icon) = &params.icon {
        let ico = image.join(format!("{}.ico", params.fs_name()));
        utils::fs::copy_file(icon, &ico).await?;
        swap_icon(&launcher, &ico, run).await?;
    }

    let app_dir = image.join("app");
    utils::fs::create_dir_all(&app_dir, false).await?;
    utils::fs::copy_file_set(params.app_resources()?, &app_dir).await?;

    let cfg_path = app_dir.join("package.cfg");
    tokio::fs::write(&cfg_path, package_descriptor(params, main_jar, true))
        .await
        .fs_context("writing launcher descriptor", &cfg_path)?;
    run.publish_config(&cfg_path).await?;

    if let Some(rt) = &params.runtime {
        utils::fs::copy_file_set(rt, &image.join("runtime")).await?;
    }

    Ok(image)
}

pub async fn bundle_project(
    params: &BundleParams,
    out_dir: &Path,
    run: &PackagingRun,
) -> Result<PathBuf> {
    let main_jar = jar::discover_main_jar(params)?;
    do_bundle(params, &main_jar, out_dir, false, run).await
}
