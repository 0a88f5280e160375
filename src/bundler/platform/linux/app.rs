//! Linux application image.
//!
//! Layout: `<Name>/` holding the executable launcher script named after the
//! app, `app/` with the application resources and `package.cfg`, and
//! `runtime/` when a runtime is bundled.

use std::path::{Path, PathBuf};

use crate::bundler::builder::{Applicability, PackagingRun};
use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::jar::{self, MainJarInfo};
use crate::bundler::platform::package_descriptor;
use crate::bundler::resources::ResourceDefault;
use crate::bundler::settings::{BundleParams, TargetOs, runtime};

use super::template;
use crate::bundler::utils;

/// Drop-in override name for the launcher script.
const LAUNCHER_RESOURCE: &str = "linux-launcher.sh";

const RUNTIME_ADVICE: &str =
    "bundle a JavaFX-capable runtime, or leave the runtime unset to use the system one";

/// Checks this machine and configuration can produce a Linux app image.
pub async fn do_validate(params: &BundleParams, _run: &PackagingRun) -> Applicability {
    if TargetOs::current() != TargetOs::Linux {
        return Applicability::WrongPlatform;
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

/// Builds the app image under `out_root`, returning its directory.
///
/// `dependent_task` suppresses the top-level progress log when an installer
/// bundler is staging the image as an intermediate step.
pub async fn do_bundle(
    params: &BundleParams,
    main_jar: &MainJarInfo,
    out_root: &Path,
    dependent_task: bool,
    run: &PackagingRun,
) -> Result<PathBuf> {
    if !dependent_task {
        log::info!("building Linux application image for {}", params.display_name());
    }

    let image = out_root.join(params.fs_name());
    utils::fs::create_dir_all(&image, true).await?;

    let launcher = image.join(params.fs_name());
    run.locator()
        .fetch_executable(
            LAUNCHER_RESOURCE,
            "application launcher",
            &ResourceDefault::Embedded {
                name: "linux/launcher.sh",
                data: template::LAUNCHER_SH.as_bytes(),
            },
            &launcher,
        )
        .await?;

    let app_dir = image.join("app");
    utils::fs::create_dir_all(&app_dir, false).await?;
    utils::fs::copy_file_set(params.app_resources()?, &app_dir).await?;

    let cfg_path = app_dir.join("package.cfg");
    tokio::fs::write(&cfg_path, package_descriptor(params, main_jar, false))
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

#[cfg(test)]
#[cfg(target_os = "linux")]
mod tests {
    use super::*;
    use std::io::Write;

    fn demo_params(dir: &Path) -> BundleParams {
        let jar_path = dir.join("demo.jar");
        let file = std::fs::File::create(&jar_path).expect("create jar");
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(
                "META-INF/MANIFEST.MF",
                zip::write::SimpleFileOptions::default(),
            )
            .expect("start");
        writer
            .write_all(b"Manifest-Version: 1.0\r\nMain-Class: com.example.Main\r\n")
            .expect("write");
        writer.finish().expect("finish");

        let mut params = BundleParams::default();
        params.name = Some("Demo".to_string());
        params.application_class = Some("com.example.Main".to_string());
        params.app_resources = Some(
            crate::bundler::fileset::RelativeFileSet::new(dir, vec![jar_path]).expect("set"),
        );
        params
    }

    #[tokio::test]
    async fn image_layout_matches_the_contract() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let params = demo_params(tmp.path());
        let run = PackagingRun::new(None, false).expect("run");

        assert_eq!(do_validate(&params, &run).await, Applicability::Applicable);

        let out = tmp.path().join("out");
        let image = bundle_project(&params, &out, &run).await.expect("bundle");

        assert_eq!(image, out.join("Demo"));
        assert!(image.join("Demo").is_file());
        assert!(image.join("app/demo.jar").is_file());
        let cfg = std::fs::read_to_string(image.join("app/package.cfg")).expect("cfg");
        assert!(cfg.contains("app.mainclass=com/example/Main\n"));
        assert!(cfg.contains("app.classpath=\n"));
        // no runtime requested, none copied
        assert!(!image.join("runtime").exists());

        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(image.join("Demo"))
            .expect("meta")
            .permissions()
            .mode();
        assert_eq!(mode & 0o100, 0o100);
    }
}
