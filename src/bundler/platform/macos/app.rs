//! macOS `.app` bundle.
//!
//! Layout: `<Name>.app/Contents/{Info.plist, PkgInfo, MacOS/<launcher>,
//! Java/<resources>, PlugIns/<runtime>, Resources/<icon>}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::bundler::builder::{Applicability, PackagingRun};
use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::jar::{self, MainJarInfo};
use crate::bundler::resources::ResourceDefault;
use crate::bundler::settings::{BundleParams, TargetOs, runtime};
use crate::bundler::utils;

use super::template;

/// PkgInfo payload: bundle type `APPL`, no creator code. Exactly 8 bytes.
const PKG_INFO: &[u8; 8] = b"APPL????";

const RUNTIME_ADVICE: &str =
    "bundle a JavaFX-capable runtime, or leave the runtime unset to use the system one";

pub async fn do_validate(params: &BundleParams, _run: &PackagingRun) -> Applicability {
    if TargetOs::current() != TargetOs::MacOs {
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

pub async fn do_bundle(
    params: &BundleParams,
    main_jar: &MainJarInfo,
    out_root: &Path,
    dependent_task: bool,
    run: &PackagingRun,
) -> Result<PathBuf> {
    if !dependent_task {
        log::info!("building Mac application bundle for {}", params.display_name());
    }

    let image = out_root.join(format!("{}.app", params.fs_name()));
    utils::fs::create_dir_all(&image, true).await?;
    let contents = image.join("Contents");

    let application_class = params.application_class.as_deref().unwrap_or_default();
    let icon_file = if params.icon.is_some() {
        format!("{}.icns", params.fs_name())
    } else {
        String::new()
    };

    let mut plist_data: BTreeMap<&str, String> = BTreeMap::new();
    plist_data.insert("executable", params.fs_name());
    plist_data.insert("icon_file", icon_file.clone());
    plist_data.insert(
        "identifier",
        params
            .identifier
            .clone()
            .unwrap_or_else(|| application_class.to_string()),
    );
    plist_data.insert("application_name", params.display_name().to_string());
    plist_data.insert("version", params.version_or_default().to_string());
    plist_data.insert("copyright", params.copyright.clone().unwrap_or_default());
    plist_data.insert("category", params.category.clone().unwrap_or_default());

    let plist_path = contents.join("Info.plist");
    run.locator()
        .preprocess_text_resource(
            "Info.plist",
            "application property list",
            &ResourceDefault::Embedded {
                name: "macos/Info.plist",
                data: template::INFO_PLIST.as_bytes(),
            },
            &plist_data,
            &plist_path,
        )
        .await?;
    run.publish_config(&plist_path).await?;

    let pkginfo_path = contents.join("PkgInfo");
    tokio::fs::write(&pkginfo_path, PKG_INFO)
        .await
        .fs_context("writing PkgInfo", &pkginfo_path)?;

    let mut launcher_data: BTreeMap<&str, String> = BTreeMap::new();
    launcher_data.insert("jvm_options", params.all_jvm_options().join(" "));
    launcher_data.insert("main_jar", main_jar.jar.clone());
    launcher_data.insert("classpath", main_jar.classpath.clone());
    launcher_data.insert(
        "main_class",
        main_jar
            .launcher_class_entry(application_class)
            .replace('/', "."),
    );

    let launcher_path = contents.join("MacOS").join(params.fs_name());
    run.locator()
        .preprocess_text_resource(
            "mac-launcher.sh",
            "application launcher",
            &ResourceDefault::Embedded {
                name: "macos/launcher.sh",
                data: template::LAUNCHER_SH.as_bytes(),
            },
            &launcher_data,
            &launcher_path,
        )
        .await?;
    utils::fs::set_executable(&launcher_path).await?;

    utils::fs::copy_file_set(params.app_resources()?, &contents.join("Java")).await?;

    if let Some(rt) = &params.runtime {
        utils::fs::copy_file_set(rt, &contents.join("PlugIns")).await?;
    }

    if let Some(icon) = &params.icon {
        utils::fs::copy_file(icon, &contents.join("Resources").join(&icon_file)).await?;
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
