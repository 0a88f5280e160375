//! Debian package bundler.
//!
//! Stages the Linux app image under `opt/<Name>/`, generates the DEBIAN
//! maintainer files and a desktop entry from templates, and hands the tree
//! to `dpkg-deb`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::bundler::builder::{Applicability, PackagingRun, checksum, tool_detection};
use crate::bundler::error::{Context, ErrorExt, Result};
use crate::bundler::jar;
use crate::bundler::resources::ResourceDefault;
use crate::bundler::settings::BundleParams;
use crate::bundler::utils;

use super::{app, template};

const TOOL_DPKG: &str = "dpkg-deb";

/// Debian package names: lower case, no spaces.
fn package_name(params: &BundleParams) -> String {
    params
        .fs_name()
        .to_lowercase()
        .replace(' ', "-")
        .replace('_', "-")
}

pub async fn validate(params: &BundleParams, run: &PackagingRun) -> Applicability {
    let base = app::do_validate(params, run).await;
    if base != Applicability::Applicable {
        return base;
    }
    if tool_detection::find_tool(TOOL_DPKG).is_none() {
        return Applicability::Misconfigured {
            message: format!("{TOOL_DPKG} is not available"),
            advice: Some("install the dpkg package so Debian packages can be built".to_string()),
        };
    }
    Applicability::Applicable
}

/// License text for the copyright file: first license file's content, else
/// the license type, else "Unknown".
async fn license_text(params: &BundleParams) -> Result<String> {
    if let Some(first) = params.license_files.first() {
        let resources = params.app_resources()?;
        if let Some(path) = resources.resolve(first) {
            return tokio::fs::read_to_string(&path)
                .await
                .fs_context("reading license file", path);
        }
    }
    Ok(params
        .license_type
        .clone()
        .unwrap_or_else(|| "Unknown".to_string()))
}

pub async fn bundle_project(
    params: &BundleParams,
    out_dir: &Path,
    run: &PackagingRun,
) -> Result<PathBuf> {
    let main_jar = jar::discover_main_jar(params)?;
    log::info!("building Debian package for {}", params.display_name());

    let pkg = package_name(params);
    let image = run.images_root().join(format!("{pkg}-deb"));
    utils::fs::create_dir_all(&image, true).await?;

    let app_image = app::do_bundle(params, &main_jar, &image.join("opt"), true, run).await?;

    let maintainer = format!(
        "{} <{}>",
        params.vendor_or_default(),
        params.email.as_deref().unwrap_or("unknown@localhost")
    );
    let installed_kb = checksum::artifact_size(&image).await? / 1024;

    let icon_entry = if let Some(icon) = &params.icon {
        let icon_name = format!("{pkg}.png");
        utils::fs::copy_file(icon, &app_image.join(&icon_name)).await?;
        format!("/opt/{}/{icon_name}", params.fs_name())
    } else {
        String::new()
    };

    let mut data: BTreeMap<&str, String> = BTreeMap::new();
    data.insert("package_name", pkg.clone());
    data.insert("application_name", params.display_name().to_string());
    data.insert("fs_name", params.fs_name());
    data.insert("version", params.version_or_default().to_string());
    data.insert("maintainer", maintainer);
    data.insert("description", params.description_or_default().to_string());
    data.insert("installed_size", installed_kb.to_string());
    data.insert("copyright", params.copyright.clone().unwrap_or_default());
    data.insert("license_text", license_text(params).await?);
    data.insert(
        "category",
        params
            .category
            .clone()
            .unwrap_or_else(|| "Utility;".to_string()),
    );
    data.insert("icon_entry", icon_entry);

    let debian = image.join("DEBIAN");
    utils::fs::create_dir_all(&debian, false).await?;

    let generated: [(&str, &str, &str, PathBuf, bool); 5] = [
        ("control", "DEB control file", template::CONTROL, debian.join("control"), false),
        ("postinst", "DEB install script", template::POSTINST, debian.join("postinst"), true),
        ("postrm", "DEB removal script", template::POSTRM, debian.join("postrm"), true),
        ("copyright", "DEB copyright file", template::COPYRIGHT, debian.join("copyright"), false),
        (
            "desktop.template",
            "menu shortcut descriptor",
            template::DESKTOP,
            app_image.join(format!("{pkg}.desktop")),
            false,
        ),
    ];
    for (public_name, category, default, dest, executable) in generated {
        run.locator()
            .preprocess_text_resource(
                public_name,
                category,
                &ResourceDefault::Embedded {
                    name: public_name,
                    data: default.as_bytes(),
                },
                &data,
                &dest,
            )
            .await?;
        if executable {
            utils::fs::set_executable(&dest).await?;
        }
        run.publish_config(&dest).await?;
    }

    let deb_path = out_dir.join(format!("{pkg}-{}.deb", params.version_or_default()));
    let mut command = Command::new(TOOL_DPKG);
    command.arg("-b").arg(&image).arg(&deb_path);
    utils::process::exec(command, run.verbose())
        .await
        .context("assembling the Debian package")?;

    run.cleanup_image(&image).await?;
    Ok(deb_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_names_are_debian_safe() {
        let mut params = BundleParams::default();
        params.name = Some("Ensemble App_2".to_string());
        assert_eq!(package_name(&params), "ensemble-app-2");
    }

    #[tokio::test]
    async fn license_text_prefers_the_first_license_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("LICENSE"), b"license body").expect("write");
        let mut params = BundleParams::default();
        params.app_resources = Some(
            crate::bundler::fileset::RelativeFileSet::new(
                tmp.path(),
                vec![tmp.path().join("LICENSE")],
            )
            .expect("set"),
        );
        params.license_files = vec!["LICENSE".to_string()];
        params.license_type = Some("GPL v2".to_string());
        assert_eq!(license_text(&params).await.expect("text"), "license body");

        params.license_files.clear();
        assert_eq!(license_text(&params).await.expect("text"), "GPL v2");

        params.license_type = None;
        assert_eq!(license_text(&params).await.expect("text"), "Unknown");
    }
}
