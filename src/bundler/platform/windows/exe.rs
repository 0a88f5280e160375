//! Windows EXE installer via Inno Setup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::process::Command;

use crate::bail;
use crate::bundler::builder::{Applicability, PackagingRun, tool_detection};
use crate::bundler::error::Result;
use crate::bundler::jar;
use crate::bundler::resources::ResourceDefault;
use crate::bundler::settings::BundleParams;
use crate::bundler::utils;

use super::app;

const TOOL_ISCC: &str = "iscc";

const ISS_TEMPLATE: &str = r#"[Setup]
AppName={{application_name}}
AppVersion={{version}}
AppPublisher={{vendor}}
DefaultDirName={{default_dir}}
DefaultGroupName={{application_name}}
{{license_line}}
OutputBaseFilename={{installer_base}}
Compression=lzma
SolidCompression=yes
PrivilegesRequired={{privileges}}

[Files]
Source: "{{source_glob}}"; DestDir: "{app}"; Flags: recursesubdirs ignoreversion

[Icons]
{{menu_icon_line}}
{{desktop_icon_line}}
"#;

/// Probes the Inno Setup command-line compiler. The banner carries the
/// product version, e.g. "Inno Setup 6 Command-Line Compiler".
async fn probe_inno(tool: &PathBuf) -> Result<Option<u32>> {
    let mut command = Command::new(tool);
    command.arg("/?");
    let output = utils::process::exec_capture(command).await?;
    let re = Regex::new(r"Inno Setup (\d+)")?;
    Ok(re
        .captures(&output)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok()))
}

pub async fn validate(params: &BundleParams, run: &PackagingRun) -> Applicability {
    let base = app::do_validate(params, run).await;
    if base != Applicability::Applicable {
        return base;
    }
    let Some(tool) = tool_detection::find_tool(TOOL_ISCC) else {
        return Applicability::Misconfigured {
            message: format!("{TOOL_ISCC} is not available"),
            advice: Some("install Inno Setup 5 or later and put iscc on PATH".to_string()),
        };
    };
    match probe_inno(&tool).await {
        Ok(Some(major)) if major >= 5 => Applicability::Applicable,
        Ok(_) => Applicability::Misconfigured {
            message: "Inno Setup is too old".to_string(),
            advice: Some("install Inno Setup 5 or later".to_string()),
        },
        Err(e) => Applicability::from_error(&e),
    }
}

pub async fn bundle_project(
    params: &BundleParams,
    out_dir: &Path,
    run: &PackagingRun,
) -> Result<PathBuf> {
    let main_jar = jar::discover_main_jar(params)?;
    log::info!("building EXE installer for {}", params.display_name());

    let scratch = run.images_root().join(format!("{}-exe", params.fs_name()));
    utils::fs::create_dir_all(&scratch, true).await?;

    let image = app::do_bundle(params, &main_jar, &scratch.join("image"), true, run).await?;

    let system_wide = params.system_wide.unwrap_or(true);
    let installer_base = format!("{}-{}", params.fs_name(), params.version_or_default());

    let license_line = match params.license_files.first() {
        Some(rel) => match params.app_resources()?.resolve(rel) {
            Some(path) => format!("LicenseFile={}", path.display()),
            None => String::new(),
        },
        None => String::new(),
    };

    let mut data: BTreeMap<&str, String> = BTreeMap::new();
    data.insert("application_name", params.display_name().to_string());
    data.insert("fs_name", params.fs_name());
    data.insert("version", params.version_or_default().to_string());
    data.insert("vendor", params.vendor_or_default().to_string());
    data.insert("license_line", license_line);
    data.insert("installer_base", installer_base.clone());
    data.insert("source_glob", format!("{}\\*", image.display()));
    data.insert(
        "menu_icon_line",
        format!(
            "Name: \"{{group}}\\{}\"; Filename: \"{{app}}\\{}.exe\"",
            params.display_name(),
            params.fs_name()
        ),
    );
    data.insert(
        "default_dir",
        if system_wide {
            format!("{{commonpf}}\\{}", params.fs_name())
        } else {
            format!("{{userappdata}}\\{}", params.fs_name())
        },
    );
    data.insert(
        "privileges",
        if system_wide { "admin" } else { "lowest" }.to_string(),
    );
    data.insert(
        "desktop_icon_line",
        if params.desktop_shortcut {
            format!(
                "Name: \"{{commondesktop}}\\{}\"; Filename: \"{{app}}\\{}.exe\"",
                params.display_name(),
                params.fs_name()
            )
        } else {
            String::new()
        },
    );

    let iss_path = scratch.join(format!("{}.iss", params.fs_name()));
    run.locator()
        .preprocess_text_resource(
            "template.iss",
            "Inno Setup project file",
            &ResourceDefault::Embedded {
                name: "windows/template.iss",
                data: ISS_TEMPLATE.as_bytes(),
            },
            &data,
            &iss_path,
        )
        .await?;
    run.publish_config(&iss_path).await?;

    let output_dir = scratch.join("output");
    utils::fs::create_dir_all(&output_dir, false).await?;
    let mut command = Command::new(TOOL_ISCC);
    command
        .arg(format!("/O{}", output_dir.display()))
        .arg(&iss_path);
    utils::process::exec(command, run.verbose()).await?;

    let produced = output_dir.join(format!("{installer_base}.exe"));
    if !produced.is_file() {
        bail!("Inno Setup did not produce {}", produced.display());
    }
    let dest = out_dir.join(format!("{installer_base}.exe"));
    utils::fs::copy_file(&produced, &dest).await?;

    run.cleanup_image(&scratch).await?;
    Ok(dest)
}
