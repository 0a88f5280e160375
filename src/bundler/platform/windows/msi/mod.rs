//! Windows MSI installer via the WiX toolset.
//!
//! Stages the application image, generates a `.wxs` project plus a
//! `bundle.wxi` fragment describing the file tree, then runs `candle` and
//! `light`. Both tools must be version 3.0 or newer; 3.6 unlocks the
//! major-upgrade markup.

mod template;
pub mod wix_tree;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use uuid::Uuid;

use crate::bundler::builder::{Applicability, PackagingRun, tool_detection};
use crate::bundler::error::{Error, Result};
use crate::bundler::jar;
use crate::bundler::resources::ResourceDefault;
use crate::bundler::settings::BundleParams;
use crate::bundler::utils;

use super::app;
use wix_tree::{ShortcutPolicy, WixTreeBuilder};

const TOOL_CANDLE: &str = "candle";
const TOOL_LIGHT: &str = "light";

/// MSI `ProductVersion` grammar: at most three dot-separated numeric
/// components, major and minor in `[0, 255]`, build in `[0, 65535]`.
/// An absent version is valid (the "1.0" fallback applies later).
pub fn is_version_string_valid(version: Option<&str>) -> bool {
    let Some(version) = version else {
        return true;
    };
    let parts: Vec<&str> = version.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return false;
    }
    let limits = [255u64, 255, 65535];
    for (part, limit) in parts.iter().zip(limits) {
        match part.parse::<u64>() {
            Ok(n) if n <= limit => {}
            _ => return false,
        }
    }
    true
}

async fn probe_wix_tool(name: &str) -> WixProbe {
    let Some(tool) = tool_detection::find_tool(name) else {
        return WixProbe::Missing;
    };
    match tool_detection::probe_version(&tool, "/?").await {
        Ok(Some(version)) if version >= (3, 0) => WixProbe::Version(version),
        Ok(_) => WixProbe::TooOld,
        Err(_) => WixProbe::Missing,
    }
}

enum WixProbe {
    Version((u32, u32)),
    TooOld,
    Missing,
}

pub async fn validate(params: &BundleParams, run: &PackagingRun) -> Applicability {
    let base = app::do_validate(params, run).await;
    if base != Applicability::Applicable {
        return base;
    }
    for tool in [TOOL_CANDLE, TOOL_LIGHT] {
        match probe_wix_tool(tool).await {
            WixProbe::Version(_) => {}
            WixProbe::TooOld => {
                return Applicability::Misconfigured {
                    message: format!("{tool} is older than WiX 3.0"),
                    advice: Some("install WiX toolset 3.0 or later".to_string()),
                };
            }
            WixProbe::Missing => {
                return Applicability::Misconfigured {
                    message: format!("{tool} is not available"),
                    advice: Some(
                        "install the WiX toolset and put candle and light on PATH".to_string(),
                    ),
                };
            }
        }
    }
    if !is_version_string_valid(params.version.as_deref()) {
        return Applicability::Misconfigured {
            message: format!(
                "version {} is not a valid MSI product version",
                params.version.as_deref().unwrap_or_default()
            ),
            advice: Some(
                "use up to three dot-separated numbers: major [0-255], minor [0-255], \
                 build [0-65535]"
                    .to_string(),
            ),
        };
    }
    Applicability::Applicable
}

/// Upgrade code: the identifier when it already is a UUID, otherwise a
/// random one. A random upgrade code breaks upgrade detection across
/// releases, hence the warning.
fn upgrade_guid(params: &BundleParams, verbose: bool) -> String {
    if let Some(identifier) = &params.identifier
        && let Ok(parsed) = Uuid::parse_str(identifier)
    {
        return parsed.to_string().to_uppercase();
    }
    let random = Uuid::new_v4();
    if verbose {
        log::warn!(
            "no UUID identifier configured; using random upgrade code {random} \
             (upgrades across releases will not be detected)"
        );
    }
    random.to_string().to_uppercase()
}

pub async fn bundle_project(
    params: &BundleParams,
    out_dir: &Path,
    run: &PackagingRun,
) -> Result<PathBuf> {
    let main_jar = jar::discover_main_jar(params)?;
    log::info!("building MSI installer for {}", params.display_name());

    let scratch = run.images_root().join(format!("{}-msi", params.fs_name()));
    utils::fs::create_dir_all(&scratch, true).await?;

    let image = app::do_bundle(params, &main_jar, &scratch.join("image"), true, run).await?;

    let wix36 = matches!(probe_wix_tool(TOOL_CANDLE).await, WixProbe::Version(v) if v >= (3, 6));
    let system_wide = params.system_wide.unwrap_or(true);
    let shortcuts = ShortcutPolicy::effective(params.desktop_shortcut, params.menu_shortcut);

    let mut data: BTreeMap<&str, String> = BTreeMap::new();
    data.insert(
        "product_guid",
        Uuid::new_v4().to_string().to_uppercase(),
    );
    data.insert("upgrade_guid", upgrade_guid(params, run.verbose()));
    data.insert("cleanup_guid", Uuid::new_v4().to_string().to_uppercase());
    data.insert("application_name", params.display_name().to_string());
    data.insert("fs_name", params.fs_name());
    data.insert("version", params.version_or_default().to_string());
    data.insert("vendor", params.vendor_or_default().to_string());
    data.insert(
        "vendor_registry_key",
        format!(
            "Software\\{}\\{}",
            params.vendor_or_default(),
            params.fs_name()
        ),
    );
    data.insert("description", params.description_or_default().to_string());
    data.insert(
        "install_scope",
        if system_wide { "perMachine" } else { "perUser" }.to_string(),
    );
    data.insert(
        "program_files_id",
        if system_wide {
            "ProgramFilesFolder"
        } else {
            "LocalAppDataFolder"
        }
        .to_string(),
    );
    data.insert(
        "wix36_markup",
        if wix36 {
            template::WIX36_MARKUP.to_string()
        } else {
            String::new()
        },
    );

    let wxs_path = scratch.join(format!("{}.wxs", params.fs_name()));
    run.locator()
        .preprocess_text_resource(
            "template.wxs",
            "WiX project file",
            &ResourceDefault::Embedded {
                name: "windows/template.wxs",
                data: template::WXS.as_bytes(),
            },
            &data,
            &wxs_path,
        )
        .await?;
    run.publish_config(&wxs_path).await?;

    let wxi = WixTreeBuilder::new(
        format!("{}.exe", params.fs_name()),
        params.display_name(),
        params.vendor_or_default(),
        params.version_or_default(),
        !system_wide,
        shortcuts,
    )
    .build(&image)?;
    let wxi_path = scratch.join("bundle.wxi");
    tokio::fs::write(&wxi_path, wxi)
        .await
        .map_err(Error::IoError)?;
    run.publish_config(&wxi_path).await?;

    run_post_image_script(params, &scratch, run).await?;

    let wixobj = scratch.join(format!("{}.wixobj", params.fs_name()));
    let mut candle = Command::new(TOOL_CANDLE);
    candle
        .current_dir(&scratch)
        .arg("-nologo")
        .arg(&wxs_path)
        .arg("-ext")
        .arg("WixUtilExtension")
        .arg("-out")
        .arg(&wixobj);
    utils::process::exec(candle, run.verbose()).await?;

    let msi_path = out_dir.join(format!(
        "{}-{}.msi",
        params.fs_name(),
        params.version_or_default()
    ));
    let mut light = Command::new(TOOL_LIGHT);
    light
        .current_dir(&scratch)
        .arg("-nologo")
        .arg("-ext")
        .arg("WixUtilExtension")
        .arg(&wixobj)
        .arg("-out")
        .arg(&msi_path);
    utils::process::exec(light, run.verbose()).await?;

    run.cleanup_image(&scratch).await?;
    Ok(msi_path)
}

/// Runs the optional user-supplied `<name>-post-image.wsf` script against
/// the staged image before the WiX compile, when one is dropped in.
async fn run_post_image_script(
    params: &BundleParams,
    scratch: &Path,
    run: &PackagingRun,
) -> Result<()> {
    let script_name = format!("{}-post-image.wsf", params.fs_name());
    let dest = scratch.join(&script_name);
    if run
        .locator()
        .locate(&script_name, "post-image script", &ResourceDefault::None)
        .is_none()
    {
        return Ok(());
    }
    run.locator()
        .fetch(&script_name, "post-image script", &ResourceDefault::None, &dest)
        .await?;

    let mut command = Command::new("wscript");
    command.current_dir(scratch).arg(&dest);
    utils::process::exec(command, run.verbose()).await
}
