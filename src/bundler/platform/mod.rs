//! Platform bundler implementations and their common identity metadata.

pub mod linux;
pub mod macos;
pub mod windows;

use super::jar::MainJarInfo;
use super::settings::{BundleParams, TargetOs};

/// Renders the `package.cfg` launcher descriptor shared by the linux and
/// windows app images.
///
/// The main class is stored slash-separated; JVM options are numbered from
/// 1, raw args first and `-D` properties after.
pub(crate) fn package_descriptor(
    params: &BundleParams,
    main_jar: &MainJarInfo,
    with_app_id: bool,
) -> String {
    let application_class = params.application_class.as_deref().unwrap_or_default();
    let mut out = String::new();
    out.push_str(&format!("app.mainjar={}\n", main_jar.jar));
    out.push_str(&format!("app.version={}\n", params.version_or_default()));
    if with_app_id {
        let id = params
            .identifier
            .as_deref()
            .unwrap_or_else(|| params.display_name());
        out.push_str(&format!("app.id={id}\n"));
    }
    out.push_str(&format!(
        "app.mainclass={}\n",
        main_jar.launcher_class_entry(application_class)
    ));
    out.push_str(&format!("app.classpath={}\n", main_jar.classpath));
    for (i, option) in params.all_jvm_options().iter().enumerate() {
        out.push_str(&format!("jvmarg.{}={option}\n", i + 1));
    }
    out
}

/// Bundle format selector used when picking candidate bundlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BundleType {
    /// Everything applicable.
    All,
    /// Disk-image / app-directory bundles only.
    Image,
    /// Native installers only.
    Installer,
}

/// Every concrete bundler this crate ships.
///
/// A fresh value is used per packaging run; there is no shared registry
/// state to reset between runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BundlerKind {
    LinuxApp,
    MacApp,
    WinApp,
    LinuxDeb,
    WinMsi,
    WinExe,
}

impl BundlerKind {
    /// All bundlers, in validation/bundling order.
    pub fn all() -> [BundlerKind; 6] {
        [
            BundlerKind::LinuxApp,
            BundlerKind::MacApp,
            BundlerKind::WinApp,
            BundlerKind::LinuxDeb,
            BundlerKind::WinMsi,
            BundlerKind::WinExe,
        ]
    }

    /// Stable identifier used for selection and logging.
    pub fn id(&self) -> &'static str {
        match self {
            BundlerKind::LinuxApp => "linux.app",
            BundlerKind::MacApp => "mac.app",
            BundlerKind::WinApp => "win.app",
            BundlerKind::LinuxDeb => "deb",
            BundlerKind::WinMsi => "msi",
            BundlerKind::WinExe => "exe",
        }
    }

    /// Human-readable name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            BundlerKind::LinuxApp => "Linux Application Image",
            BundlerKind::MacApp => "Mac Application Image",
            BundlerKind::WinApp => "Windows Application Image",
            BundlerKind::LinuxDeb => "Debian Package",
            BundlerKind::WinMsi => "Windows MSI Installer",
            BundlerKind::WinExe => "Windows EXE Installer",
        }
    }

    pub fn bundle_type(&self) -> BundleType {
        match self {
            BundlerKind::LinuxApp | BundlerKind::MacApp | BundlerKind::WinApp => BundleType::Image,
            BundlerKind::LinuxDeb | BundlerKind::WinMsi | BundlerKind::WinExe => {
                BundleType::Installer
            }
        }
    }

    /// OS the produced bundle runs on. Bundling is native-only: a bundler
    /// is applicable only when this matches the current OS.
    pub fn target_os(&self) -> TargetOs {
        match self {
            BundlerKind::LinuxApp | BundlerKind::LinuxDeb => TargetOs::Linux,
            BundlerKind::MacApp => TargetOs::MacOs,
            BundlerKind::WinApp | BundlerKind::WinMsi | BundlerKind::WinExe => TargetOs::Windows,
        }
    }
}
