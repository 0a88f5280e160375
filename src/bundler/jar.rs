//! Jar manifest inspection and main-jar discovery.
//!
//! The packaging mode of an application is derived, not configured: the jar
//! whose manifest names the configured application class fixes both the main
//! jar and whether the app was packaged by the JavaFX tooling. The
//! derivation is a pure up-front function; nothing is cached on the
//! parameter object.

use std::collections::BTreeMap;
use std::io::Read;

use super::error::{Error, ErrorExt, Result};
use super::settings::BundleParams;

/// Launcher class the JavaFX packaging tools write into their jars.
pub const JAVAFX_LAUNCHER_CLASS: &str = "com.javafx.main.Main";

const ATTR_MAIN_CLASS: &str = "Main-Class";
const ATTR_FX_MAIN_CLASS: &str = "JavaFX-Application-Class";
const ATTR_CLASS_PATH: &str = "Class-Path";

/// Facts derived from scanning the application resources for the main jar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainJarInfo {
    /// Relative path of the main jar inside the app resources.
    pub jar: String,
    /// Whether the jar was produced by the JavaFX packaging tools.
    pub fx_packaging: bool,
    /// Effective application classpath. Empty for JavaFX-packaged apps.
    pub classpath: String,
}

impl MainJarInfo {
    /// Class the platform launcher should start, slash-separated for the
    /// `app.mainclass` descriptor entry.
    pub fn launcher_class_entry(&self, application_class: &str) -> String {
        let class = if self.fx_packaging {
            JAVAFX_LAUNCHER_CLASS
        } else {
            application_class
        };
        class.replace('.', "/")
    }
}

/// Scans every jar in `app_resources` for a manifest whose main-class
/// attribute (plain or JavaFX) equals the configured application class.
///
/// A jar that cannot be opened is skipped with a debug log. Zero matches is
/// a configuration error; more than one match is treated as a deployment
/// error rather than resolved by iteration order.
pub fn discover_main_jar(params: &BundleParams) -> Result<MainJarInfo> {
    let app_resources = params.app_resources()?;
    let application_class = params.application_class.as_deref().ok_or_else(|| {
        Error::config(
            "no application class configured",
            "set BundleParams.application_class to the class the launcher should start",
        )
    })?;

    let mut matches: Vec<MainJarInfo> = Vec::new();

    for rel in app_resources.files() {
        if !rel.to_lowercase().ends_with(".jar") {
            continue;
        }
        let path = app_resources.base_dir().join(rel);
        let attributes = match read_manifest(&path) {
            Ok(attributes) => attributes,
            Err(e) => {
                log::debug!("skipping unreadable jar {}: {e}", path.display());
                continue;
            }
        };

        if attributes.get(ATTR_FX_MAIN_CLASS).map(String::as_str) == Some(application_class) {
            matches.push(MainJarInfo {
                jar: rel.to_string(),
                fx_packaging: true,
                // the FX launcher builds its own classpath
                classpath: String::new(),
            });
        } else if attributes.get(ATTR_MAIN_CLASS).map(String::as_str) == Some(application_class) {
            matches.push(MainJarInfo {
                jar: rel.to_string(),
                fx_packaging: false,
                classpath: attributes
                    .get(ATTR_CLASS_PATH)
                    .cloned()
                    .unwrap_or_default(),
            });
        }
    }

    match matches.len() {
        0 => Err(Error::config(
            format!("no application jar found with main class {application_class}"),
            "make sure the main application jar is in the app resources and its \
             manifest names the configured application class",
        )),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::config(
            format!(
                "application class {application_class} matches more than one jar: {}",
                matches
                    .iter()
                    .map(|m| m.jar.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            "exactly one jar may declare the application main class",
        )),
    }
}

/// Reads and parses `META-INF/MANIFEST.MF` from a jar.
fn read_manifest(jar: &std::path::Path) -> Result<BTreeMap<String, String>> {
    let file = std::fs::File::open(jar).fs_context("opening jar", jar)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = archive.by_name("META-INF/MANIFEST.MF")?;
    let mut text = String::new();
    entry.read_to_string(&mut text).fs_context("reading manifest", jar)?;
    Ok(parse_manifest(&text))
}

/// Parses main-section manifest attributes, folding 72-byte continuation
/// lines (a line starting with a single space continues the previous value).
fn parse_manifest(text: &str) -> BTreeMap<String, String> {
    let mut logical: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(cont) = line.strip_prefix(' ') {
            if let Some(last) = logical.last_mut() {
                last.push_str(cont);
            }
        } else if line.is_empty() {
            // blank line ends the main section; per-entry sections follow
            break;
        } else {
            logical.push(line.to_string());
        }
    }

    let mut attributes = BTreeMap::new();
    for line in logical {
        if let Some((key, value)) = line.split_once(':') {
            attributes.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    attributes
}
