//! The bundle parameter object.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::bundler::error::{Error, Result};
use crate::bundler::fileset::RelativeFileSet;

/// Everything a bundler needs to know about the application being packaged.
///
/// Unset optional fields fall back at the point of use; the only hard
/// requirements shared by every bundler are the application resources and
/// the application class, and those are checked by [`BundleParams::app_resources`]
/// and main-jar discovery rather than at construction time.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BundleParams {
    /// Application name. Falls back to "Unknown Application Name".
    pub name: Option<String>,
    /// Vendor / publisher. Falls back to "Unknown vendor".
    pub vendor: Option<String>,
    /// Maintainer email, used by Debian packaging.
    pub email: Option<String>,
    /// Copyright string for bundle metadata.
    pub copyright: Option<String>,
    /// Reverse-DNS identifier (mac bundle id, MSI upgrade-code seed).
    pub identifier: Option<String>,
    /// Application version. Falls back to "1.0".
    pub version: Option<String>,
    /// Window/installer title. Falls back to the description.
    pub title: Option<String>,
    /// One-line description. Falls back to "none".
    pub description: Option<String>,
    /// Menu category (Linux desktop entry, mac application category).
    pub category: Option<String>,
    /// Platform-appropriate icon file, if the build supplies one.
    pub icon: Option<PathBuf>,
    /// License type shown in package metadata (e.g. "GPL v2 + CLASSPATH").
    pub license_type: Option<String>,
    /// License files, relative to the app resources.
    pub license_files: Vec<String>,
    /// Pre-subsetted runtime to embed. `None` means bundle no runtime and
    /// rely on a system-installed one.
    pub runtime: Option<RelativeFileSet>,
    /// The application's jars and auxiliary files.
    pub app_resources: Option<RelativeFileSet>,
    /// Fully-qualified class the launcher starts.
    pub application_class: Option<String>,
    /// Raw JVM options written to the launcher descriptor.
    pub jvm_args: Vec<String>,
    /// JVM system properties, rendered as `-D<key>=<value>`.
    pub jvm_properties: BTreeMap<String, String>,
    /// Request a desktop shortcut (installer bundlers).
    pub desktop_shortcut: bool,
    /// Request a start-menu entry (installer bundlers).
    pub menu_shortcut: bool,
    /// Install machine-wide rather than per-user. `None` lets each
    /// installer pick its own default.
    pub system_wide: Option<bool>,
}

impl BundleParams {
    /// Display name with the documented fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Application Name")
    }

    /// Name filtered to characters safe in file and directory names.
    pub fn fs_name(&self) -> String {
        let filtered: String = self
            .display_name()
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
            .collect();
        let trimmed = filtered.trim();
        if trimmed.is_empty() {
            "UnknownApplication".to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn vendor_or_default(&self) -> &str {
        self.vendor.as_deref().unwrap_or("Unknown vendor")
    }

    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or("1.0")
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("none")
    }

    /// Title, falling back to the description.
    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .unwrap_or_else(|| self.description_or_default())
    }

    /// The application resources, or a configuration error when unset.
    pub fn app_resources(&self) -> Result<&RelativeFileSet> {
        self.app_resources.as_ref().ok_or_else(|| {
            Error::config(
                "no application resources configured",
                "set BundleParams.app_resources to the directory holding the application jars",
            )
        })
    }

    /// All JVM options in descriptor order: raw args first, then properties
    /// as `-Dkey=value`.
    pub fn all_jvm_options(&self) -> Vec<String> {
        let mut options = self.jvm_args.clone();
        options.extend(
            self.jvm_properties
                .iter()
                .map(|(k, v)| format!("-D{k}={v}")),
        );
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_fall_back() {
        let params = BundleParams::default();
        assert_eq!(params.display_name(), "Unknown Application Name");
        assert_eq!(params.vendor_or_default(), "Unknown vendor");
        assert_eq!(params.version_or_default(), "1.0");
        assert_eq!(params.description_or_default(), "none");
        assert_eq!(params.title_or_default(), "none");
    }

    #[test]
    fn fs_name_strips_hostile_characters() {
        let mut params = BundleParams::default();
        params.name = Some("My App: The/Sequel?".to_string());
        assert_eq!(params.fs_name(), "My App TheSequel");
    }

    #[test]
    fn missing_app_resources_is_a_config_error() {
        let params = BundleParams::default();
        assert!(params.app_resources().is_err());
    }

    #[test]
    fn jvm_options_keep_args_before_properties() {
        let mut params = BundleParams::default();
        params.jvm_args = vec!["-Xmx512m".to_string()];
        params
            .jvm_properties
            .insert("app.mode".to_string(), "prod".to_string());
        assert_eq!(
            params.all_jvm_options(),
            vec!["-Xmx512m".to_string(), "-Dapp.mode=prod".to_string()]
        );
    }
}
