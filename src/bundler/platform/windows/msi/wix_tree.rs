//! Staged-image to WiX fragment conversion.
//!
//! Walks the application image and emits `bundle.wxi`: one `Component` per
//! directory level holding that directory's `File` entries, subdirectories
//! wrapped in `Directory` elements, and a closing `Feature` referencing
//! every emitted component. The launcher file keeps a stable id so
//! shortcuts and branding can refer to it across rebuilds.

use std::path::Path;

use uuid::Uuid;

use crate::bundler::error::{ErrorExt, Result};

/// Stable WiX id of the launcher executable's `File` element.
pub const LAUNCHER_ID: &str = "LauncherId";

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shortcut configuration for the launcher component.
#[derive(Clone, Copy, Debug)]
pub struct ShortcutPolicy {
    pub desktop: bool,
    pub menu: bool,
}

impl ShortcutPolicy {
    /// An installer with no entry points is useless, so when neither
    /// shortcut was requested the menu one is forced on.
    pub fn effective(desktop: bool, menu: bool) -> Self {
        if !desktop && !menu {
            log::info!("neither shortcut was requested; enabling the start-menu shortcut");
            Self {
                desktop: false,
                menu: true,
            }
        } else {
            Self { desktop, menu }
        }
    }
}

pub struct WixTreeBuilder {
    launcher_file: String,
    application_name: String,
    vendor: String,
    version: String,
    per_user: bool,
    shortcuts: ShortcutPolicy,
    component_refs: Vec<String>,
    file_seq: u32,
    dir_seq: u32,
    comp_seq: u32,
    out: String,
}

impl WixTreeBuilder {
    pub fn new(
        launcher_file: impl Into<String>,
        application_name: impl Into<String>,
        vendor: impl Into<String>,
        version: impl Into<String>,
        per_user: bool,
        shortcuts: ShortcutPolicy,
    ) -> Self {
        Self {
            launcher_file: launcher_file.into(),
            application_name: application_name.into(),
            vendor: vendor.into(),
            version: version.into(),
            per_user,
            shortcuts,
            component_refs: vec!["CleanupMainApplicationFolder".to_string()],
            file_seq: 0,
            dir_seq: 0,
            comp_seq: 0,
            out: String::new(),
        }
    }

    /// Walks `image_root` and renders the complete `bundle.wxi` text.
    pub fn build(mut self, image_root: &Path) -> Result<String> {
        self.out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Include>\n");
        self.out.push_str("  <DirectoryRef Id=\"APPLICATIONFOLDER\">\n");
        self.walk(image_root, 2)?;
        self.out.push_str("  </DirectoryRef>\n");

        self.out
            .push_str("  <Feature Id=\"DefaultFeature\" Title=\"Main Feature\" Level=\"1\">\n");
        for id in &self.component_refs {
            self.out
                .push_str(&format!("    <ComponentRef Id=\"{id}\"/>\n"));
        }
        self.out.push_str("  </Feature>\n</Include>\n");
        Ok(self.out)
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    fn walk(&mut self, dir: &Path, depth: usize) -> Result<()> {
        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .fs_context("reading directory", dir)?
            .collect::<std::io::Result<Vec<_>>>()
            .fs_context("reading directory entry", dir)?
            .into_iter()
            .map(|e| e.path())
            .collect();
        entries.sort();
        for path in entries {
            if path.is_dir() {
                subdirs.push(path);
            } else {
                files.push(path);
            }
        }

        if !files.is_empty() {
            self.emit_component(&files, depth)?;
        }

        for subdir in subdirs {
            self.dir_seq += 1;
            let name = subdir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.indent(depth);
            self.out.push_str(&format!(
                "<Directory Id=\"dir{}\" Name=\"{}\">\n",
                self.dir_seq,
                xml_escape(&name)
            ));
            self.walk(&subdir, depth + 1)?;
            self.indent(depth);
            self.out.push_str("</Directory>\n");
        }
        Ok(())
    }

    fn emit_component(&mut self, files: &[std::path::PathBuf], depth: usize) -> Result<()> {
        self.comp_seq += 1;
        let component_id = format!("comp{}", self.comp_seq);
        let holds_launcher = files.iter().any(|f| {
            f.file_name()
                .is_some_and(|n| n.to_string_lossy() == self.launcher_file)
        });

        self.indent(depth);
        self.out.push_str(&format!(
            "<Component Id=\"{component_id}\" Guid=\"{{{}}}\">\n",
            Uuid::new_v4().to_string().to_uppercase()
        ));

        // An HKCU key path keeps validation happy for per-user installs and
        // gives the launcher component a stable presence marker.
        if self.per_user || holds_launcher {
            self.indent(depth + 1);
            self.out.push_str(&format!(
                "<RegistryKey Root=\"HKCU\" Key=\"Software\\{}\\{}\\{component_id}\">\n",
                xml_escape(&self.vendor),
                xml_escape(&self.application_name)
            ));
            self.indent(depth + 2);
            self.out.push_str(&format!(
                "<RegistryValue Name=\"Version\" Value=\"{}\" Type=\"string\" KeyPath=\"yes\"/>\n",
                xml_escape(&self.version)
            ));
            self.indent(depth + 1);
            self.out.push_str("</RegistryKey>\n");
        }
        let keyed_by_registry = self.per_user || holds_launcher;

        let mut first_in_component = true;
        for file in files {
            self.file_seq += 1;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let is_launcher = name == self.launcher_file;
            let file_id = if is_launcher {
                LAUNCHER_ID.to_string()
            } else {
                format!("file{}", self.file_seq)
            };
            // exactly one key path per component: the registry value when
            // present, otherwise the component's first file
            let key_path = if keyed_by_registry || !first_in_component {
                ""
            } else {
                " KeyPath=\"yes\""
            };
            first_in_component = false;

            self.indent(depth + 1);
            if is_launcher {
                self.out.push_str(&format!(
                    "<File Id=\"{file_id}\" Name=\"{}\" Source=\"{}\"{key_path}>\n",
                    xml_escape(&name),
                    xml_escape(&file.display().to_string())
                ));
                if self.shortcuts.desktop {
                    self.indent(depth + 2);
                    self.out.push_str(&format!(
                        "<Shortcut Id=\"DesktopShortcut\" Directory=\"DesktopFolder\" Name=\"{}\" WorkingDirectory=\"APPLICATIONFOLDER\" Advertise=\"no\"/>\n",
                        xml_escape(&self.application_name)
                    ));
                }
                if self.shortcuts.menu {
                    self.indent(depth + 2);
                    self.out.push_str(&format!(
                        "<Shortcut Id=\"MenuShortcut\" Directory=\"ProgramMenuDir\" Name=\"{}\" WorkingDirectory=\"APPLICATIONFOLDER\" Advertise=\"no\"/>\n",
                        xml_escape(&self.application_name)
                    ));
                }
                self.indent(depth + 1);
                self.out.push_str("</File>\n");
            } else {
                self.out.push_str(&format!(
                    "<File Id=\"{file_id}\" Name=\"{}\" Source=\"{}\"{key_path}/>\n",
                    xml_escape(&name),
                    xml_escape(&file.display().to_string())
                ));
            }
        }

        self.indent(depth);
        self.out.push_str("</Component>\n");
        self.component_refs.push(component_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_image(root: &Path) {
        std::fs::create_dir_all(root.join("app")).expect("mkdir");
        std::fs::write(root.join("Demo.exe"), b"mz").expect("write");
        std::fs::write(root.join("app/demo.jar"), b"jar").expect("write");
        std::fs::write(root.join("app/package.cfg"), b"app.version=1.0\n").expect("write");
    }

    fn build(root: &Path, per_user: bool, shortcuts: ShortcutPolicy) -> String {
        WixTreeBuilder::new("Demo.exe", "Demo", "Acme", "1.0", per_user, shortcuts)
            .build(root)
            .expect("build")
    }

    #[test]
    fn launcher_gets_the_stable_id_and_forced_menu_shortcut() {
        let tmp = tempfile::tempdir().expect("tempdir");
        demo_image(tmp.path());

        let wxi = build(tmp.path(), false, ShortcutPolicy::effective(false, false));
        assert!(wxi.contains("Id=\"LauncherId\""));
        // no shortcut requested, menu one forced on
        assert!(wxi.contains("Id=\"MenuShortcut\""));
        assert!(!wxi.contains("Id=\"DesktopShortcut\""));
    }

    #[test]
    fn every_component_is_referenced_by_the_feature() {
        let tmp = tempfile::tempdir().expect("tempdir");
        demo_image(tmp.path());

        let wxi = build(tmp.path(), false, ShortcutPolicy::effective(true, true));
        let components = wxi.matches("<Component Id=\"comp").count();
        let refs = wxi.matches("<ComponentRef Id=\"comp").count();
        assert!(components >= 2, "one component per directory level");
        assert_eq!(components, refs);
        assert!(wxi.contains("<ComponentRef Id=\"CleanupMainApplicationFolder\"/>"));
    }

    #[test]
    fn per_user_installs_use_registry_key_paths() {
        let tmp = tempfile::tempdir().expect("tempdir");
        demo_image(tmp.path());

        let wxi = build(tmp.path(), true, ShortcutPolicy::effective(false, true));
        assert!(wxi.contains("Root=\"HKCU\""));
        assert!(wxi.contains("KeyPath=\"yes\""));
    }

    #[test]
    fn subdirectories_become_directory_elements() {
        let tmp = tempfile::tempdir().expect("tempdir");
        demo_image(tmp.path());

        let wxi = build(tmp.path(), false, ShortcutPolicy::effective(false, true));
        assert!(wxi.contains("<Directory Id=\"dir1\" Name=\"app\">"));
        assert!(wxi.contains("Name=\"demo.jar\""));
    }

    #[test]
    fn file_names_are_xml_escaped() {
        assert_eq!(xml_escape("a&b<c>\"d\""), "a&amp;b&lt;c&gt;&quot;d&quot;");
    }
}
