//! Overridable resource resolution.
//!
//! Every icon, launcher and template a bundler materializes can be replaced
//! by the invoking build: a like-named file in the drop-in root wins over the
//! bundled default. Templates additionally go through handlebars placeholder
//! substitution before landing on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;

use super::error::{Error, ErrorExt, Result};
use super::utils;

/// The fallback a call site supplies for a resource lookup.
pub enum ResourceDefault<'a> {
    /// A default bundled with this crate.
    Embedded {
        /// Name used in log output
        name: &'static str,
        data: &'a [u8],
    },
    /// A literal file to copy when no override exists.
    File(PathBuf),
    /// No fallback: the override must exist or resolution fails.
    None,
}

/// Where a resolved resource came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedResource {
    /// Found in the drop-in root.
    Custom(PathBuf),
    /// The bundled default.
    Default(&'static str),
    /// A caller-supplied literal file.
    DefaultFile(PathBuf),
}

/// Resolves customizable resources against a drop-in override directory,
/// falling back to bundled defaults.
#[derive(Clone, Debug, Default)]
pub struct ResourceLocator {
    drop_in_root: Option<PathBuf>,
    verbose: bool,
}

impl ResourceLocator {
    pub fn new(drop_in_root: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            drop_in_root,
            verbose,
        }
    }

    fn log(&self, message: String) {
        if self.verbose {
            log::info!("{message}");
        } else {
            log::debug!("{message}");
        }
    }

    /// Resolves `public_name`, preferring a drop-in override.
    ///
    /// Returns `None` only when there is no override and no default.
    /// `category` is a human-readable description used for logging.
    pub fn locate(
        &self,
        public_name: &str,
        category: &str,
        default: &ResourceDefault<'_>,
    ) -> Option<ResolvedResource> {
        if let Some(root) = &self.drop_in_root {
            let candidate = root.join(public_name);
            if candidate.is_file() {
                self.log(format!(
                    "Using custom {category} (loaded from {})",
                    candidate.display()
                ));
                return Some(ResolvedResource::Custom(candidate));
            }
        }
        match default {
            ResourceDefault::Embedded { name, .. } => {
                self.log(format!("Using default {category} (bundled as {name})"));
                Some(ResolvedResource::Default(*name))
            }
            ResourceDefault::File(path) if path.is_file() => {
                self.log(format!(
                    "Using default {category} (copied from {})",
                    path.display()
                ));
                Some(ResolvedResource::DefaultFile(path.clone()))
            }
            _ => None,
        }
    }

    /// Resolves and loads the resource content.
    fn load(
        &self,
        public_name: &str,
        category: &str,
        default: &ResourceDefault<'_>,
    ) -> Result<Vec<u8>> {
        match self.locate(public_name, category, default) {
            Some(ResolvedResource::Custom(path)) | Some(ResolvedResource::DefaultFile(path)) => {
                std::fs::read(&path).fs_context("reading resource", path)
            }
            Some(ResolvedResource::Default(_)) => match default {
                ResourceDefault::Embedded { data, .. } => Ok(data.to_vec()),
                // locate() only reports Default for embedded fallbacks
                _ => unreachable!("embedded resource without data"),
            },
            None => Err(Error::GenericError(format!(
                "internal error: no override and no default for required resource {public_name} ({category})"
            ))),
        }
    }

    /// Materializes the resolved resource at `dest`.
    pub async fn fetch(
        &self,
        public_name: &str,
        category: &str,
        default: &ResourceDefault<'_>,
        dest: &Path,
    ) -> Result<()> {
        let content = self.load(public_name, category, default)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating resource directory", parent)?;
        }
        tokio::fs::write(dest, content)
            .await
            .fs_context("writing resource", dest)
    }

    /// [`ResourceLocator::fetch`] followed by marking `dest` executable.
    pub async fn fetch_executable(
        &self,
        public_name: &str,
        category: &str,
        default: &ResourceDefault<'_>,
        dest: &Path,
    ) -> Result<()> {
        self.fetch(public_name, category, default, dest).await?;
        utils::fs::set_executable(dest).await
    }

    /// Resolves a text resource, substitutes `data` into it and writes the
    /// result to `dest`. Used for every generated descriptor and project
    /// file (Info.plist, DEBIAN control, .wxs, .iss).
    pub async fn preprocess_text_resource(
        &self,
        public_name: &str,
        category: &str,
        default: &ResourceDefault<'_>,
        data: &BTreeMap<&str, String>,
        dest: &Path,
    ) -> Result<()> {
        let raw = self.load(public_name, category, default)?;
        let template = std::str::from_utf8(&raw)?;
        let rendered = render(template, data)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating resource directory", parent)?;
        }
        tokio::fs::write(dest, rendered)
            .await
            .fs_context("writing generated file", dest)
    }
}

/// Renders a handlebars template with escaping disabled.
///
/// Installer project files are XML/INI-ish formats whose values the call
/// sites control; HTML escaping would corrupt them.
pub fn render(template: &str, data: &BTreeMap<&str, String>) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("resource", template)?;
    Ok(handlebars.render("resource", data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: ResourceDefault<'static> = ResourceDefault::Embedded {
        name: "test/default.txt",
        data: b"default content",
    };

    #[tokio::test]
    async fn override_wins_over_default() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("res.txt"), b"custom content").expect("write");

        let locator = ResourceLocator::new(Some(tmp.path().to_path_buf()), false);
        let dest = tmp.path().join("out.txt");
        locator
            .fetch("res.txt", "test resource", &DEFAULT, &dest)
            .await
            .expect("fetch");
        assert_eq!(std::fs::read(&dest).expect("read"), b"custom content");
    }

    #[tokio::test]
    async fn missing_override_falls_back_to_default() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let locator = ResourceLocator::new(Some(tmp.path().to_path_buf()), false);
        let dest = tmp.path().join("out.txt");
        locator
            .fetch("res.txt", "test resource", &DEFAULT, &dest)
            .await
            .expect("fallback must not fail");
        assert_eq!(std::fs::read(&dest).expect("read"), b"default content");
    }

    #[tokio::test]
    async fn no_override_and_no_default_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let locator = ResourceLocator::new(Some(tmp.path().to_path_buf()), false);
        assert!(
            locator
                .locate("res.txt", "test resource", &ResourceDefault::None)
                .is_none()
        );
        let err = locator
            .fetch(
                "res.txt",
                "test resource",
                &ResourceDefault::None,
                &tmp.path().join("out.txt"),
            )
            .await
            .expect_err("must fail");
        assert!(err.to_string().contains("internal error"));
    }

    #[tokio::test]
    async fn literal_file_default_is_copied() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let literal = tmp.path().join("literal.txt");
        std::fs::write(&literal, b"literal").expect("write");

        let locator = ResourceLocator::new(None, false);
        let dest = tmp.path().join("out.txt");
        locator
            .fetch(
                "res.txt",
                "test resource",
                &ResourceDefault::File(literal),
                &dest,
            )
            .await
            .expect("fetch");
        assert_eq!(std::fs::read(&dest).expect("read"), b"literal");
    }

    #[test]
    fn render_substitutes_every_key() {
        let mut data = BTreeMap::new();
        data.insert("application_name", "Demo".to_string());
        data.insert("application_version", "1.2.3".to_string());
        let out = render(
            "Name={{application_name}} Version={{application_version}}",
            &data,
        )
        .expect("render");
        assert_eq!(out, "Name=Demo Version=1.2.3");
    }

    #[test]
    fn render_does_not_escape_values() {
        let mut data = BTreeMap::new();
        data.insert("vendor", "Smith & Jones".to_string());
        let out = render("Vendor={{vendor}}", &data).expect("render");
        assert_eq!(out, "Vendor=Smith & Jones");
    }
}
