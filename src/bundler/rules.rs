//! Declarative inclusion/exclusion rules for runtime subsetting.
//!
//! A full runtime image carries deployment machinery, browser-plugin bridges
//! and documentation that a packaged desktop application never touches.
//! Rather than hard-wiring the traversal, each target OS gets an ordered
//! rule list; the first rule whose pattern matches a candidate path decides
//! its fate, and paths no rule matches are included.

use std::path::{Path, PathBuf};

use regex::Regex;

use super::error::{ErrorExt, Result};
use super::settings::TargetOs;

/// How a rule's pattern is matched against a candidate relative path.
#[derive(Clone, Debug)]
pub enum Pattern {
    /// `ends_with` on the candidate.
    Suffix(String),
    /// `starts_with` on the candidate.
    Prefix(String),
    /// `contains` on the candidate.
    Substring(String),
    /// Full-string regex match.
    Regex(Regex),
}

impl Pattern {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Pattern::Suffix(s) => candidate.ends_with(s.as_str()),
            Pattern::Prefix(s) => candidate.starts_with(s.as_str()),
            Pattern::Substring(s) => candidate.contains(s.as_str()),
            Pattern::Regex(re) => re
                .find(candidate)
                .is_some_and(|m| m.start() == 0 && m.end() == candidate.len()),
        }
    }
}

/// Rule polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Include,
    Exclude,
}

/// One pattern rule in an ordered ruleset.
#[derive(Clone, Debug)]
pub struct Rule {
    pattern: Pattern,
    action: Action,
}

impl Rule {
    pub fn include(pattern: Pattern) -> Self {
        Self {
            pattern,
            action: Action::Include,
        }
    }

    pub fn exclude(pattern: Pattern) -> Self {
        Self {
            pattern,
            action: Action::Exclude,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

/// Outcome of the first matching rule, or `None` when nothing matches.
fn evaluate(candidate: &str, rules: &[Rule]) -> Option<Action> {
    rules
        .iter()
        .find(|r| r.pattern.matches(candidate))
        .map(|r| r.action)
}

/// Whether `file` should be dropped from the subset.
///
/// The candidate is `file` relative to `base`, lower-cased, with a leading
/// platform separator so directory rules like `/lib/ext/` anchor the same
/// way at the top of the tree as further down. No match (or an empty
/// ruleset) means include.
pub fn should_exclude(base: &Path, file: &Path, rules: &[Rule]) -> bool {
    let rel = match file.strip_prefix(base) {
        Ok(rel) => rel,
        // not under the base at all: nothing to subset
        Err(_) => return false,
    };
    let mut candidate = rel.to_string_lossy().to_lowercase();
    candidate.insert(0, std::path::MAIN_SEPARATOR);
    matches!(evaluate(&candidate, rules), Some(Action::Exclude))
}

/// Depth-first walk of `root`, accumulating every regular file under it that
/// the ruleset keeps. Symbolic links are neither followed nor collected.
///
/// Candidates are evaluated relative to `base`, which may be an ancestor of
/// `root` when only part of a tree is being subsetted.
pub fn walk(base: &Path, root: &Path, rules: &[Rule], out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(root)
        .fs_context("reading directory", root)?
        .collect::<std::io::Result<Vec<_>>>()
        .fs_context("reading directory entry", root)?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        let meta = path
            .symlink_metadata()
            .fs_context("inspecting file", &path)?;
        if meta.file_type().is_symlink() {
            log::debug!("skipping symbolic link {}", path.display());
            continue;
        }
        if meta.is_dir() {
            walk(base, &path, rules, out)?;
        } else if !should_exclude(base, &path, rules) {
            out.push(path);
        }
    }
    Ok(())
}

/// The hard-coded runtime-subsetting ruleset for a target OS.
///
/// Order matters: `jfxrt.jar` is re-included ahead of the blanket `ext`
/// directory exclusion.
pub fn ruleset_for(os: TargetOs) -> Vec<Rule> {
    let sep = match os {
        TargetOs::Windows => '\\',
        _ => '/',
    };
    let sub = |s: &str| Pattern::Substring(s.replace('/', &sep.to_string()));
    let suf = |s: &str| Pattern::Suffix(s.replace('/', &sep.to_string()));

    let mut rules = vec![
        // the JavaFX runtime lives in ext; keep it while dropping its siblings
        Rule::include(Pattern::Suffix("jfxrt.jar".into())),
        Rule::exclude(sub("/lib/ext/")),
        // deployment toolkit and Java Web Start
        Rule::exclude(sub("/lib/deploy")),
        Rule::exclude(Pattern::Suffix("deploy.jar".into())),
        Rule::exclude(Pattern::Suffix("javaws.jar".into())),
        Rule::exclude(sub("/lib/plugin")),
    ];

    match os {
        TargetOs::Windows => {
            rules.extend([
                Rule::exclude(sub("/bin/new_plugin")),
                Rule::exclude(suf("/bin/javaws.exe")),
                Rule::exclude(suf("/bin/javaw.exe.manifest")),
                Rule::exclude(Pattern::Regex(
                    Regex::new(r".*npjp\w*\.dll").expect("static pattern"),
                )),
                Rule::exclude(Pattern::Suffix(".pdb".into())),
                Rule::exclude(Pattern::Suffix(".map".into())),
            ]);
        }
        TargetOs::Linux => {
            rules.extend([
                Rule::exclude(suf("/bin/javaws")),
                Rule::exclude(Pattern::Suffix("libnpjp2.so".into())),
                Rule::exclude(sub("/man/")),
            ]);
        }
        TargetOs::MacOs => {
            rules.extend([
                Rule::exclude(suf("/bin/javaws")),
                Rule::exclude(sub("/man/")),
            ]);
        }
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(candidate: &str, rules: &[Rule]) -> Option<Action> {
        evaluate(candidate, rules)
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            Rule::include(Pattern::Suffix("jfxrt.jar".into())),
            Rule::exclude(Pattern::Substring("lib/ext/".into())),
        ];
        assert_eq!(
            eval("lib/ext/jfxrt.jar", &rules),
            Some(Action::Include)
        );
        assert_eq!(
            eval("lib/ext/sunec.jar", &rules),
            Some(Action::Exclude)
        );
    }

    #[test]
    fn reordering_overlapping_rules_changes_outcomes() {
        let reversed = vec![
            Rule::exclude(Pattern::Substring("lib/ext/".into())),
            Rule::include(Pattern::Suffix("jfxrt.jar".into())),
        ];
        assert_eq!(
            eval("lib/ext/jfxrt.jar", &reversed),
            Some(Action::Exclude)
        );
    }

    #[test]
    fn reordering_non_overlapping_rules_does_not() {
        let a = vec![
            Rule::exclude(Pattern::Suffix(".pdb".into())),
            Rule::exclude(Pattern::Prefix("man/".into())),
        ];
        let b = vec![
            Rule::exclude(Pattern::Prefix("man/".into())),
            Rule::exclude(Pattern::Suffix(".pdb".into())),
        ];
        for candidate in ["bin/java.pdb", "man/java.1", "lib/rt.jar"] {
            assert_eq!(eval(candidate, &a), eval(candidate, &b));
        }
    }

    #[test]
    fn no_match_defaults_to_include() {
        let rules = vec![Rule::exclude(Pattern::Suffix(".map".into()))];
        assert_eq!(eval("lib/rt.jar", &rules), None);

        let tmp = tempfile::tempdir().expect("tempdir");
        let file = tmp.path().join("rt.jar");
        std::fs::write(&file, b"x").expect("write");
        assert!(!should_exclude(tmp.path(), &file, &rules));
        assert!(!should_exclude(tmp.path(), &file, &[]));
    }

    #[test]
    fn regex_requires_full_string_match() {
        let rules = vec![Rule::exclude(Pattern::Regex(
            Regex::new(r"bin/java").expect("pattern"),
        ))];
        // partial hit inside a longer candidate does not count
        assert_eq!(eval("bin/javaws", &rules), None);
        assert_eq!(eval("bin/java", &rules), Some(Action::Exclude));
    }

    #[test]
    fn candidate_is_lowercased() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let file = tmp.path().join("README.TXT");
        std::fs::write(&file, b"x").expect("write");
        let rules = vec![Rule::exclude(Pattern::Suffix(".txt".into()))];
        assert!(should_exclude(tmp.path(), &file, &rules));
    }

    #[test]
    fn walk_collects_surviving_files_depth_first() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        std::fs::create_dir_all(root.join("lib/ext")).expect("mkdir");
        std::fs::write(root.join("lib/rt.jar"), b"x").expect("write");
        std::fs::write(root.join("lib/ext/jfxrt.jar"), b"x").expect("write");
        std::fs::write(root.join("lib/ext/sunec.jar"), b"x").expect("write");

        let rules = ruleset_for(TargetOs::Linux);
        let mut out = Vec::new();
        walk(root, root, &rules, &mut out).expect("walk");

        assert!(out.contains(&root.join("lib/rt.jar")));
        assert!(out.contains(&root.join("lib/ext/jfxrt.jar")));
        assert!(!out.contains(&root.join("lib/ext/sunec.jar")));
    }

    #[cfg(unix)]
    #[test]
    fn walk_never_collects_symlinks() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        for i in 0..4 {
            std::fs::write(root.join(format!("f{i}.jar")), b"x").expect("write");
        }
        std::os::unix::fs::symlink(root.join("f0.jar"), root.join("link.jar")).expect("symlink");

        let mut out = Vec::new();
        walk(root, root, &[], &mut out).expect("walk");
        assert_eq!(out.len(), 4);
        assert!(!out.contains(&root.join("link.jar")));
    }
}
