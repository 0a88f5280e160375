//! External tool detection.
//!
//! Installer bundlers shell out to native packaging tools (dpkg-deb, the
//! WiX toolset, Inno Setup). Detection happens per packaging run, at
//! validation time, so a missing tool excludes one bundler instead of
//! failing the run.

use std::path::PathBuf;

use regex::Regex;
use tokio::process::Command;

use crate::bundler::error::Result;
use crate::bundler::utils::process;

/// Looks a tool up on `PATH`.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            log::debug!("found {name} at {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{name} not found on PATH: {e}");
            None
        }
    }
}

/// Probes a tool's `(major, minor)` version by running it with `arg` and
/// scanning the merged output for `version <major>.<minor>`.
///
/// The probe tolerates a non-zero exit status; several tools (the WiX
/// compilers among them) print their banner to a failing `/?` invocation.
pub async fn probe_version(tool: &PathBuf, arg: &str) -> Result<Option<(u32, u32)>> {
    let mut command = Command::new(tool);
    command.arg(arg);
    let output = process::exec_capture(command).await?;
    Ok(parse_version(&output))
}

fn parse_version(output: &str) -> Option<(u32, u32)> {
    let re = Regex::new(r"version (\d+)\.(\d+)").ok()?;
    let caps = re.captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_banner_is_parsed() {
        let banner = "Windows Installer XML Toolset Compiler version 3.11.2.4516\n";
        assert_eq!(parse_version(banner), Some((3, 11)));
    }

    #[test]
    fn missing_version_yields_none() {
        assert_eq!(parse_version("usage: candle [options] file"), None);
    }

    #[test]
    fn missing_tool_is_none() {
        assert!(find_tool("definitely-not-a-real-tool-name").is_none());
    }
}
