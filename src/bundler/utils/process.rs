//! Child-process execution with captured, logged output.

use std::process::Stdio;

use tokio::process::Command;

use crate::bundler::error::{Error, Result};

fn describe(command: &Command) -> String {
    let program = command.as_std().get_program().to_string_lossy().to_string();
    let args: Vec<String> = command
        .as_std()
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    if args.is_empty() {
        program
    } else {
        format!("{program} {}", args.join(" "))
    }
}

/// Runs a command to completion, capturing stdout and stderr.
///
/// Output lines are logged at info level when `verbose`, debug otherwise.
/// A non-zero exit status is an error; spawn failure (tool not on PATH,
/// not executable) is reported separately.
pub async fn exec(mut command: Command, verbose: bool) -> Result<()> {
    let label = describe(&command);
    log::debug!("running {label}");

    let output = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: label.clone(),
            error,
        })?;

    for line in String::from_utf8_lossy(&output.stdout)
        .lines()
        .chain(String::from_utf8_lossy(&output.stderr).lines())
    {
        if verbose {
            log::info!("{line}");
        } else {
            log::debug!("{line}");
        }
    }

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::CommandStatus {
            command: label,
            status: output.status.to_string(),
        })
    }
}

/// Runs a command and returns its merged stdout+stderr regardless of exit
/// status. Used for tool probes whose interesting output may accompany a
/// non-zero exit (e.g. `candle /?`).
pub async fn exec_capture(mut command: Command) -> Result<String> {
    let label = describe(&command);
    log::debug!("probing with {label}");

    let output = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: label,
            error,
        })?;

    let mut merged = String::from_utf8_lossy(&output.stdout).to_string();
    merged.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(merged)
}
