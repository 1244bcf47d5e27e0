use std::fs::File;
use std::process::{Command, Output, Stdio};

use crate::error::{DeployError, DeployResult};

/// Run a command and capture its output. Fails if the command
/// returns a non-zero exit code.
pub fn run(program: &str, args: &[&str]) -> DeployResult<String> {
    let output = spawn(program, args)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let command = format_command(program, args);
        eprintln!("stderr: {stderr}");
        Err(DeployError::CommandFailed {
            command,
            status: output.status,
        })
    }
}

/// Run a command with stdin/stdout/stderr inherited (interactive).
pub fn run_interactive(program: &str, args: &[&str]) -> DeployResult<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeployError::CommandNotFound(program.to_string())
            } else {
                DeployError::Io(e)
            }
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(DeployError::CommandFailed {
            command: format_command(program, args),
            status,
        })
    }
}

/// Run a command with stdout and stderr redirected into a log
/// file. Nothing reaches the terminal.
pub fn run_logged(program: &str, args: &[&str], log: &File) -> DeployResult<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log.try_clone()?))
        .stderr(Stdio::from(log.try_clone()?))
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeployError::CommandNotFound(program.to_string())
            } else {
                DeployError::Io(e)
            }
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(DeployError::CommandFailed {
            command: format_command(program, args),
            status,
        })
    }
}

/// Run a shell pipeline (via `sh -c`) interactively.
pub fn run_pipeline(shell_cmd: &str) -> DeployResult<()> {
    run_interactive("sh", &["-c", shell_cmd])
}

/// Run a shell pipeline with its output redirected into a log
/// file.
pub fn run_pipeline_logged(shell_cmd: &str, log: &File) -> DeployResult<()> {
    run_logged("sh", &["-c", shell_cmd], log)
}

/// Check if a command exists on PATH.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn spawn(program: &str, args: &[&str]) -> DeployResult<Output> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeployError::CommandNotFound(program.to_string())
            } else {
                DeployError::Io(e)
            }
        })
}

pub(crate) fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}
