use crate::error::{BackupError, BackupResult};
use std::process::Command;

/// Capability to run an external command and capture its standard output.
pub trait CommandRunner {
    fn execute(&self, command: &[String]) -> BackupResult<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn execute(&self, command: &[String]) -> BackupResult<String> {
        (**self).execute(command)
    }
}

/// Runs commands on the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn execute(&self, command: &[String]) -> BackupResult<String> {
        let rendered = command.join(" ");
        let (program, args) = command
            .split_first()
            .ok_or_else(|| BackupError::InvalidOptions("empty command".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| BackupError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackupError::CommandFailed {
                command: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Prints what would run and returns no output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunCommandRunner;

impl CommandRunner for DryRunCommandRunner {
    fn execute(&self, command: &[String]) -> BackupResult<String> {
        let rendered = command.join(" ");
        tracing::info!(command = %rendered, "dry run, not executing");
        println!("{rendered}");
        Ok(String::new())
    }
}
