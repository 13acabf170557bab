use std::process::ExitStatus;

use anyhow::Result;
use cargo_metadata::{Metadata, Package};
use thiserror::Error;
use tokio::process::Command;

/// A child process that failed after printing its own diagnostics.
#[derive(Clone, Error, Debug)]
#[error("`{program}` exited unsuccessfully ({status})")]
pub struct ProcessError {
    pub program: String,
    pub status: ExitStatus,
}

/// True for errors that need no further printing.
pub fn is_error_silent(err: &anyhow::Error) -> bool {
    err.is::<ProcessError>()
}

pub fn check_status(program: &str, status: ExitStatus) -> Result<(), ProcessError> {
    if status.success() {
        Ok(())
    } else {
        Err(ProcessError {
            program: program.to_string(),
            status,
        })
    }
}

/// Runs `cmd` to completion, failing with [`ProcessError`] on a non-zero exit.
pub async fn run_command(mut cmd: Command) -> Result<()> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    let status = cmd.status().await?;
    check_status(&program, status)?;
    Ok(())
}

/// The single default workspace member, if there is exactly one.
pub fn default_package(meta: &Metadata) -> Option<&Package> {
    let [id] = &meta.workspace_default_members[..] else {
        return None;
    };
    meta.packages.iter().find(|package| &package.id == id)
}
