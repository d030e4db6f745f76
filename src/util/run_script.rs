use crate::types::AdminError;
use anyhow::Result;
use log::trace;
use std::path::Path;
use std::process::Command;

/// Runs a sandbox control script to completion, inheriting stdio. The exit
/// status gates whatever comes next; a non-zero or signaled exit is a
/// `ProcessFailure`. No timeout is enforced.
pub fn run_script(script: &Path, args: &[&str]) -> Result<()> {
    trace!("Running {} {:?}", script.display(), args);

    let status = Command::new(script).args(args).status().map_err(|e| {
        AdminError::ProcessFailure {
            command: script.display().to_string(),
            status: e.to_string(),
        }
    })?;

    if !status.success() {
        return Err(AdminError::ProcessFailure {
            command: script.display().to_string(),
            status: status.to_string(),
        }
        .into());
    }

    Ok(())
}
