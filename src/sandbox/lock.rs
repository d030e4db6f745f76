use crate::sandbox::{
    LockState, Sandbox, ScriptRole, resolve_lock_state, script_name,
};
use crate::templates::{COPYRIGHT, TemplateSet};
use crate::types::AdminError;
use crate::util::exec_exists;
use anyhow::{Context, Result};
use chrono::Local;
use log::trace;
use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    Locked,
    AlreadyLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    NotLocked,
}

/* Locking swaps scripts with two plain renames. Nothing serializes two
 * concurrent invocations against the same sandbox; the lock is a deletion
 * guard, not a mutex. */
impl Sandbox {
    /// Makes the sandbox immune to this tool's delete command by setting the
    /// deletion script aside and installing a placeholder that explains how
    /// to reverse the swap. The data directory is untouched.
    pub fn lock(&self, templates: &TemplateSet) -> Result<LockOutcome> {
        if !self.exists() {
            return Err(AdminError::NotFound(self.path.clone()).into());
        }

        let state = resolve_lock_state(self)?;
        let topology = match state {
            LockState::Locked(_) => return Ok(LockOutcome::AlreadyLocked),
            LockState::Unlocked(topology) => topology,
        };

        let clear = self.script(topology, ScriptRole::Clear);
        let no_clear = self.script(topology, ScriptRole::NoClear);

        trace!(
            "Preserving {} as {}",
            clear.display(),
            no_clear.display()
        );
        std::fs::rename(&clear, &no_clear).map_err(|e| {
            AdminError::FileSystem {
                action: format!(
                    "rename {} to {}",
                    clear.display(),
                    no_clear.display()
                ),
                source: e,
            }
        })?;

        let values = HashMap::from([
            ("Copyright", COPYRIGHT.to_string()),
            ("AppVersion", env!("CARGO_PKG_VERSION").to_string()),
            (
                "Timestamp",
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            ("SandboxDir", self.name.clone()),
            ("ClearCmd", script_name(topology, ScriptRole::Clear).to_string()),
            (
                "NoClearCmd",
                script_name(topology, ScriptRole::NoClear).to_string(),
            ),
        ]);
        let placeholder = templates
            .render("sb_locked", &values)
            .context("Rendering lock placeholder")?;

        std::fs::write(&clear, placeholder).map_err(|e| {
            AdminError::FileSystem {
                action: format!("write {}", clear.display()),
                source: e,
            }
        })?;
        std::fs::set_permissions(
            &clear,
            std::fs::Permissions::from_mode(0o744),
        )
        .map_err(|e| AdminError::FileSystem {
            action: format!("chmod {}", clear.display()),
            source: e,
        })?;

        Ok(LockOutcome::Locked)
    }

    /// Restores the preserved deletion script byte-for-byte. The rename onto
    /// the placeholder path replaces it in one step.
    pub fn unlock(&self) -> Result<UnlockOutcome> {
        if !self.exists() {
            return Err(AdminError::NotFound(self.path.clone()).into());
        }

        let state = match resolve_lock_state(self) {
            Ok(state) => state,
            // no deletion script under either name: nothing is suspended,
            // so there is nothing to unlock
            Err(_) => return Ok(UnlockOutcome::NotLocked),
        };
        let topology = match state {
            LockState::Unlocked(_) => return Ok(UnlockOutcome::NotLocked),
            LockState::Locked(topology) => topology,
        };

        let clear = self.script(topology, ScriptRole::Clear);
        let no_clear = self.script(topology, ScriptRole::NoClear);

        // a locked sandbox always carries the placeholder; its absence means
        // someone tampered with the directory
        if !exec_exists(&clear) {
            return Err(AdminError::ScriptNotFound(clear).into());
        }

        trace!(
            "Restoring {} from {}",
            clear.display(),
            no_clear.display()
        );
        std::fs::rename(&no_clear, &clear).map_err(|e| {
            AdminError::FileSystem {
                action: format!(
                    "rename {} to {}",
                    no_clear.display(),
                    clear.display()
                ),
                source: e,
            }
        })?;

        Ok(UnlockOutcome::Unlocked)
    }
}
