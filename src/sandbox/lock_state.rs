use crate::sandbox::{Sandbox, ScriptRole, Topology};
use crate::types::AdminError;
use crate::util::exec_exists;
use anyhow::Result;

/// Deletability of a sandbox, inferred from which of the two mutually
/// exclusive deletion-script names exists on disk. Derived on demand, never
/// stored: the filesystem is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked(Topology),
    Locked(Topology),
}

/// Single place where script presence turns into a tagged state. Group-level
/// names take precedence, falling back to single-instance naming, matching
/// the layout the deploy tool writes.
pub fn resolve_lock_state(sandbox: &Sandbox) -> Result<LockState> {
    for topology in [Topology::Multiple, Topology::Single] {
        if exec_exists(&sandbox.script(topology, ScriptRole::NoClear)) {
            return Ok(LockState::Locked(topology));
        }
    }
    for topology in [Topology::Multiple, Topology::Single] {
        if exec_exists(&sandbox.script(topology, ScriptRole::Clear)) {
            return Ok(LockState::Unlocked(topology));
        }
    }
    Err(AdminError::ScriptNotFound(
        sandbox.script(Topology::Single, ScriptRole::Clear),
    )
    .into())
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked(_))
    }

    pub fn topology(&self) -> Topology {
        match self {
            LockState::Unlocked(topology) | LockState::Locked(topology) => {
                *topology
            }
        }
    }
}
