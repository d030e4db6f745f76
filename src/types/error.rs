use std::path::PathBuf;
use thiserror::Error;

/// Fatal error kinds raised by the administrative operations. Informational
/// outcomes (already locked, upgrade unsupported) are ordinary return values
/// and never appear here.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("directory {0} not found")]
    NotFound(PathBuf),

    #[error("executable {0} not found")]
    ScriptNotFound(PathBuf),

    #[error("version {0:?} must contain at least three numeric components")]
    MalformedVersion(String),

    #[error("version {new} must be greater than {old}")]
    VersionIncompatible { old: String, new: String },

    #[error("upgrade from or to MariaDB (major version {0}) is not supported")]
    EngineMismatch(u32),

    #[error("command '{command}' failed: {status}")]
    ProcessFailure { command: String, status: String },

    #[error("failed to {action}: {source}")]
    FileSystem {
        action: String,
        source: std::io::Error,
    },
}
