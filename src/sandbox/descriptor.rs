use crate::sandbox::Sandbox;
use crate::types::VersionTriple;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Metadata written by the deploy tool into each sandbox. Consumed read-only;
/// one snapshot is loaded at the start of an operation and discarded at the
/// end.
#[derive(Deserialize, Debug, Clone)]
pub struct SandboxDescriptor {
    /// Base installation the sandbox runs from (holds `bin/mysqld` etc).
    pub basedir: PathBuf,
    pub version: String,
    /// Deployment type as recorded by the deploy tool ("single",
    /// "replication", "multiple", ...).
    #[serde(rename = "type")]
    pub sb_type: String,
    #[serde(default)]
    pub port: Vec<u16>,
}

impl SandboxDescriptor {
    pub fn version_triple(&self) -> Result<VersionTriple> {
        VersionTriple::parse(&self.version).context(format!(
            "Parsing version from descriptor ({})",
            self.version
        ))
    }
}

impl Sandbox {
    pub fn descriptor(&self) -> Result<SandboxDescriptor> {
        let path = self.descriptor_path();
        let text = std::fs::read_to_string(&path).context(format!(
            "Reading sandbox descriptor {}",
            path.display()
        ))?;
        serde_json::from_str(&text).context(format!(
            "Parsing sandbox descriptor {}",
            path.display()
        ))
    }
}
