use crate::sandbox::{
    DATA_DIR_NAME, DESCRIPTOR_FILE, ScriptRole, Topology, script_name,
};
use std::path::{Path, PathBuf};

/// One deployed sandbox under the sandbox home. A value of this type makes
/// no claim that the directory exists; operations validate what they need.
pub struct Sandbox {
    pub name: String,
    pub path: PathBuf,
}

impl Sandbox {
    pub fn from_location(sandbox_home: &Path, name: &str) -> Self {
        Sandbox {
            name: name.to_string(),
            path: sandbox_home.join(name),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    pub fn script(&self, topology: Topology, role: ScriptRole) -> PathBuf {
        self.path.join(script_name(topology, role))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join(DATA_DIR_NAME)
    }

    /// Preservation path for this sandbox's own pre-upgrade data.
    pub fn preserved_data_dir(&self) -> PathBuf {
        self.path.join(format!("{}-{}", DATA_DIR_NAME, self.name))
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.path.join(DESCRIPTOR_FILE)
    }
}
