use crate::sandbox::DESCRIPTOR_FILE;
use anyhow::{Context, Result};
use std::path::Path;

/// Names of the sandboxes deployed under the sandbox home: directories
/// carrying a descriptor file. Sorted for stable output.
pub fn installed_sandboxes(sandbox_home: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let entries = sandbox_home.read_dir().context(format!(
        "Reading sandbox home {}",
        sandbox_home.display()
    ))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() || !path.join(DESCRIPTOR_FILE).is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => continue,
        }
    }

    names.sort();
    Ok(names)
}
