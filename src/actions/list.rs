use crate::config::Config;
use crate::outln;
use crate::sandbox::{Sandbox, installed_sandboxes, resolve_lock_state};
use crate::util::set_json_output;
use anyhow::{Result, anyhow};
use colored::Colorize;
use fast_glob::glob_match;
use log::{trace, warn};
use serde_json::{Value, json};
use std::path::Path;

/// Expands the sandbox arguments of lock/unlock/delete: `ALL` means every
/// deployed sandbox, anything with glob metacharacters is matched against
/// the deployed names, and plain names pass through untouched (the operation
/// itself reports a missing directory).
pub fn matching_sandboxes(
    sandbox_home: &Path,
    patterns: &[String],
) -> Result<Vec<String>> {
    let installed = installed_sandboxes(sandbox_home)?;
    if patterns.is_empty()
        || patterns.iter().any(|p| p == "ALL" || p == "all")
    {
        return Ok(installed);
    }

    let mut names: Vec<String> = Vec::new();
    for pattern in patterns {
        if pattern.contains('/') {
            return Err(anyhow!("Invalid sandbox name: {}", pattern));
        }
        if pattern.contains(['*', '?', '[']) {
            for name in &installed {
                if glob_match(pattern, name) && !names.contains(name) {
                    names.push(name.clone());
                }
            }
        } else if !names.contains(pattern) {
            names.push(pattern.clone());
        }
    }
    Ok(names)
}

pub fn list(config: &Config, patterns: &[String]) -> Result<()> {
    trace!("Listing sandboxes in {}", config.sandbox_home.display());

    let mut rows = Vec::new();
    for name in installed_sandboxes(&config.sandbox_home)? {
        if !patterns.is_empty()
            && !patterns
                .iter()
                .any(|pattern| glob_match(&format!("*{pattern}*"), &name))
        {
            continue;
        }

        let sandbox = Sandbox::from_location(&config.sandbox_home, &name);
        let descriptor = match sandbox.descriptor() {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                continue;
            }
        };
        let locked = matches!(
            resolve_lock_state(&sandbox),
            Ok(state) if state.is_locked()
        );
        rows.push((name, descriptor, locked));
    }

    if rows.is_empty() {
        outln!(
            "No sandboxes found in {}",
            config.sandbox_home.display()
        );
    }

    let mut sandboxes = Vec::new();
    for (name, descriptor, locked) in rows {
        outln!(
            "{:<30} {:<10} {:<12} {}",
            name,
            descriptor.version,
            descriptor.sb_type,
            if locked { "locked".yellow() } else { "".normal() }
        );
        sandboxes.push(json!({
            "name": name,
            "version": descriptor.version,
            "type": descriptor.sb_type,
            "locked": locked,
        }));
    }

    set_json_output("sandboxes", &Value::Array(sandboxes));

    Ok(())
}
