use crate::actions::list::matching_sandboxes;
use crate::config::Config;
use crate::outln;
use crate::sandbox::{
    Sandbox, ScriptRole, Topology, resolve_lock_state,
};
use crate::types::AdminError;
use crate::util::{exec_exists, run_script, set_json_output};
use anyhow::Result;
use colored::Colorize;
use log::{trace, warn};
use serde_json::Value;
use std::io::{self, Write};

pub fn delete(config: &Config, patterns: &[String], force: bool) -> Result<()> {
    trace!("Preparing to delete sandboxes");

    let targets = matching_sandboxes(&config.sandbox_home, patterns)?;
    if targets.is_empty() {
        outln!("No sandboxes found matching the specified patterns.");
        return Ok(());
    }

    // Show sandboxes that will be deleted and ask for confirmation
    if !force {
        outln!("The following sandboxes will be deleted:");
        for name in &targets {
            outln!("  {}", name);
        }

        // Use eprint! for the prompt since print! is not allowed
        eprint!("\nAre you sure you want to delete these sandboxes? [y/N] ");
        let _ = io::stderr().flush();

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            outln!("Delete operation cancelled.");
            return Ok(());
        }
    }

    let mut deleted = Vec::new();
    let mut skipped = Vec::new();

    for name in &targets {
        let sandbox = Sandbox::from_location(&config.sandbox_home, name);
        if !sandbox.exists() {
            return Err(AdminError::NotFound(sandbox.path.clone()).into());
        }

        let lock_state = resolve_lock_state(&sandbox).ok();
        if lock_state.is_some_and(|state| state.is_locked()) {
            outln!(
                "Sandbox {} is locked, skipping (unlock it first)",
                name.yellow()
            );
            skipped.push(Value::String(name.clone()));
            continue;
        }

        // Stop the instance before removing its files. An instance that is
        // already down may report a failure here, which is not a reason to
        // keep the sandbox.
        let topology = lock_state
            .map(|state| state.topology())
            .unwrap_or(Topology::Single);
        let stop = sandbox.script(topology, ScriptRole::Stop);
        if exec_exists(&stop) {
            if let Err(e) = run_script(&stop, &[]) {
                warn!("Failed to stop sandbox {}: {}", name, e);
            }
        }

        std::fs::remove_dir_all(&sandbox.path).map_err(|e| {
            AdminError::FileSystem {
                action: format!("remove {}", sandbox.path.display()),
                source: e,
            }
        })?;
        outln!("Deleted sandbox: {}", name.green());
        deleted.push(Value::String(name.clone()));
    }

    outln!("{} sandboxes deleted", deleted.len());

    set_json_output("deleted", &Value::Array(deleted));
    set_json_output("skipped", &Value::Array(skipped));

    Ok(())
}
