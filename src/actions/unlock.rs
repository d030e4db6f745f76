use crate::actions::list::matching_sandboxes;
use crate::config::Config;
use crate::outln;
use crate::sandbox::{Sandbox, UnlockOutcome};
use crate::util::set_json_output;
use anyhow::Result;
use colored::Colorize;
use log::trace;
use serde_json::Value;

pub fn unlock(config: &Config, patterns: &[String]) -> Result<()> {
    trace!("Unlocking sandboxes matching {:?}", patterns);

    let targets = matching_sandboxes(&config.sandbox_home, patterns)?;
    if targets.is_empty() {
        outln!("Nothing to unlock in {}", config.sandbox_home.display());
        return Ok(());
    }

    let mut unlocked = Vec::new();
    for name in &targets {
        let sandbox = Sandbox::from_location(&config.sandbox_home, name);
        match sandbox.unlock()? {
            UnlockOutcome::NotLocked => {
                outln!("Sandbox {} is not locked", name);
            }
            UnlockOutcome::Unlocked => {
                outln!("Sandbox {} unlocked", name.green());
                unlocked.push(Value::String(name.clone()));
            }
        }
    }

    set_json_output("unlocked", &Value::Array(unlocked));

    Ok(())
}
