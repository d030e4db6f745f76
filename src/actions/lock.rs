use crate::actions::list::matching_sandboxes;
use crate::config::Config;
use crate::outln;
use crate::sandbox::{LockOutcome, Sandbox};
use crate::templates::TemplateSet;
use crate::util::set_json_output;
use anyhow::Result;
use colored::Colorize;
use log::trace;
use serde_json::Value;

pub fn lock(config: &Config, patterns: &[String]) -> Result<()> {
    trace!("Locking sandboxes matching {:?}", patterns);

    let targets = matching_sandboxes(&config.sandbox_home, patterns)?;
    if targets.is_empty() {
        outln!("Nothing to lock in {}", config.sandbox_home.display());
        return Ok(());
    }

    let templates = TemplateSet::standard();
    let mut locked = Vec::new();
    for name in &targets {
        let sandbox = Sandbox::from_location(&config.sandbox_home, name);
        match sandbox.lock(&templates)? {
            LockOutcome::AlreadyLocked => {
                outln!("Sandbox {} is already locked", name);
            }
            LockOutcome::Locked => {
                outln!("Sandbox {} locked", name.green());
                locked.push(Value::String(name.clone()));
            }
        }
    }

    set_json_output("locked", &Value::Array(locked));

    Ok(())
}
