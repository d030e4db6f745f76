use super::cli::Args;
use super::{Config, PartialConfig};
use anyhow::{Context, Result};
use log::trace;
use std::collections::HashMap;
use std::path::PathBuf;
use std::{env, str::FromStr};

pub fn resolve_config(cli: Args) -> Result<Config> {
    let (mut partial_config, mut sources) = load_partial(cli.no_config)?;

    // Override with environment variables if set
    if let Ok(log_level) = env::var("DBSANDBOX_LOG_LEVEL") {
        if let Ok(log_level) = log::LevelFilter::from_str(&log_level) {
            partial_config.log_level = Some(log_level);
            sources.insert("log_level".into(), "environment".into());
        } else {
            return Err(anyhow::anyhow!("Invalid log level: {}", log_level));
        }
    }
    if let Ok(sandbox_home) = env::var("DBSANDBOX_HOME") {
        if !sandbox_home.is_empty() {
            partial_config.sandbox_home = Some(sandbox_home);
            sources.insert("sandbox_home".into(), "environment".into());
        }
    }

    // Override with CLI args if provided (highest precedence)
    if let Some(log_level) = cli.log_level {
        partial_config.log_level = Some(log_level);
        sources.insert("log_level".into(), "cli".into());
    }
    if let Some(sandbox_home) = cli.sandbox_home {
        partial_config.sandbox_home = Some(sandbox_home);
        sources.insert("sandbox_home".into(), "cli".into());
    }

    let sandbox_home = resolve_sandbox_home(partial_config.sandbox_home)?;
    if !sources.contains_key("sandbox_home") {
        sources.insert("sandbox_home".into(), "default".into());
    }
    if !sources.contains_key("log_level") {
        sources.insert("log_level".into(), "default".into());
    }

    let config = Config {
        log_level: partial_config.log_level.unwrap_or(log::LevelFilter::Info),
        sandbox_home,
        sources,
    };

    trace!("Sandbox home: {:?}", config.sandbox_home);

    Ok(config)
}

/* The sandbox home does not have to exist yet; actions that read it report
 * the missing directory themselves. */
fn resolve_sandbox_home(sandbox_home: Option<String>) -> Result<PathBuf> {
    match sandbox_home {
        Some(sandbox_home) => expand_tilde(&sandbox_home),
        None => Ok(home_dir()?.join("sandboxes")),
    }
}

fn home_dir() -> Result<PathBuf> {
    env::var("HOME")
        .map(PathBuf::from)
        .context("HOME is not set")
}

fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return home_dir();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

pub fn load_partial(
    no_config: bool,
) -> Result<(PartialConfig, HashMap<String, String>)> {
    let config_paths = if no_config {
        vec![]
    } else {
        find_config_files()?
    };
    let mut sources = HashMap::new();
    if config_paths.is_empty() {
        trace!("No config files found, using default config");
        return Ok((PartialConfig::default(), sources));
    }

    let mut merged_config = PartialConfig::default();
    for path in config_paths.iter() {
        let config_str = std::fs::read_to_string(path).context(format!(
            "Failed to read config file {}",
            path.display()
        ))?;

        let config: PartialConfig = toml::from_str(&config_str).context(
            format!("Failed to parse config file {}", path.display()),
        )?;

        merge_configs(
            &mut merged_config,
            &mut sources,
            config,
            path.to_str()
                .context("Failed to convert config path to str")?,
        );
        trace!("Loaded config file: {}", path.display());
    }

    Ok((merged_config, sources))
}

/** Returns a vec of all config files found, lowest precedence first */
fn find_config_files() -> Result<Vec<PathBuf>> {
    let home = home_dir()?;
    let mut paths_to_check = Vec::new();

    // Any project specific files
    let mut current_dir = std::env::current_dir()?;
    loop {
        paths_to_check.push(current_dir.join(".dbsandbox.toml"));
        if current_dir == home || !current_dir.pop() {
            break;
        }
    }

    // ~/.config/dbsandbox/config.toml
    paths_to_check.push(home.join(".config/dbsandbox/config.toml"));

    // /etc/dbsandbox.toml
    paths_to_check.push(PathBuf::from("/etc/dbsandbox.toml"));

    // Finally reverse them so we can process them in order nicely
    paths_to_check.reverse();

    Ok(paths_to_check
        .iter()
        .filter(|path| path.is_file())
        .cloned()
        .collect())
}

fn merge_configs(
    base: &mut PartialConfig,
    sources: &mut HashMap<String, String>,
    override_config: PartialConfig,
    source: &str,
) {
    if let Some(log_level) = override_config.log_level {
        base.log_level = Some(log_level);
        sources.insert("log_level".into(), source.into());
    }
    if let Some(sandbox_home) = override_config.sandbox_home {
        base.sandbox_home = Some(sandbox_home);
        sources.insert("sandbox_home".into(), source.into());
    }
}
