#![allow(clippy::option_map_unit_fn)]
use crate::config::Config;
use crate::outln;
use crate::util::set_json_output;
use anyhow::Result;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

pub fn config(config: &Config, keys: Option<Vec<String>>) -> Result<()> {
    let keys = keys.unwrap_or_else(|| {
        ["log_level", "sandbox_home"].map(String::from).to_vec()
    });
    let multi_line = keys.len() > 1;

    for key in keys {
        let (key, value) = match key.as_str() {
            "sandbox_home" | "sandbox-home" => (
                "sandbox_home",
                config
                    .sandbox_home
                    .to_str()
                    .unwrap_or("<error>")
                    .to_string(),
            ),
            "log_level" => {
                ("log_level", config.log_level.as_str().to_string())
            }
            _ => {
                return Err(anyhow::anyhow!("Unknown key: {}", key));
            }
        };
        print_config_line(key, &value, multi_line, &config.sources);
    }

    Ok(())
}

fn print_config_line(
    key: &str,
    value: &str,
    multi_line: bool,
    sources: &HashMap<String, String>,
) {
    sources.get(key).map(|s| {
        debug!("{}={} set from {}", key, value, s);
    });
    set_json_output(key, &Value::String(value.to_string()));

    if multi_line {
        outln!("{}={}", key, value);
    } else {
        outln!("{}", value);
    }
}
