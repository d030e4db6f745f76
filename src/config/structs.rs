use super::impls::deserialize_level_filter;
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};

/// What a single config file may set. Files, environment, and CLI flags are
/// merged in that order into the final `Config`.
#[derive(Deserialize, Default, Clone)]
pub struct PartialConfig {
    #[serde(deserialize_with = "deserialize_level_filter", default)]
    pub log_level: Option<log::LevelFilter>,
    pub sandbox_home: Option<String>,
}

#[derive(Clone)]
pub struct Config {
    pub log_level: log::LevelFilter,
    /// Directory holding every deployed sandbox.
    pub sandbox_home: PathBuf,
    /// Where each value came from (file path, "environment", "cli",
    /// "default").
    pub sources: HashMap<String, String>,
}
