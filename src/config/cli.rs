use crate::sandbox::DESCRIPTOR_FILE;
use clap::Parser;
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Administers deployed database test sandboxes", long_about = None)]
pub struct Args {
    /// Set the log level to one of trace, debug, info, warn, or error.
    /// `-v` is shorthand for enabling verbose (trace) logging.
    #[arg(short = 'v',
        long,
        global = true,
        default_missing_value = "trace",
        num_args = 0..=1,
        require_equals = true,
        value_parser = parse_log_level
    )]
    pub log_level: Option<log::LevelFilter>,

    /// Directory where the deployed sandboxes live. Defaults to `~/sandboxes`
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub sandbox_home: Option<String>,

    /// Formats action output as a JSON blob.
    #[arg(long, global = true, action = clap::ArgAction::SetTrue)]
    pub json: bool,

    /// Do not load config files.
    #[arg(long, global = true, action = clap::ArgAction::SetTrue)]
    pub no_config: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand, Clone, Debug)]
#[command(subcommand_help_heading = "Actions")]
pub enum Action {
    /// Lock sandboxes, preventing deletion through this tool.
    /// Deletion outside this tool is of course still possible.
    Lock {
        /// Sandbox names, glob patterns, or ALL
        #[arg(value_name = "SANDBOXES", num_args = 1..,
            add = ArgValueCompleter::new(sandbox_name_completion))]
        patterns: Vec<String>,
    },

    /// Unlock sandboxes, allowing deletion again
    Unlock {
        /// Sandbox names, glob patterns, or ALL
        #[arg(value_name = "SANDBOXES", num_args = 1..,
            add = ArgValueCompleter::new(sandbox_name_completion))]
        patterns: Vec<String>,
    },

    /// Upgrade a sandbox to a newer-version sandbox that is already
    /// deployed. The data directory of the old sandbox is moved into the
    /// new one and the engine's upgrade procedure is run there.
    Upgrade {
        /// The sandbox to upgrade from
        #[arg(value_name = "OLD_SANDBOX",
            add = ArgValueCompleter::new(sandbox_name_completion))]
        old: String,

        /// The newer-version sandbox to upgrade into
        #[arg(value_name = "NEW_SANDBOX",
            add = ArgValueCompleter::new(sandbox_name_completion))]
        new: String,
    },

    /// List deployed sandboxes with version, type, and lock status
    List {
        /// Patterns of sandboxes to list
        #[arg(value_name = "PATTERNS", num_args = 0..)]
        patterns: Option<Vec<String>>,
    },

    /// Delete sandboxes and all associated files. Locked sandboxes are
    /// skipped.
    Delete {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Sandbox names, glob patterns, or ALL
        #[arg(value_name = "SANDBOXES", num_args = 1..,
            add = ArgValueCompleter::new(sandbox_name_completion))]
        patterns: Vec<String>,
    },

    /// Get current configuration options
    Config {
        /// The keys to get from the configuration
        #[arg(value_name = "KEYS", num_args = 0..)]
        keys: Option<Vec<String>>,
    },
}

/* Runs inside the completion subprocess, so it cannot go through the full
 * config resolution; the environment and the default home are enough. */
pub fn sandbox_name_completion(
    current: &std::ffi::OsStr,
) -> Vec<CompletionCandidate> {
    let mut completions = vec![];
    let Some(current) = current.to_str() else {
        return completions;
    };

    let sandbox_home = match std::env::var("DBSANDBOX_HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home),
        _ => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join("sandboxes"),
            Err(_) => return completions,
        },
    };

    let entries = match std::fs::read_dir(sandbox_home) {
        Ok(entries) => entries,
        Err(_) => return completions,
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        let file_name = entry.file_name();
        let file_name = match file_name.to_str() {
            Some(file_name) => file_name,
            None => continue,
        };

        if !file_name.starts_with(current) {
            continue;
        }

        let path = entry.path();
        if path.is_dir() && path.join(DESCRIPTOR_FILE).is_file() {
            completions.push(CompletionCandidate::new(file_name));
        }
    }

    completions
}

fn parse_log_level(s: &str) -> Result<log::LevelFilter, String> {
    s.parse::<log::LevelFilter>().map_err(|e| e.to_string())
}
