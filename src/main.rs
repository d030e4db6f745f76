#![allow(
    clippy::collapsible_else_if,
    clippy::collapsible_if,
    clippy::module_inception,
    clippy::useless_format
)]
#![deny(
    clippy::get_unwrap,
    clippy::panic,
    clippy::print_stdout,
    clippy::unwrap_used,
    clippy::use_debug,
    clippy::used_underscore_binding,
    clippy::used_underscore_items
)]

mod actions;
mod config;
mod logger;
mod sandbox;
mod templates;
mod types;
mod util;

use anyhow::{Context, Result, anyhow};
use clap::CommandFactory;
use clap::Parser;
use clap_complete::CompleteEnv;
use config::{cli, resolve_config};

use log::Log;
use serde_json::Value;
use util::{print_json_output, set_json_output, set_should_print_output};

pub fn main() -> Result<()> {
    // Tab completion has to run before argument parsing: the partial
    // command line being completed would not parse.
    if std::env::var("COMPLETE").is_ok() {
        CompleteEnv::with_factory(cli::Args::command).complete();
        return Ok(());
    }

    let logger = logger::AdminLogger::new(log::LevelFilter::Trace)
        .init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;
    let cli: cli::Args = cli::Args::parse();

    if let Some(log_level) = cli.log_level {
        logger.set_level(log_level);
    } else {
        logger.set_level(log::LevelFilter::Info);
    };

    let config = resolve_config(cli.clone()).context("Resolving config")?;

    // Now that we've loaded the config, we can set the log level and print
    // out any deferred messages emitted while we were loading the config.
    logger.set_level(config.log_level);
    logger.print_deferred();

    set_should_print_output(!cli.json);

    let result = match cli.action {
        cli::Action::Lock { patterns } => actions::lock(&config, &patterns),
        cli::Action::Unlock { patterns } => {
            actions::unlock(&config, &patterns)
        }
        cli::Action::Upgrade { old, new } => {
            actions::upgrade(&config, &old, &new)
        }
        cli::Action::List { patterns } => {
            actions::list(&config, &patterns.unwrap_or_default())
        }
        cli::Action::Delete { yes, patterns } => {
            actions::delete(&config, &patterns, yes)
        }
        cli::Action::Config { keys } => actions::config(&config, keys),
    };

    if cli.json {
        if result.is_ok() {
            set_json_output("status", &Value::String("success".to_string()));
        } else {
            set_json_output("status", &Value::String("error".to_string()));
            set_json_output(
                "error",
                &Value::String(
                    result
                        .as_ref()
                        .expect_err("Failed to get error")
                        .to_string(),
                ),
            );
        }
        print_json_output()?;
        if result.is_err() {
            std::process::exit(1);
        }
    }

    logger.flush();
    result
}
