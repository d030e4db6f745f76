use crate::config::Config;
use crate::outln;
use crate::sandbox::{
    UPGRADE_BINARY, UpgradeOutcome, UpgradePipeline,
};
use crate::util::set_json_output;
use anyhow::Result;
use log::trace;
use serde_json::{Value, json};

pub fn upgrade(config: &Config, old_name: &str, new_name: &str) -> Result<()> {
    trace!("Upgrading sandbox {} into {}", old_name, new_name);

    let pipeline =
        UpgradePipeline::new(&config.sandbox_home, old_name, new_name);

    match pipeline.run()? {
        UpgradeOutcome::Unsupported { basedir } => {
            // deliberate soft stop, not a failure
            outln!(
                "{} not found in {}. Upgrade is not possible",
                UPGRADE_BINARY,
                basedir.display()
            );
            set_json_output("upgraded", &Value::Bool(false));
            set_json_output(
                "reason",
                &Value::String("upgrade not supported by target".to_string()),
            );
        }
        UpgradeOutcome::Completed(report) => {
            outln!(
                "Data directory {}/data moved to {}/data",
                report.old_name,
                report.new_name
            );
            outln!("");
            outln!(
                "The data directory from {}/data is preserved in {}",
                report.new_name,
                report.preserved_data.display()
            );
            outln!(
                "The data directory from {}/data is now used in {}",
                report.old_name,
                report.migrated_data.display()
            );
            outln!(
                "{} is not operational and can be deleted",
                report.old_name
            );
            set_json_output("upgraded", &Value::Bool(true));
            set_json_output(
                "report",
                &json!({
                    "old": report.old_name,
                    "new": report.new_name,
                    "old_version": report.old_version.to_string(),
                    "new_version": report.new_version.to_string(),
                    "preserved_data": report.preserved_data,
                    "migrated_data": report.migrated_data,
                }),
            );
        }
    }

    Ok(())
}
