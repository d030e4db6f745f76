use crate::sandbox::{
    NO_UPGRADE_MARKER, Sandbox, SandboxDescriptor, ScriptRole, Topology,
    UPGRADE_BINARY,
};
use crate::types::{AdminError, VersionTriple, check_upgrade_eligibility};
use crate::util::{exec_exists, run_script};
use anyhow::{Context, Result, anyhow};
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// What a completed upgrade did, for reporting.
#[derive(Debug)]
pub struct UpgradeReport {
    pub old_name: String,
    pub new_name: String,
    pub old_version: VersionTriple,
    pub new_version: VersionTriple,
    /// Where the new sandbox's own pre-upgrade data was preserved.
    pub preserved_data: PathBuf,
    /// Where the old sandbox's data now lives.
    pub migrated_data: PathBuf,
}

#[derive(Debug)]
pub enum UpgradeOutcome {
    Completed(UpgradeReport),
    /// Soft stop: the target installation cannot run the engine upgrade
    /// procedure. A marker was persisted in the target sandbox; not an error.
    Unsupported { basedir: PathBuf },
}

/// Migrates the old sandbox's data directory into the newer sibling and runs
/// the engine's internal upgrade procedure, as an ordered pipeline.
///
/// The first failing step halts the pipeline with an error naming the step.
/// Completed steps are never rolled back: a failure after the data moves
/// leaves the tree in the intermediate state, and the report of the failing
/// step is the operator's pointer for manual repair.
pub struct UpgradePipeline {
    old: Sandbox,
    new: Sandbox,
}

impl UpgradePipeline {
    pub fn new(sandbox_home: &Path, old_name: &str, new_name: &str) -> Self {
        UpgradePipeline {
            old: Sandbox::from_location(sandbox_home, old_name),
            new: Sandbox::from_location(sandbox_home, new_name),
        }
    }

    pub fn run(&self) -> Result<UpgradeOutcome> {
        self.validate().context("Upgrade step 'validate'")?;

        let (old_desc, new_desc) = self
            .load_descriptors()
            .context("Upgrade step 'load descriptors'")?;

        if let Some(basedir) = self
            .missing_upgrade_capability(&new_desc)
            .context("Upgrade step 'capability check'")?
        {
            return Ok(UpgradeOutcome::Unsupported { basedir });
        }

        let (old_version, new_version) = self
            .check_eligibility(&old_desc, &new_desc)
            .context("Upgrade step 'eligibility check'")?;

        self.check_collision().context("Upgrade step 'collision check'")?;
        self.stop_instances().context("Upgrade step 'stop instances'")?;
        self.relocate_data().context("Upgrade step 'relocate data'")?;
        self.start_target().context("Upgrade step 'start target'")?;
        self.run_engine_procedure()
            .context("Upgrade step 'engine upgrade procedure'")?;

        Ok(UpgradeOutcome::Completed(UpgradeReport {
            old_name: self.old.name.clone(),
            new_name: self.new.name.clone(),
            old_version,
            new_version,
            preserved_data: self.new.preserved_data_dir(),
            migrated_data: self.new.data_dir(),
        }))
    }

    /* Both directories must exist and carry the full single-instance script
     * set. Group sandboxes miss these names and are rejected here. */
    fn validate(&self) -> Result<()> {
        for sandbox in [&self.old, &self.new] {
            if !sandbox.exists() {
                return Err(
                    AdminError::NotFound(sandbox.path.clone()).into()
                );
            }
            for role in
                [ScriptRole::Start, ScriptRole::Stop, ScriptRole::Admin]
            {
                let script = sandbox.script(Topology::Single, role);
                if !exec_exists(&script) {
                    return Err(AdminError::ScriptNotFound(script))
                        .context(
                            "The upgrade only works between single-instance \
                             sandboxes",
                        );
                }
            }
        }
        Ok(())
    }

    fn load_descriptors(
        &self,
    ) -> Result<(SandboxDescriptor, SandboxDescriptor)> {
        let old_desc = self.old.descriptor()?;
        let new_desc = self.new.descriptor()?;
        debug!(
            "Upgrading {} ({}) into {} ({})",
            self.old.name, old_desc.version, self.new.name, new_desc.version
        );
        Ok((old_desc, new_desc))
    }

    /// Returns the target basedir when the engine upgrade procedure is not
    /// available there. First call persists the `no_upgrade` marker; a
    /// pre-existing marker short-circuits the probe on repeated attempts.
    fn missing_upgrade_capability(
        &self,
        new_desc: &SandboxDescriptor,
    ) -> Result<Option<PathBuf>> {
        let marker = self.new.path.join(NO_UPGRADE_MARKER);
        if marker.exists() {
            trace!("Marker {} already present", marker.display());
            return Ok(Some(new_desc.basedir.clone()));
        }

        let upgrade_binary = new_desc.basedir.join("bin").join(UPGRADE_BINARY);
        if exec_exists(&upgrade_binary) {
            return Ok(None);
        }

        std::fs::write(&marker, "").map_err(|e| AdminError::FileSystem {
            action: format!("write {}", marker.display()),
            source: e,
        })?;
        Ok(Some(new_desc.basedir.clone()))
    }

    fn check_eligibility(
        &self,
        old_desc: &SandboxDescriptor,
        new_desc: &SandboxDescriptor,
    ) -> Result<(VersionTriple, VersionTriple)> {
        let old_version = old_desc.version_triple()?;
        let new_version = new_desc.version_triple()?;
        check_upgrade_eligibility(&old_version, &new_version)?;
        Ok((old_version, new_version))
    }

    /* An upgrade is single-shot per target: a second one would clobber the
     * preserved data directory. */
    fn check_collision(&self) -> Result<()> {
        let preserved = self.new.preserved_data_dir();
        if preserved.is_dir() {
            return Err(anyhow!(
                "sandbox '{}' is already the upgrade from an older version",
                self.new.name
            ));
        }
        Ok(())
    }

    fn stop_instances(&self) -> Result<()> {
        for sandbox in [&self.old, &self.new] {
            run_script(&sandbox.script(Topology::Single, ScriptRole::Stop), &[])
                .context(format!("Stopping sandbox {}", sandbox.name))?;
        }
        Ok(())
    }

    fn relocate_data(&self) -> Result<()> {
        let new_data = self.new.data_dir();
        let preserved = self.new.preserved_data_dir();
        trace!(
            "Moving {} to {}",
            new_data.display(),
            preserved.display()
        );
        std::fs::rename(&new_data, &preserved).map_err(|e| {
            AdminError::FileSystem {
                action: format!(
                    "move {} to {}",
                    new_data.display(),
                    preserved.display()
                ),
                source: e,
            }
        })?;

        let old_data = self.old.data_dir();
        trace!(
            "Moving {} to {}",
            old_data.display(),
            new_data.display()
        );
        std::fs::rename(&old_data, &new_data).map_err(|e| {
            AdminError::FileSystem {
                action: format!(
                    "move {} to {}",
                    old_data.display(),
                    new_data.display()
                ),
                source: e,
            }
        })?;
        Ok(())
    }

    fn start_target(&self) -> Result<()> {
        run_script(&self.new.script(Topology::Single, ScriptRole::Start), &[])
            .context(format!("Starting sandbox {}", self.new.name))
    }

    fn run_engine_procedure(&self) -> Result<()> {
        run_script(
            &self.new.script(Topology::Single, ScriptRole::Admin),
            &["sql_upgrade"],
        )
        .context(format!(
            "Running {} in {}",
            UPGRADE_BINARY, self.new.name
        ))
    }
}
