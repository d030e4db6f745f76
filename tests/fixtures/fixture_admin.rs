use anyhow::Result;
use rand::Rng;
use rstest::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn rid() -> String {
    let mut rng = rand::rng();
    let rid: String = (0..10)
        .map(|_| rng.sample(rand::distr::Alphanumeric) as char)
        .collect();
    rid
}

/// Drives the dbsandbox binary against an isolated, throwaway sandbox home
/// populated with synthetic sandboxes whose control scripts are small shell
/// scripts that record their invocations.
pub struct AdminManager {
    pub sandbox_home: PathBuf,
    pub last_stdout: String,
    pub last_stderr: String,
    admin_bin: String,
}

#[fixture]
pub fn admin() -> AdminManager {
    AdminManager::new()
}

impl AdminManager {
    pub fn new() -> Self {
        let sandbox_home = std::env::temp_dir()
            .join(format!("dbsandbox-test-home-{}", rid()));
        std::fs::create_dir_all(&sandbox_home)
            .expect("Failed to create test sandbox home");

        Self {
            sandbox_home,
            last_stdout: String::new(),
            last_stderr: String::new(),
            admin_bin: env!("CARGO_BIN_EXE_dbsandbox").to_string(),
        }
    }

    pub fn run(&mut self, args: &[&str]) -> Result<Output> {
        let output = Command::new(&self.admin_bin)
            .arg(format!("--sandbox-home={}", self.sandbox_home.display()))
            .arg("--no-config")
            .args(args)
            .env_remove("DBSANDBOX_HOME")
            .env_remove("DBSANDBOX_LOG_LEVEL")
            .output()?;

        self.last_stdout = String::from_utf8_lossy(&output.stdout).to_string();
        self.last_stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Ok(output)
    }

    /// Creates a single-instance sandbox with the full control-script set.
    /// Every script appends a line to `invocations.log` in the sandbox
    /// directory; `stop` refuses to run once the data directory is gone, so
    /// an out-of-order stop shows up as a pipeline failure.
    pub fn make_single_sandbox(
        &self,
        name: &str,
        version: &str,
        basedir: &Path,
    ) -> PathBuf {
        let dir = self.sandbox_home.join(name);
        std::fs::create_dir_all(dir.join("data"))
            .expect("Failed to create sandbox dir");

        write_script(
            &dir.join("clear"),
            "#!/bin/sh\n\
             dir=\"$(dirname \"$0\")\"\n\
             echo clear >> \"$dir/invocations.log\"\n\
             exit 0\n",
        );
        write_script(
            &dir.join("start"),
            "#!/bin/sh\n\
             dir=\"$(dirname \"$0\")\"\n\
             echo start >> \"$dir/invocations.log\"\n\
             exit 0\n",
        );
        write_script(
            &dir.join("stop"),
            "#!/bin/sh\n\
             dir=\"$(dirname \"$0\")\"\n\
             [ -d \"$dir/data\" ] || exit 1\n\
             echo stop >> \"$dir/invocations.log\"\n\
             exit 0\n",
        );
        write_script(
            &dir.join("my"),
            "#!/bin/sh\n\
             dir=\"$(dirname \"$0\")\"\n\
             echo \"my $@\" >> \"$dir/invocations.log\"\n\
             exit 0\n",
        );

        std::fs::write(
            dir.join("sbdescription.json"),
            format!(
                "{{\"basedir\": \"{}\", \"type\": \"single\", \
                 \"version\": \"{}\"}}\n",
                basedir.display(),
                version
            ),
        )
        .expect("Failed to write sandbox descriptor");

        dir
    }

    /// A fake base installation; with the upgrade binary present the target
    /// passes the capability check.
    pub fn make_basedir(&self, name: &str, with_upgrade_binary: bool) -> PathBuf {
        let basedir = self.sandbox_home.join(name);
        std::fs::create_dir_all(basedir.join("bin"))
            .expect("Failed to create basedir");
        if with_upgrade_binary {
            write_script(
                &basedir.join("bin").join("mysql_upgrade"),
                "#!/bin/sh\nexit 0\n",
            );
        }
        basedir
    }

    #[allow(dead_code)]
    pub fn invocations(&self, sandbox_name: &str) -> String {
        std::fs::read_to_string(
            self.sandbox_home.join(sandbox_name).join("invocations.log"),
        )
        .unwrap_or_default()
    }
}

impl Drop for AdminManager {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.sandbox_home);
    }
}

pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o744))
        .expect("Failed to chmod script");
}
