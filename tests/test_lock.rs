mod fixtures;

use anyhow::Result;
use fixtures::*;
use rstest::*;

#[rstest]
fn test_lock_unlock_round_trip(mut admin: AdminManager) -> Result<()> {
    let basedir = admin.make_basedir("base-5.7.21", true);
    let dir = admin.make_single_sandbox("msb_5_7_21", "5.7.21", &basedir);

    let original = std::fs::read(dir.join("clear"))?;

    let output = admin.run(&["lock", "msb_5_7_21"])?;
    assert!(output.status.success());
    assert!(admin.last_stdout.contains("Sandbox msb_5_7_21 locked"));
    assert!(dir.join("no_clear").exists());
    assert_eq!(std::fs::read(dir.join("no_clear"))?, original);

    // placeholder explains how to reverse the lock
    let placeholder = std::fs::read_to_string(dir.join("clear"))?;
    assert!(placeholder.contains("dbsandbox unlock msb_5_7_21"));
    assert!(placeholder.contains("'no_clear'"));

    let output = admin.run(&["unlock", "msb_5_7_21"])?;
    assert!(output.status.success());
    assert!(admin.last_stdout.contains("Sandbox msb_5_7_21 unlocked"));
    assert_eq!(std::fs::read(dir.join("clear"))?, original);
    assert!(!dir.join("no_clear").exists());

    Ok(())
}

#[rstest]
fn test_lock_idempotent(mut admin: AdminManager) -> Result<()> {
    let basedir = admin.make_basedir("base-5.7.21", true);
    let dir = admin.make_single_sandbox("msb_5_7_21", "5.7.21", &basedir);

    admin.run(&["lock", "msb_5_7_21"])?;
    let placeholder = std::fs::read(dir.join("clear"))?;
    let preserved = std::fs::read(dir.join("no_clear"))?;

    let output = admin.run(&["lock", "msb_5_7_21"])?;
    assert!(output.status.success());
    assert!(
        admin
            .last_stdout
            .contains("Sandbox msb_5_7_21 is already locked")
    );
    // nothing on disk changed
    assert_eq!(std::fs::read(dir.join("clear"))?, placeholder);
    assert_eq!(std::fs::read(dir.join("no_clear"))?, preserved);

    Ok(())
}

#[rstest]
fn test_unlock_not_locked(mut admin: AdminManager) -> Result<()> {
    let basedir = admin.make_basedir("base-5.7.21", true);
    admin.make_single_sandbox("msb_5_7_21", "5.7.21", &basedir);

    let output = admin.run(&["unlock", "msb_5_7_21"])?;
    assert!(output.status.success());
    assert!(
        admin
            .last_stdout
            .contains("Sandbox msb_5_7_21 is not locked")
    );

    Ok(())
}

#[rstest]
fn test_lock_all(mut admin: AdminManager) -> Result<()> {
    let basedir = admin.make_basedir("base", true);
    admin.make_single_sandbox("msb_5_7_21", "5.7.21", &basedir);
    admin.make_single_sandbox("msb_8_0_12", "8.0.12", &basedir);
    // a directory without a descriptor is not a sandbox and is left alone
    std::fs::create_dir_all(admin.sandbox_home.join("scratch"))?;

    let output = admin.run(&["lock", "ALL"])?;
    assert!(output.status.success());
    assert!(admin.sandbox_home.join("msb_5_7_21/no_clear").exists());
    assert!(admin.sandbox_home.join("msb_8_0_12/no_clear").exists());
    assert!(!admin.sandbox_home.join("scratch/no_clear").exists());

    Ok(())
}

#[rstest]
fn test_lock_pattern(mut admin: AdminManager) -> Result<()> {
    let basedir = admin.make_basedir("base", true);
    admin.make_single_sandbox("msb_5_7_21", "5.7.21", &basedir);
    admin.make_single_sandbox("msb_8_0_12", "8.0.12", &basedir);

    let output = admin.run(&["lock", "msb_5*"])?;
    assert!(output.status.success());
    assert!(admin.sandbox_home.join("msb_5_7_21/no_clear").exists());
    assert!(!admin.sandbox_home.join("msb_8_0_12/no_clear").exists());

    let output = admin.run(&["unlock", "ALL"])?;
    assert!(output.status.success());
    assert!(!admin.sandbox_home.join("msb_5_7_21/no_clear").exists());
    assert!(
        admin
            .last_stdout
            .contains("Sandbox msb_8_0_12 is not locked")
    );

    Ok(())
}

#[rstest]
fn test_lock_missing_sandbox(mut admin: AdminManager) -> Result<()> {
    let output = admin.run(&["lock", "does_not_exist"])?;
    assert!(!output.status.success());
    assert!(admin.last_stderr.contains("not found"));

    Ok(())
}

#[rstest]
fn test_locked_sandbox_survives_delete(mut admin: AdminManager) -> Result<()> {
    let basedir = admin.make_basedir("base", true);
    let dir = admin.make_single_sandbox("msb_5_7_21", "5.7.21", &basedir);

    admin.run(&["lock", "msb_5_7_21"])?;
    let output = admin.run(&["delete", "-y", "msb_5_7_21"])?;
    assert!(output.status.success());
    assert!(admin.last_stdout.contains("locked"));
    assert!(dir.is_dir());

    admin.run(&["unlock", "msb_5_7_21"])?;
    let output = admin.run(&["delete", "-y", "msb_5_7_21"])?;
    assert!(output.status.success());
    assert!(!dir.exists());

    Ok(())
}
