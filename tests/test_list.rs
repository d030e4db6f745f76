mod fixtures;

use anyhow::Result;
use fixtures::*;
use rstest::*;
use serde_json::Value;

#[rstest]
fn test_list(mut admin: AdminManager) -> Result<()> {
    let base = admin.make_basedir("base", true);
    admin.make_single_sandbox("msb_5_7_21", "5.7.21", &base);
    admin.make_single_sandbox("msb_8_0_12", "8.0.12", &base);
    std::fs::create_dir_all(admin.sandbox_home.join("not_a_sandbox"))?;

    let output = admin.run(&["list"])?;
    assert!(output.status.success());
    assert!(admin.last_stdout.contains("msb_5_7_21"));
    assert!(admin.last_stdout.contains("5.7.21"));
    assert!(admin.last_stdout.contains("msb_8_0_12"));
    assert!(!admin.last_stdout.contains("not_a_sandbox"));

    let output = admin.run(&["list", "5_7"])?;
    assert!(output.status.success());
    assert!(admin.last_stdout.contains("msb_5_7_21"));
    assert!(!admin.last_stdout.contains("msb_8_0_12"));

    Ok(())
}

#[rstest]
fn test_list_shows_lock_status(mut admin: AdminManager) -> Result<()> {
    let base = admin.make_basedir("base", true);
    admin.make_single_sandbox("msb_5_7_21", "5.7.21", &base);
    admin.make_single_sandbox("msb_8_0_12", "8.0.12", &base);

    admin.run(&["lock", "msb_5_7_21"])?;

    let output = admin.run(&["list"])?;
    assert!(output.status.success());
    let locked_line = admin
        .last_stdout
        .lines()
        .find(|line| line.contains("msb_5_7_21"))
        .expect("locked sandbox not listed")
        .to_string();
    assert!(locked_line.contains("locked"));
    let unlocked_line = admin
        .last_stdout
        .lines()
        .find(|line| line.contains("msb_8_0_12"))
        .expect("unlocked sandbox not listed")
        .to_string();
    assert!(!unlocked_line.contains("locked"));

    Ok(())
}

#[rstest]
fn test_list_json(mut admin: AdminManager) -> Result<()> {
    let base = admin.make_basedir("base", true);
    admin.make_single_sandbox("msb_5_7_21", "5.7.21", &base);
    admin.run(&["lock", "msb_5_7_21"])?;

    let output = admin.run(&["--json", "list"])?;
    assert!(output.status.success());

    let json: Value = serde_json::from_str(&admin.last_stdout)?;
    assert_eq!(json["status"], "success");
    let sandboxes = json["sandboxes"].as_array().expect("sandboxes array");
    assert_eq!(sandboxes.len(), 1);
    assert_eq!(sandboxes[0]["name"], "msb_5_7_21");
    assert_eq!(sandboxes[0]["version"], "5.7.21");
    assert_eq!(sandboxes[0]["type"], "single");
    assert_eq!(sandboxes[0]["locked"], true);

    Ok(())
}

#[rstest]
fn test_list_empty_home(mut admin: AdminManager) -> Result<()> {
    let output = admin.run(&["list"])?;
    assert!(output.status.success());
    assert!(admin.last_stdout.contains("No sandboxes found"));

    Ok(())
}
