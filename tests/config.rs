use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

fn command() -> Command {
    Command::cargo_bin("vuesweep").expect("binary exists")
}

#[test]
fn config_add_exclude_prevents_scan_hits() {
    let temp = assert_fs::TempDir::new().unwrap();
    let home = temp.child("home");
    home.create_dir_all().unwrap();
    let config_root = temp.child("xdg-config");
    config_root.create_dir_all().unwrap();

    home.child("work/keep/package.json").write_str(r#"{"dependencies": {"vue": "^3"}}"#).unwrap();
    home.child("work/skipped/package.json")
        .write_str(r#"{"dependencies": {"vue": "^3"}}"#)
        .unwrap();

    command()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", config_root.path())
        .arg("config")
        .arg("--add-exclude")
        .arg("**/skipped")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added exclude pattern '**/skipped'."));

    let config_path = config_root.child("vuesweep/config.toml");
    let contents = fs::read_to_string(config_path.path()).unwrap();
    assert!(contents.contains("**/skipped"));

    command()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", config_root.path())
        .arg("scan")
        .arg("--all")
        .arg(home.child("work").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("~/work/keep"))
        .stdout(predicate::str::contains("skipped").not());
}

#[test]
fn config_rejects_an_invalid_pattern() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_root = temp.child("xdg-config");

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", config_root.path())
        .arg("config")
        .arg("--add-exclude")
        .arg("work/[unclosed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exclude pattern"));

    config_root.child("vuesweep/config.toml").assert(predicate::path::missing());
}

#[test]
fn config_without_flags_prints_current_values() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_root = temp.child("xdg-config");
    config_root.child("vuesweep/config.toml").write_str("threshold_days = 90\n").unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", config_root.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("vuesweep/config.toml"))
        .stdout(predicate::str::contains("threshold_days = 90"))
        .stdout(predicate::str::contains("use_trash = true"));
}

#[test]
fn threshold_from_config_applies_to_scan() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_root = temp.child("xdg-config");
    config_root.child("vuesweep/config.toml").write_str("threshold_days = 0\n").unwrap();
    temp.child("work/app/package.json").write_str(r#"{"dependencies": {"pinia": "^2"}}"#).unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", config_root.path())
        .arg("scan")
        .arg(temp.child("work").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("~/work/app"));
}

#[test]
fn malformed_config_is_reported() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_root = temp.child("xdg-config");
    config_root.child("vuesweep/config.toml").write_str("threshold_days = \"soon\"\n").unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", config_root.path())
        .arg("scan")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration"));
}
