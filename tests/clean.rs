use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn command() -> Command {
    Command::cargo_bin("vuesweep").expect("binary exists")
}

fn clean(temp: &assert_fs::TempDir) -> Command {
    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("clean");
    cmd
}

#[test]
fn clean_yes_permanently_removes_artifacts() {
    let temp = assert_fs::TempDir::new().unwrap();
    let project = temp.child("work/shop");
    project.child("package.json").write_str(r#"{"devDependencies": {"vite": "^5"}}"#).unwrap();
    project.child("node_modules/vite/index.js").write_binary(&[0u8; 2048]).unwrap();
    project.child("dist/app.js").write_binary(&[0u8; 1024]).unwrap();
    project.child("src/main.ts").write_str("createApp()").unwrap();

    clean(&temp)
        .args(["--all", "--permanent", "--yes", "--verbose"])
        .arg(temp.child("work").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan complete, found 1 project"))
        .stdout(predicate::str::contains("Cleanup plan: 2 director(ies)"))
        .stdout(predicate::str::contains("shop · node_modules"))
        .stdout(predicate::str::contains("Done: cleaned 2/2 directories"))
        .stdout(predicate::str::contains("Reclaimed 3 KiB"));

    project.child("node_modules").assert(predicate::path::missing());
    project.child("dist").assert(predicate::path::missing());
    project.child("src/main.ts").assert(predicate::path::exists());
    project.child("package.json").assert(predicate::path::exists());
}

#[test]
fn clean_respects_the_inactivity_threshold() {
    let temp = assert_fs::TempDir::new().unwrap();
    let project = temp.child("work/fresh");
    project.child("package.json").write_str(r#"{"dependencies": {"vue": "^3"}}"#).unwrap();
    project.child("node_modules/vue/index.js").write_str("vue").unwrap();

    clean(&temp)
        .args(["--permanent", "--yes"])
        .arg(temp.child("work").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects match the current filter."));

    project.child("node_modules").assert(predicate::path::exists());
}

#[test]
fn clean_reports_projects_without_artifacts() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("work/bare/package.json")
        .write_str(r#"{"dependencies": {"vue-router": "^4"}}"#)
        .unwrap();

    clean(&temp)
        .args(["--all", "--permanent", "--yes"])
        .arg(temp.child("work").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected: 0 B (1 project)"))
        .stdout(predicate::str::contains("no node_modules or dist to clean"));
}

#[test]
fn clean_honours_use_trash_false_from_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("config/vuesweep/config.toml").write_str("use_trash = false\n").unwrap();
    let project = temp.child("work/docs");
    project.child("package.json").write_str(r#"{"dependencies": {"vitepress": "^1"}}"#).unwrap();
    project.child("dist/index.html").write_str("<html></html>").unwrap();

    clean(&temp)
        .args(["--all", "--yes"])
        .arg(temp.child("work").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: cleaned 1/1 directories"));

    project.child("dist").assert(predicate::path::missing());
}
