use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("churn-predictor").unwrap();
    cmd.env("MODEL_STORE_PATH", store.path());
    cmd
}

#[test]
fn train_registers_first_version() {
    let store = TempDir::new().expect("temp store");

    cmd(&store)
        .arg("train")
        .assert()
        .success()
        .stdout(contains("Training pipeline complete"));

    let manifest = store.path().join("models/customer_churn/1/manifest.json");
    let artifact = store.path().join("models/customer_churn/1/model.json");
    assert!(manifest.exists());
    assert!(artifact.exists());
}

#[test]
fn train_then_promote_marks_production() {
    let store = TempDir::new().expect("temp store");

    cmd(&store).arg("train").assert().success();

    cmd(&store)
        .arg("promote")
        .assert()
        .success()
        .stdout(contains("Promoted model to production"));

    let alias = store.path().join("models/customer_churn/production");
    let promoted = std::fs::read_to_string(alias).expect("production alias");
    assert_eq!(promoted.trim(), "1");
}

#[test]
fn promote_without_versions_fails() {
    let store = TempDir::new().expect("temp store");

    cmd(&store)
        .args(["promote", "--name", "missing_model"])
        .assert()
        .failure()
        .stderr(contains("No versions registered"));
}

#[test]
fn models_lists_registered_versions() {
    let store = TempDir::new().expect("temp store");

    cmd(&store).arg("train").assert().success();
    cmd(&store).arg("train").assert().success();

    cmd(&store)
        .arg("models")
        .assert()
        .success()
        .stdout(contains("customer_churn"));
}

#[test]
fn every_cli_command_has_help_path() {
    let store = TempDir::new().expect("temp store");

    for args in [
        vec!["--help"],
        vec!["train", "--help"],
        vec!["schedule", "--help"],
        vec!["serve", "--help"],
        vec!["promote", "--help"],
        vec!["models", "--help"],
    ] {
        cmd(&store).args(&args).assert().success();
    }
}
