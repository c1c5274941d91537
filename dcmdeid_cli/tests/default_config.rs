mod utils;

use predicates::prelude::*;
use utils::{create_temp_dir, dcmdeid_cli, get_stdout};

#[test]
fn default_config_to_stdout() {
  let assert = dcmdeid_cli().arg("default-config").assert().success();

  let config: serde_json::Value =
    serde_json::from_str(&get_stdout(assert)).unwrap();

  assert_eq!(config["extension"], "json");
  assert_eq!(config["join_column"], "PatientID");
  assert_eq!(config["remove_private_tags"], true);
  assert_eq!(config["key_fields"][0], "PatientName");
}

#[test]
fn default_config_round_trip() {
  let temp_dir = create_temp_dir();
  let config = temp_dir.path().join("config.json");

  dcmdeid_cli()
    .arg("default-config")
    .arg("--output-filename")
    .arg(&config)
    .assert()
    .success()
    .stdout("");

  dcmdeid_cli()
    .arg("default-config")
    .arg("-o")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));

  // The written config is accepted by the other commands
  let root = temp_dir.path().join("empty");
  std::fs::create_dir(&root).unwrap();

  let assert = dcmdeid_cli()
    .arg("template")
    .arg(&root)
    .arg("--config")
    .arg(&config)
    .assert()
    .success();

  assert_eq!(get_stdout(assert).lines().count(), 1);
}
