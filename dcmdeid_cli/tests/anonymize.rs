mod utils;

use predicates::prelude::*;
use utils::{
  JOHN_DOE, create_study, create_temp_dir, dcmdeid_cli, get_stderr,
  get_stdout, read_json_string,
};

const OVERRIDES: &str = "PatientID,Update_PatientName,Update_PatientID,\
  Update_InstitutionName,Update_PatientBirthDate,Update_AccessionNumber\n\
  MRN-001,Anon^001,SUBJ-001,Site A,19700101,123\n";

#[test]
fn anonymize_with_defaults() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  let assert = dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .assert()
    .success();

  let stdout = get_stdout(assert);
  assert_eq!(stdout.lines().count(), 3);
  assert!(stdout.lines().all(|line| line.starts_with("Anonymizing \"")));

  let output_root = temp_dir.path().join("study-Anonymized");
  let john = output_root.join("series1/1.json");

  assert!(output_root.join("series1/2.json").exists());
  assert!(output_root.join("jane.json").exists());
  assert!(!output_root.join("notes.txt").exists());

  assert_eq!(read_json_string(&john, "00100010"), None);
  assert_eq!(read_json_string(&john, "00100020"), None);
  assert_eq!(
    read_json_string(&john, "00100030"),
    Some("19700101".to_string())
  );
  assert_eq!(read_json_string(&john, "00080050"), Some("123".to_string()));

  // Private data elements are removed
  assert_eq!(read_json_string(&john, "00091001"), None);

  // The input is untouched
  assert_eq!(
    read_json_string(&root.join("series1/1.json"), "00100020"),
    Some("MRN-001".to_string())
  );
}

#[test]
fn anonymize_with_overrides() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  let overrides = temp_dir.path().join("overrides.csv");
  std::fs::write(&overrides, OVERRIDES).unwrap();

  let assert = dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .arg("--overrides")
    .arg(&overrides)
    .arg("--quiet")
    .assert()
    .success()
    .stdout("");

  // Jane isn't in the overrides
  let stderr = get_stderr(assert);
  assert!(stderr.contains("\"MRN-002\" was not found in the overrides"));
  assert!(stderr.contains("Unmatched identifiers"));

  let output_root = temp_dir.path().join("study-Anonymized");

  for name in ["series1/1.json", "series1/2.json"] {
    let path = output_root.join(name);

    assert_eq!(
      read_json_string(&path, "00100010"),
      Some("Anon^001".to_string())
    );
    assert_eq!(
      read_json_string(&path, "00100020"),
      Some("SUBJ-001".to_string())
    );
    assert_eq!(
      read_json_string(&path, "00080080"),
      Some("Site A".to_string())
    );
  }

  let jane = output_root.join("jane.json");
  assert_eq!(read_json_string(&jane, "00100020"), None);
  assert_eq!(read_json_string(&jane, "00080050"), Some("789".to_string()));
}

#[test]
fn anonymize_with_incomplete_overrides() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  let overrides = temp_dir.path().join("overrides.csv");
  std::fs::write(
    &overrides,
    "PatientID,Update_PatientName,Update_PatientID,Update_InstitutionName,\
     Update_PatientBirthDate,Update_AccessionNumber\n\
     MRN-001,Anon^001,,Site A,19700101,123\n",
  )
  .unwrap();

  let assert = dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .arg("--overrides")
    .arg(&overrides)
    .arg("--quiet")
    .assert()
    .success();

  assert!(get_stderr(assert).contains("Ignoring override row"));

  let john = temp_dir.path().join("study-Anonymized/series1/1.json");
  assert_eq!(read_json_string(&john, "00100010"), None);
}

#[test]
fn anonymize_with_invalid_overrides() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  let overrides = temp_dir.path().join("overrides.csv");
  std::fs::write(&overrides, "MRN,Update_PatientName\nMRN-001,Anon\n")
    .unwrap();

  dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .arg("--overrides")
    .arg(&overrides)
    .assert()
    .failure()
    .stderr(predicate::str::contains("PatientID"));

  assert!(!temp_dir.path().join("study-Anonymized").exists());
}

#[test]
fn anonymize_refuses_existing_output() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  std::fs::create_dir(temp_dir.path().join("study-Anonymized")).unwrap();

  dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));

  dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .arg("--overwrite")
    .arg("--quiet")
    .assert()
    .success();

  assert!(
    temp_dir
      .path()
      .join("study-Anonymized/jane.json")
      .exists()
  );
}

#[test]
fn anonymize_with_unreadable_record() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  std::fs::write(root.join("broken.json"), "{ not json").unwrap();

  let assert = dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .arg("--quiet")
    .assert()
    .failure();

  let stderr = get_stderr(assert);
  assert!(stderr.contains("broken.json"));
  assert!(stderr.contains("Files failed"));

  // The other records are still written
  assert!(
    temp_dir
      .path()
      .join("study-Anonymized/jane.json")
      .exists()
  );
}

#[test]
fn anonymize_warns_on_ambiguous_join_values() {
  let temp_dir = create_temp_dir();
  let root = create_study(temp_dir.path());

  // A second study for John Doe has the same patient ID
  std::fs::write(
    root.join("series1/3.json"),
    JOHN_DOE.replace("ABC123", "ABC456"),
  )
  .unwrap();

  let overrides = temp_dir.path().join("overrides.csv");
  std::fs::write(&overrides, OVERRIDES).unwrap();

  let assert = dcmdeid_cli()
    .arg("anonymize")
    .arg(&root)
    .arg("--overrides")
    .arg(&overrides)
    .arg("--quiet")
    .assert()
    .success();

  assert!(get_stderr(assert).contains(
    "PatientID \"MRN-001\" is on more than one template or override row"
  ));
}
