use std::path::{Path, PathBuf};

use assert_cmd::{Command, assert::Assert, cargo::cargo_bin_cmd};
use tempfile::TempDir;

pub const JOHN_DOE: &str = r#"{
  "00080050": { "vr": "SH", "Value": ["ABC123"] },
  "00080080": { "vr": "LO", "Value": ["General Hospital"] },
  "00090010": { "vr": "LO", "Value": ["ACME"] },
  "00091001": { "vr": "LO", "Value": ["secret"] },
  "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^John" }] },
  "00100020": { "vr": "LO", "Value": ["MRN-001"] },
  "00100030": { "vr": "DA", "Value": ["19800315"] },
  "00100040": { "vr": "CS", "Value": ["M"] }
}"#;

pub const JANE_ROE: &str = r#"{
  "00080050": { "vr": "SH", "Value": ["XYZ789"] },
  "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Roe^Jane" }] },
  "00100020": { "vr": "LO", "Value": ["MRN-002"] },
  "00100040": { "vr": "CS", "Value": ["F"] }
}"#;

#[allow(dead_code)]
pub fn dcmdeid_cli() -> Command {
  cargo_bin_cmd!("dcmdeid_cli")
}

fn temp_dir() -> PathBuf {
  if let Ok(t) = std::env::var("RUNNER_TEMP") {
    PathBuf::from(t)
  } else {
    std::env::temp_dir()
  }
}

#[allow(dead_code)]
pub fn create_temp_dir() -> TempDir {
  TempDir::new_in(temp_dir()).unwrap()
}

/// Creates a `study` directory inside the given directory holding two records
/// for John Doe, one for Jane Roe, and a file that isn't a record.
///
#[allow(dead_code)]
pub fn create_study(dir: &Path) -> PathBuf {
  let root = dir.join("study");
  std::fs::create_dir_all(root.join("series1")).unwrap();

  std::fs::write(root.join("series1/1.json"), JOHN_DOE).unwrap();
  std::fs::write(root.join("series1/2.json"), JOHN_DOE).unwrap();
  std::fs::write(root.join("jane.json"), JANE_ROE).unwrap();
  std::fs::write(root.join("notes.txt"), "not a record").unwrap();

  root
}

/// Reads a string value out of a DICOM JSON file.
///
#[allow(dead_code)]
pub fn read_json_string(path: &Path, tag: &str) -> Option<String> {
  let json: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

  let value = json.get(tag)?.get("Value")?.get(0)?;

  match value.get("Alphabetic") {
    Some(name) => name.as_str().map(|s| s.to_string()),
    None => value.as_str().map(|s| s.to_string()),
  }
}

#[allow(dead_code)]
pub fn get_stdout(assert: Assert) -> String {
  String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[allow(dead_code)]
pub fn get_stderr(assert: Assert) -> String {
  String::from_utf8(assert.get_output().stderr.clone()).unwrap()
}
