//! Discovery of the files in a directory tree that make up a batch.

use std::path::{Path, PathBuf};

use dcmdeid_core::DcmdeidError;

/// An error that occurred walking a directory tree.
///
#[derive(Debug)]
pub struct ScanError(walkdir::Error);

impl core::fmt::Display for ScanError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    self.0.fmt(f)
  }
}

impl std::error::Error for ScanError {}

impl DcmdeidError for ScanError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("Directory scan error {}", task_description),
      "".to_string(),
      format!("  Error: {}", self.0),
    ];

    if let Some(path) = self.0.path() {
      lines.push(format!("  Path: {}", path.display()));
    }

    lines
  }
}

/// Recursively finds the files under `root` with the given extension. The
/// extension is matched case-insensitively, and a leading `.` on it is
/// ignored. The returned paths are sorted.
///
pub fn scan_directory(
  root: &Path,
  extension: &str,
) -> Result<Vec<PathBuf>, ScanError> {
  let extension = extension.trim_start_matches('.').to_lowercase();

  let mut paths = vec![];

  for entry in walkdir::WalkDir::new(root) {
    let entry = entry.map_err(ScanError)?;

    if !entry.file_type().is_file() {
      continue;
    }

    let matches = entry
      .path()
      .extension()
      .map(|e| e.to_string_lossy().to_lowercase() == extension)
      .unwrap_or(false);

    if matches {
      paths.push(entry.into_path());
    }
  }

  paths.sort();

  Ok(paths)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scan_directory_test() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::create_dir_all(root.join("b/nested")).unwrap();
    for name in ["z.json", "a.JSON", "b/nested/c.Json", "b/notes.txt", "json"] {
      std::fs::write(root.join(name), "{}").unwrap();
    }

    let expected = vec![
      root.join("a.JSON"),
      root.join("b/nested/c.Json"),
      root.join("z.json"),
    ];

    assert_eq!(scan_directory(root, "json").unwrap(), expected);
    assert_eq!(scan_directory(root, ".json").unwrap(), expected);
    assert_eq!(scan_directory(root, "dcm").unwrap(), Vec::<PathBuf>::new());
  }

  #[test]
  fn scan_missing_directory_test() {
    let dir = tempfile::tempdir().unwrap();

    assert!(scan_directory(&dir.path().join("missing"), "json").is_err());
  }
}
