//! Extraction of the identifying fields of every file in a batch, which is the
//! input to building a template.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use dcmdeid_core::{DataElementTag, DataSet};

use crate::{FileError, FileFailure, RecordCodec};

/// The suffix appended to the name of a batch's root directory to get the name
/// of the directory that de-identified files are written into.
///
pub const OUTPUT_DIRECTORY_SUFFIX: &str = "-Anonymized";

/// The identifying fields read from a single file.
///
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataRow {
  pub path: PathBuf,
  pub output_path: PathBuf,

  /// The value of every field that was read. Fields not present in the file
  /// are `None`.
  pub values: BTreeMap<DataElementTag, Option<String>>,

  /// The key fields' values joined with `_`. Rows with the same primary key
  /// share a single template row.
  pub primary_key: String,
}

impl MetadataRow {
  /// Returns the value of a field, or an empty string if it wasn't present.
  ///
  pub fn value(&self, tag: DataElementTag) -> &str {
    match self.values.get(&tag) {
      Some(Some(value)) => value.as_str(),
      _ => "",
    }
  }
}

/// The result of extracting metadata from a batch of files. Rows and failures
/// are in the same order as the input paths.
///
#[derive(Debug, Default)]
pub struct ExtractedMetadata {
  pub rows: Vec<MetadataRow>,
  pub failures: Vec<FileFailure>,
}

/// Returns the path a de-identified copy of a file is written to. This is the
/// file's path relative to `root`, placed inside a sibling of `root` that has
/// [`OUTPUT_DIRECTORY_SUFFIX`] appended to its name. E.g. with the root
/// `/data/study`, the file `/data/study/sub/x.json` is written to
/// `/data/study-Anonymized/sub/x.json`.
///
pub fn output_path(root: &Path, path: &Path) -> Result<PathBuf, FileError> {
  let Some(root_name) = root.file_name() else {
    return Err(FileError::OutputPathInvalid {
      details: format!(
        "Root directory \"{}\" has no final component",
        root.display()
      ),
    });
  };

  let relative_path =
    path
      .strip_prefix(root)
      .map_err(|_| FileError::OutputPathInvalid {
        details: format!(
          "File is not inside the root directory \"{}\"",
          root.display()
        ),
      })?;

  let output_directory = root.with_file_name(format!(
    "{}{}",
    root_name.to_string_lossy(),
    OUTPUT_DIRECTORY_SUFFIX
  ));

  Ok(output_directory.join(relative_path))
}

/// Joins the values of the key fields with `_`. Missing values contribute an
/// empty string.
///
pub fn primary_key(
  values: &BTreeMap<DataElementTag, Option<String>>,
  key_fields: &[DataElementTag],
) -> String {
  key_fields
    .iter()
    .map(|tag| match values.get(tag) {
      Some(Some(value)) => value.as_str(),
      _ => "",
    })
    .collect::<Vec<_>>()
    .join("_")
}

/// Reads the key fields and the other requested fields from every file. Files
/// are read in parallel on the current Rayon thread pool using a header-only
/// read.
///
/// A file that can't be read, or that has no valid output path, is recorded
/// as a failure and extraction continues with the remaining files.
///
pub fn extract_metadata(
  codec: &dyn RecordCodec,
  root: &Path,
  paths: &[PathBuf],
  fields_to_read: &[DataElementTag],
  key_fields: &[DataElementTag],
) -> ExtractedMetadata {
  let mut tags = key_fields.to_vec();
  for tag in fields_to_read {
    if !tags.contains(tag) {
      tags.push(*tag);
    }
  }

  let results = paths
    .par_iter()
    .map(|path| extract_row(codec, root, path, &tags))
    .collect::<Vec<_>>();

  let mut extracted_metadata = ExtractedMetadata::default();

  for (path, result) in paths.iter().zip(results) {
    match result {
      Ok(row) => extracted_metadata.rows.push(row),
      Err(error) => extracted_metadata.failures.push(FileFailure {
        path: path.clone(),
        error,
      }),
    }
  }

  for row in extracted_metadata.rows.iter_mut() {
    row.primary_key = primary_key(&row.values, key_fields);
  }

  extracted_metadata
}

fn extract_row(
  codec: &dyn RecordCodec,
  root: &Path,
  path: &Path,
  tags: &[DataElementTag],
) -> Result<MetadataRow, FileError> {
  let output_path = output_path(root, path)?;

  let data_set = codec
    .read_header(path)
    .map_err(FileError::UnreadableRecord)?;

  let values = tags
    .iter()
    .map(|tag| (*tag, field_value(&data_set, *tag)))
    .collect();

  Ok(MetadataRow {
    path: path.to_path_buf(),
    output_path,
    values,
    primary_key: "".to_string(),
  })
}

/// Returns the text of a field. Fields that are absent, or whose values can't
/// be represented as text such as sequences, are `None`.
///
fn field_value(data_set: &DataSet, tag: DataElementTag) -> Option<String> {
  data_set.get(tag)?.get_text().ok()
}
