//! De-identification of every file in a batch, using the replacement values in
//! a template.

use std::io::Write;
use std::path::{Path, PathBuf};

use rand::Rng;
use rayon::prelude::*;

use dcmdeid_anonymize::{DataSetAnonymizeExtensions, TagPolicy};
use dcmdeid_core::{DataElementTag, DataError, DataSet};

use crate::{
  FileError, FileFailure, MetadataRow, RecordCodec, RecordIoError, Template,
};

/// The outcome of de-identifying a batch of files.
///
#[derive(Debug, Default)]
pub struct BatchReport {
  /// The output paths of the files that were written, in input order.
  pub written: Vec<PathBuf>,

  /// The files that failed, in input order.
  pub failures: Vec<FileFailure>,
}

/// De-identifies files by applying a tag policy, extended with the
/// replacement values from a template row, and writes the results to each
/// file's output path.
///
pub struct AnonymizationDriver<'a> {
  codec: &'a dyn RecordCodec,
  policy: &'a TagPolicy,
  remove_private_tags: bool,
}

impl<'a> AnonymizationDriver<'a> {
  /// Creates a new driver. Private data elements are removed by default.
  ///
  pub fn new(codec: &'a dyn RecordCodec, policy: &'a TagPolicy) -> Self {
    Self {
      codec,
      policy,
      remove_private_tags: true,
    }
  }

  /// Sets whether private data elements are removed before the tag policy is
  /// applied.
  ///
  pub fn with_remove_private_tags(mut self, remove_private_tags: bool) -> Self {
    self.remove_private_tags = remove_private_tags;
    self
  }

  /// De-identifies a data set in place. The overrides take priority over the
  /// driver's tag policy for the tags they name.
  ///
  pub fn anonymize_data_set<'b>(
    &self,
    data_set: &mut DataSet,
    overrides: impl IntoIterator<Item = (DataElementTag, &'b str)>,
  ) -> Result<(), DataError> {
    let mut policy = self.policy.clone();
    for (tag, value) in overrides {
      policy.set_override(tag, value);
    }

    if self.remove_private_tags {
      data_set.remove_private_tags();
    }

    data_set.apply_tag_policy(&policy)
  }

  /// De-identifies the file for a metadata row, using the replacement values
  /// in the template row with the same primary key. If there is no such
  /// template row then only the tag policy is applied.
  ///
  pub fn anonymize_file(
    &self,
    row: &MetadataRow,
    template: &Template,
  ) -> Result<(), FileError> {
    let mut data_set = self
      .codec
      .read_full(&row.path)
      .map_err(FileError::UnreadableRecord)?;

    let overrides = template.overrides(&row.primary_key).unwrap_or_default();

    self
      .anonymize_data_set(&mut data_set, overrides)
      .map_err(FileError::PolicyApplication)?;

    write_record(self.codec, &data_set, &row.output_path)
      .map_err(FileError::EncodeOrWriteFailure)
  }

  /// De-identifies the files for all the metadata rows in parallel on the
  /// current Rayon thread pool. `on_file` is called before each file is
  /// processed. A file that fails doesn't stop the rest of the batch.
  ///
  pub fn run(
    &self,
    rows: &[MetadataRow],
    template: &Template,
    on_file: &(dyn Fn(&MetadataRow) + Sync),
  ) -> BatchReport {
    let results = rows
      .par_iter()
      .map(|row| {
        on_file(row);
        self.anonymize_file(row, template)
      })
      .collect::<Vec<_>>();

    let mut report = BatchReport::default();

    for (row, result) in rows.iter().zip(results) {
      match result {
        Ok(()) => report.written.push(row.output_path.clone()),
        Err(error) => report.failures.push(FileFailure {
          path: row.path.clone(),
          error,
        }),
      }
    }

    report
  }
}

/// Writes a data set to a temporary file alongside the output path and then
/// renames it into place, so that an incomplete output file is never left
/// behind. Missing parent directories are created.
///
pub fn write_record(
  codec: &dyn RecordCodec,
  data_set: &DataSet,
  output_path: &Path,
) -> Result<(), RecordIoError> {
  if let Some(parent) = output_path.parent() {
    std::fs::create_dir_all(parent).map_err(RecordIoError::IoError)?;
  }

  let mut temp_file_renamer =
    TempFileRenamer::new(temp_path(output_path), output_path.to_path_buf());

  let file = std::fs::File::create(&temp_file_renamer.temp_path)
    .map_err(RecordIoError::IoError)?;

  let mut stream = std::io::BufWriter::new(file);
  codec.write(data_set, &mut stream)?;
  stream.flush().map_err(RecordIoError::IoError)?;
  drop(stream);

  temp_file_renamer.commit().map_err(RecordIoError::IoError)
}

/// Appends a random suffix to get a unique name for a temporary output file.
///
fn temp_path(output_path: &Path) -> PathBuf {
  let mut rng = rand::rng();
  let random_suffix: String = (0..16)
    .map(|_| char::from(rng.sample(rand::distr::Alphanumeric)))
    .collect();

  let file_name = output_path
    .file_name()
    .map(|name| name.to_string_lossy().to_string())
    .unwrap_or_default();

  output_path.with_file_name(format!("{}.{}.tmp", file_name, random_suffix))
}

/// Renames a temporary file to an output path when [`Self::commit()`] is
/// called, otherwise deletes the temporary file on drop.
///
struct TempFileRenamer {
  temp_path: PathBuf,
  output_path: PathBuf,
  committed: bool,
}

impl TempFileRenamer {
  fn new(temp_path: PathBuf, output_path: PathBuf) -> Self {
    Self {
      temp_path,
      output_path,
      committed: false,
    }
  }

  fn commit(&mut self) -> Result<(), std::io::Error> {
    std::fs::rename(&self.temp_path, &self.output_path)?;
    self.committed = true;

    Ok(())
  }
}

impl Drop for TempFileRenamer {
  fn drop(&mut self) {
    if !self.committed {
      let _ = std::fs::remove_file(&self.temp_path);
    }
  }
}
