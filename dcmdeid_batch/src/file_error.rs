//! Errors that stop a single file in a batch from being processed. The rest of
//! the batch carries on when one of these occurs.

use std::path::PathBuf;

use dcmdeid_core::{DataError, DcmdeidError};

use crate::RecordIoError;

/// An error that occurred processing a single file.
///
#[derive(Debug)]
pub enum FileError {
  /// The file couldn't be read by the record codec.
  UnreadableRecord(RecordIoError),

  /// No output path could be computed for the file, e.g. because it isn't
  /// inside the root directory of the batch.
  OutputPathInvalid { details: String },

  /// The tag policy couldn't be applied to the file's data set.
  PolicyApplication(DataError),

  /// The de-identified data set couldn't be encoded or written to its output
  /// path.
  EncodeOrWriteFailure(RecordIoError),
}

impl FileError {
  /// Returns the name of the kind of error.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      FileError::UnreadableRecord(_) => "Unreadable record",
      FileError::OutputPathInvalid { .. } => "Output path invalid",
      FileError::PolicyApplication(_) => "Policy application failed",
      FileError::EncodeOrWriteFailure(_) => "Encode or write failed",
    }
  }
}

impl core::fmt::Display for FileError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      FileError::UnreadableRecord(e) | FileError::EncodeOrWriteFailure(e) => {
        write!(f, "{}: {}", self.name(), e)
      }
      FileError::OutputPathInvalid { details } => {
        write!(f, "{}: {}", self.name(), details)
      }
      FileError::PolicyApplication(e) => write!(f, "{}: {}", self.name(), e),
    }
  }
}

impl std::error::Error for FileError {}

impl DcmdeidError for FileError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      FileError::UnreadableRecord(e) | FileError::EncodeOrWriteFailure(e) => {
        e.to_lines(task_description)
      }
      FileError::OutputPathInvalid { details } => vec![
        format!("Output path error {}", task_description),
        "".to_string(),
        format!("  Details: {}", details),
      ],
      FileError::PolicyApplication(e) => e.to_lines(task_description),
    }
  }
}

/// A file that failed to process, along with the reason.
///
#[derive(Debug)]
pub struct FileFailure {
  pub path: PathBuf,
  pub error: FileError,
}

impl FileFailure {
  /// Prints details on the failure to stderr.
  ///
  pub fn print(&self, task: &str) {
    self
      .error
      .print(&format!("{} \"{}\"", task, self.path.display()));
  }
}
