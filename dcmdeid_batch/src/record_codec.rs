//! The seam between batch de-identification and the format records are stored
//! in on disk.

use std::io::Write;
use std::path::Path;

use dcmdeid_core::{DataSet, DcmdeidError};
use dcmdeid_json::{
  DataSetJsonExtensions, DicomJsonConfig, DicomJsonReadConfig,
  JsonDeserializeError, JsonSerializeError,
};

/// Reads records from files into data sets, and writes data sets back out.
/// Implementations are shared across the threads of a batch, so must be
/// [`Sync`].
///
pub trait RecordCodec: Sync {
  /// Reads the data elements needed to extract metadata from a record. Bulk
  /// data such as pixel data may be skipped.
  ///
  fn read_header(&self, path: &Path) -> Result<DataSet, RecordIoError>;

  /// Reads a complete record.
  ///
  fn read_full(&self, path: &Path) -> Result<DataSet, RecordIoError>;

  /// Encodes a data set into the given stream.
  ///
  fn write(
    &self,
    data_set: &DataSet,
    stream: &mut dyn Write,
  ) -> Result<(), RecordIoError>;
}

/// An error that occurred reading or writing a record.
///
#[derive(Debug)]
pub enum RecordIoError {
  /// The record couldn't be read from or written to the file system.
  IoError(std::io::Error),

  /// The record isn't valid DICOM JSON.
  JsonDeserializeError(JsonDeserializeError),

  /// The data set couldn't be converted to DICOM JSON.
  JsonSerializeError(JsonSerializeError),

  /// Any other error raised by a codec.
  OtherError { details: String },
}

impl core::fmt::Display for RecordIoError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      RecordIoError::IoError(e) => write!(f, "I/O error: {}", e),
      RecordIoError::JsonDeserializeError(e) => e.fmt(f),
      RecordIoError::JsonSerializeError(e) => e.fmt(f),
      RecordIoError::OtherError { details } => details.fmt(f),
    }
  }
}

impl std::error::Error for RecordIoError {}

impl DcmdeidError for RecordIoError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      RecordIoError::IoError(e) => vec![
        format!("I/O error {}", task_description),
        "".to_string(),
        format!("  Error: {}", e),
      ],
      RecordIoError::JsonDeserializeError(e) => e.to_lines(task_description),
      RecordIoError::JsonSerializeError(e) => e.to_lines(task_description),
      RecordIoError::OtherError { details } => vec![
        format!("Record error {}", task_description),
        "".to_string(),
        format!("  Details: {}", details),
      ],
    }
  }
}

/// Reads and writes records stored as DICOM JSON files.
///
#[derive(Clone, Debug, Default)]
pub struct JsonRecordCodec {
  pub pretty_print: bool,
}

impl JsonRecordCodec {
  fn read(
    &self,
    path: &Path,
    config: &DicomJsonReadConfig,
  ) -> Result<DataSet, RecordIoError> {
    let json = std::fs::read_to_string(path).map_err(RecordIoError::IoError)?;

    DataSet::from_json_with_config(&json, config)
      .map_err(RecordIoError::JsonDeserializeError)
  }
}

impl RecordCodec for JsonRecordCodec {
  fn read_header(&self, path: &Path) -> Result<DataSet, RecordIoError> {
    self.read(path, &DicomJsonReadConfig { header_only: true })
  }

  fn read_full(&self, path: &Path) -> Result<DataSet, RecordIoError> {
    self.read(path, &DicomJsonReadConfig { header_only: false })
  }

  fn write(
    &self,
    data_set: &DataSet,
    stream: &mut dyn Write,
  ) -> Result<(), RecordIoError> {
    let config = DicomJsonConfig {
      pretty_print: self.pretty_print,
    };

    data_set
      .to_json_stream(&config, stream)
      .map_err(RecordIoError::JsonSerializeError)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use dcmdeid_core::{DataElementValue, ValueRepresentation, dictionary};

  #[test]
  fn json_record_codec_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");

    let mut data_set = DataSet::new();
    data_set
      .insert_string_value(
        dictionary::PATIENT_ID.tag,
        ValueRepresentation::LongString,
        "MRN-001",
      )
      .unwrap();
    data_set.insert(
      dictionary::PIXEL_DATA.tag,
      DataElementValue::new_binary(
        ValueRepresentation::OtherWordString,
        vec![0, 1, 2, 3],
      )
      .unwrap(),
    );

    let codec = JsonRecordCodec::default();

    let mut file = std::fs::File::create(&path).unwrap();
    codec.write(&data_set, &mut file).unwrap();
    drop(file);

    assert_eq!(codec.read_full(&path).unwrap(), data_set);

    let header = codec.read_header(&path).unwrap();
    assert!(!header.has(dictionary::PIXEL_DATA.tag));
    assert_eq!(header.get_string(dictionary::PATIENT_ID.tag), Ok("MRN-001"));
  }

  #[test]
  fn json_record_codec_errors_test() {
    let dir = tempfile::tempdir().unwrap();
    let codec = JsonRecordCodec::default();

    assert!(matches!(
      codec.read_full(&dir.path().join("missing.json")),
      Err(RecordIoError::IoError(_))
    ));

    let path = dir.path().join("invalid.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(
      codec.read_header(&path),
      Err(RecordIoError::JsonDeserializeError(_))
    ));
  }
}
