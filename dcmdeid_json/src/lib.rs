//! Reads and writes the DICOM JSON model, which is the record format that
//! DCMdeid de-identifies.
//!
//! Ref: PS3.18 F.

mod data_set_to_json;
mod json_config;
mod json_error;
mod json_to_data_set;

use dcmdeid_core::DataSet;

pub use json_config::{DicomJsonConfig, DicomJsonReadConfig};
pub use json_error::{JsonDeserializeError, JsonSerializeError};

/// Adds functions to [`DataSet`] for converting to and from the DICOM JSON
/// model.
///
pub trait DataSetJsonExtensions
where
  Self: Sized,
{
  /// Converts a data set to DICOM JSON.
  ///
  fn to_json(
    &self,
    config: &DicomJsonConfig,
  ) -> Result<String, JsonSerializeError>;

  /// Writes a data set as DICOM JSON to the given stream.
  ///
  fn to_json_stream(
    &self,
    config: &DicomJsonConfig,
    stream: &mut dyn std::io::Write,
  ) -> Result<(), JsonSerializeError>;

  /// Constructs a data set from DICOM JSON.
  ///
  fn from_json(json: &str) -> Result<Self, JsonDeserializeError> {
    Self::from_json_with_config(json, &DicomJsonReadConfig::default())
  }

  /// Constructs a data set from DICOM JSON using the given read config.
  ///
  fn from_json_with_config(
    json: &str,
    config: &DicomJsonReadConfig,
  ) -> Result<Self, JsonDeserializeError>;
}

impl DataSetJsonExtensions for DataSet {
  fn to_json(
    &self,
    config: &DicomJsonConfig,
  ) -> Result<String, JsonSerializeError> {
    let mut bytes = vec![];
    self.to_json_stream(config, &mut bytes)?;

    String::from_utf8(bytes).map_err(|e| {
      JsonSerializeError::IOError(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        e,
      ))
    })
  }

  fn to_json_stream(
    &self,
    config: &DicomJsonConfig,
    stream: &mut dyn std::io::Write,
  ) -> Result<(), JsonSerializeError> {
    let json = serde_json::Value::Object(
      data_set_to_json::convert_data_set_to_json(self)
        .map_err(JsonSerializeError::DataError)?,
    );

    if config.pretty_print {
      serde_json::to_writer_pretty(&mut *stream, &json)
    } else {
      serde_json::to_writer(&mut *stream, &json)
    }
    .map_err(|e| JsonSerializeError::IOError(e.into()))?;

    if config.pretty_print {
      stream.write_all(b"\n").map_err(JsonSerializeError::IOError)?;
    }

    Ok(())
  }

  fn from_json_with_config(
    json: &str,
    config: &DicomJsonReadConfig,
  ) -> Result<Self, JsonDeserializeError> {
    let value: serde_json::Value =
      serde_json::from_str(json).map_err(|e| {
        JsonDeserializeError::JsonInvalid {
          details: format!("Input is not valid JSON: {}", e),
          path: dcmdeid_core::DataSetPath::new(),
        }
      })?;

    json_to_data_set::convert_json_to_data_set(&value, config)
  }
}
