//! Errors that occur when reading, modifying or walking the data elements in a
//! data set.

use crate::{DataSetPath, DcmdeidError, ValueRepresentation, dictionary};

/// An error that occurred when retrieving or creating data elements.
///
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
  /// When retrieving a value, the requested tag was not present in the data
  /// set.
  TagNotPresent { path: DataSetPath },

  /// When retrieving a value, the requested type is not present. E.g. tried to
  /// retrieve an integer value when the data element value contains a string.
  ValueNotPresent { path: Option<DataSetPath> },

  /// When retrieving a value, it did not have the required multiplicity. E.g.
  /// tried to retrieve a single string value when the data element contained
  /// multiple string values.
  MultiplicityMismatch { path: Option<DataSetPath> },

  /// When retrieving or creating a value, there was an error with the value
  /// itself.
  ValueInvalid {
    details: String,
    path: Option<DataSetPath>,
  },

  /// When creating a value, the supplied data did not meet a length
  /// requirement of its value representation.
  ValueLengthInvalid {
    vr: ValueRepresentation,
    length: u64,
    details: String,
    path: Option<DataSetPath>,
  },

  /// When walking a data set, sequences were nested more deeply than the
  /// permitted maximum.
  SequenceDepthExceeded {
    max_depth: usize,
    path: DataSetPath,
  },
}

impl DataError {
  /// Constructs a new 'Tag not present' data error.
  ///
  pub fn new_tag_not_present() -> Self {
    Self::TagNotPresent {
      path: DataSetPath::new(),
    }
  }

  /// Constructs a new 'Value not present' data error.
  ///
  pub fn new_value_not_present() -> Self {
    Self::ValueNotPresent { path: None }
  }

  /// Constructs a new 'Multiplicity mismatch' data error.
  ///
  pub fn new_multiplicity_mismatch() -> Self {
    Self::MultiplicityMismatch { path: None }
  }

  /// Constructs a new 'Value invalid' data error.
  ///
  pub fn new_value_invalid(details: String) -> Self {
    Self::ValueInvalid {
      details,
      path: None,
    }
  }

  /// Constructs a new 'Value length invalid' data error.
  ///
  pub fn new_value_length_invalid(
    vr: ValueRepresentation,
    length: u64,
    details: String,
  ) -> Self {
    Self::ValueLengthInvalid {
      vr,
      length,
      details,
      path: None,
    }
  }

  /// Constructs a new 'Sequence depth exceeded' data error.
  ///
  pub fn new_sequence_depth_exceeded(
    max_depth: usize,
    path: DataSetPath,
  ) -> Self {
    Self::SequenceDepthExceeded { max_depth, path }
  }

  /// Returns the data set path for a data error, if one is set.
  ///
  pub fn path(&self) -> Option<&DataSetPath> {
    match self {
      Self::TagNotPresent { path }
      | Self::SequenceDepthExceeded { path, .. } => Some(path),
      Self::ValueNotPresent { path }
      | Self::MultiplicityMismatch { path }
      | Self::ValueInvalid { path, .. }
      | Self::ValueLengthInvalid { path, .. } => path.as_ref(),
    }
  }

  /// Adds a data set path to a data error. This indicates the exact location
  /// that a data error occurred in a data set, and should be included wherever
  /// possible to make troubleshooting easier.
  ///
  pub fn with_path(self, path: &DataSetPath) -> Self {
    match self {
      Self::TagNotPresent { .. } => Self::TagNotPresent { path: path.clone() },
      Self::ValueNotPresent { .. } => Self::ValueNotPresent {
        path: Some(path.clone()),
      },
      Self::MultiplicityMismatch { .. } => Self::MultiplicityMismatch {
        path: Some(path.clone()),
      },
      Self::ValueInvalid { details, .. } => Self::ValueInvalid {
        details,
        path: Some(path.clone()),
      },
      Self::ValueLengthInvalid {
        vr,
        length,
        details,
        ..
      } => Self::ValueLengthInvalid {
        vr,
        length,
        details,
        path: Some(path.clone()),
      },
      Self::SequenceDepthExceeded { max_depth, .. } => {
        Self::SequenceDepthExceeded {
          max_depth,
          path: path.clone(),
        }
      }
    }
  }

  /// Returns the name of the data error as a human-readable string.
  ///
  pub fn name(&self) -> &'static str {
    match self {
      Self::TagNotPresent { .. } => "Tag not present",
      Self::ValueNotPresent { .. } => "Value not present",
      Self::MultiplicityMismatch { .. } => "Multiplicity mismatch",
      Self::ValueInvalid { .. } => "Invalid value",
      Self::ValueLengthInvalid { .. } => "Invalid value length",
      Self::SequenceDepthExceeded { .. } => "Sequence depth exceeded",
    }
  }
}

impl core::fmt::Display for DataError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    let tag_path = match self.path().map(|path| path.to_string()) {
      Some(path) if !path.is_empty() => format!(" at {}", path),
      _ => "".to_string(),
    };

    match self {
      Self::ValueInvalid { details, .. }
      | Self::ValueLengthInvalid { details, .. } => {
        write!(f, "{}{}: {}", self.name(), tag_path, details)
      }

      Self::SequenceDepthExceeded { max_depth, .. } => write!(
        f,
        "{}{}: sequences are nested more than {} levels deep",
        self.name(),
        tag_path,
        max_depth
      ),

      _ => write!(f, "{}{}", self.name(), tag_path),
    }
  }
}

impl std::error::Error for DataError {}

impl DcmdeidError for DataError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("DICOM data error {}", task_description),
      "".to_string(),
      format!("  Error: {}", self.name()),
    ];

    if let Some(path) = self.path() {
      if let Some(tag) = path.final_data_element() {
        lines.push(format!("  Tag: {}", tag));
        lines.push(format!("  Name: {}", dictionary::tag_name(tag)));
      }

      if !path.is_root() {
        lines.push(format!("  Path: {}", path.to_detailed_string()));
      }
    }

    match self {
      Self::ValueInvalid { details, .. } => {
        lines.push(format!("  Details: {}", details));
      }

      Self::ValueLengthInvalid {
        vr,
        length,
        details,
        ..
      } => {
        lines.push(format!("  VR: {}", vr));
        lines.push(format!("  Length: {} bytes", length));
        lines.push(format!("  Details: {}", details));
      }

      Self::SequenceDepthExceeded { max_depth, .. } => {
        lines.push(format!("  Maximum depth: {}", max_depth));
      }

      _ => (),
    }

    lines
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn to_string_test() {
    let path = DataSetPath::new_with_data_element(dictionary::PATIENT_ID.tag);

    assert_eq!(
      DataError::new_value_not_present().with_path(&path).to_string(),
      "Value not present at 00100020"
    );

    assert_eq!(
      DataError::new_value_invalid("Not UTF-8".to_string()).to_string(),
      "Invalid value: Not UTF-8"
    );
  }

  #[test]
  fn to_lines_test() {
    let mut path = DataSetPath::new_with_data_element(
      dictionary::REFERENCED_STUDY_SEQUENCE.tag,
    );
    path.add_sequence_item(0).unwrap();
    path.add_data_element(dictionary::PATIENT_NAME.tag).unwrap();

    assert_eq!(
      DataError::new_value_invalid("Bad".to_string())
        .with_path(&path)
        .to_lines("testing"),
      vec![
        "DICOM data error testing".to_string(),
        "".to_string(),
        "  Error: Invalid value".to_string(),
        "  Tag: (0010,0010)".to_string(),
        "  Name: Patient's Name".to_string(),
        "  Path: (0008,1110) Referenced Study Sequence / Item 0 / (0010,0010) \
         Patient's Name"
          .to_string(),
        "  Details: Bad".to_string(),
      ]
    );
  }
}
