//! A data element value that can hold any of the DICOM value representations.
//! Data element values are usually stored in a [`DataSet`] which maps data
//! element tags to data element values.

use byteorder::ByteOrder;

use crate::{DataElementTag, DataError, DataSet, ValueRepresentation};

/// A DICOM data element value that holds one of the following types of data:
///
/// 1. Binary value. A data element value that holds raw bytes for a specific
///    VR. When the VR is a string type the bytes are UTF-8 encoded. Numeric
///    data is always little endian.
///
/// 2. Sequence value. A data element value that holds a sequence, which is a
///    list of nested data sets used to create hierarchies of data elements in a
///    DICOM data set.
///
/// Binary data is kept as raw bytes and only parsed when a value of a specific
/// type is requested, so data that doesn't conform to the DICOM standard is
/// still passed through unaltered.
///
/// Ref: PS3.5 6.2.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DataElementValue(RawDataElementValue);

#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::enum_variant_names)]
enum RawDataElementValue {
  BinaryValue {
    vr: ValueRepresentation,
    bytes: Vec<u8>,
  },
  SequenceValue {
    items: Vec<DataSet>,
  },
}

impl DataElementValue {
  /// Constructs a new data element binary value with the specified value
  /// representation. The only VR that's not allowed is
  /// [`ValueRepresentation::Sequence`]. When the VR is a string type `bytes`
  /// must be valid UTF-8, and when the VR holds fixed size numeric data the
  /// length of `bytes` must be a multiple of that size.
  ///
  pub fn new_binary(
    vr: ValueRepresentation,
    bytes: Vec<u8>,
  ) -> Result<Self, DataError> {
    if vr == ValueRepresentation::Sequence {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' is not valid for binary data",
        vr
      )));
    }

    if vr.is_string() && core::str::from_utf8(&bytes).is_err() {
      return Err(DataError::new_value_invalid(format!(
        "Bytes for '{}' are not valid UTF-8",
        vr
      )));
    }

    let value = Self::new_binary_unchecked(vr, bytes);

    value.validate_length()?;

    Ok(value)
  }

  /// Constructs a new data element binary value similar to
  /// [`Self::new_binary`], but does not validate `vr` or `bytes`.
  ///
  pub fn new_binary_unchecked(vr: ValueRepresentation, bytes: Vec<u8>) -> Self {
    Self(RawDataElementValue::BinaryValue { vr, bytes })
  }

  /// Creates a new `Sequence` data element value.
  ///
  pub fn new_sequence(items: Vec<DataSet>) -> Self {
    Self(RawDataElementValue::SequenceValue { items })
  }

  /// Creates an empty data element value for the given VR. For
  /// [`ValueRepresentation::Sequence`] this is a sequence with no items.
  ///
  pub fn new_empty(vr: ValueRepresentation) -> Self {
    if vr == ValueRepresentation::Sequence {
      Self::new_sequence(vec![])
    } else {
      Self::new_binary_unchecked(vr, vec![])
    }
  }

  /// Creates a new data element value holding a single string. The VR must be
  /// a string VR. The value is padded to even length with the VR's padding
  /// byte.
  ///
  pub fn new_string(
    vr: ValueRepresentation,
    value: &str,
  ) -> Result<Self, DataError> {
    if !vr.is_string() {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' does not hold string data",
        vr
      )));
    }

    let mut bytes = value.as_bytes().to_vec();
    if bytes.len() % 2 == 1 {
      bytes.push(vr.padding_byte());
    }

    Self::new_binary(vr, bytes)
  }

  /// Creates a new data element value holding multiple strings, which are
  /// joined with backslashes. More than one string is only allowed for string
  /// VRs that allow multiplicity.
  ///
  pub fn new_strings(
    vr: ValueRepresentation,
    values: &[&str],
  ) -> Result<Self, DataError> {
    if values.len() > 1 && !vr.allows_multiplicity() {
      return Err(DataError::new_value_invalid(format!(
        "Value representation '{}' does not allow multiple values",
        vr
      )));
    }

    if !vr.allows_multiplicity() {
      return Self::new_string(vr, values.first().copied().unwrap_or(""));
    }

    if let Some(value) = values.iter().find(|value| value.contains('\\')) {
      return Err(DataError::new_value_invalid(format!(
        "String '{}' contains a backslash",
        value
      )));
    }

    Self::new_string(vr, &values.join("\\"))
  }

  /// Creates a new `UnsignedShort` data element value.
  ///
  pub fn new_unsigned_short(value: &[u16]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 2];
    byteorder::LittleEndian::write_u16_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::UnsignedShort, bytes)
  }

  /// Creates a new `SignedShort` data element value.
  ///
  pub fn new_signed_short(value: &[i16]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 2];
    byteorder::LittleEndian::write_i16_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::SignedShort, bytes)
  }

  /// Creates a new `UnsignedLong` data element value.
  ///
  pub fn new_unsigned_long(value: &[u32]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 4];
    byteorder::LittleEndian::write_u32_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::UnsignedLong, bytes)
  }

  /// Creates a new `SignedLong` data element value.
  ///
  pub fn new_signed_long(value: &[i32]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 4];
    byteorder::LittleEndian::write_i32_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::SignedLong, bytes)
  }

  /// Creates a new `UnsignedVeryLong` data element value.
  ///
  pub fn new_unsigned_very_long(value: &[u64]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 8];
    byteorder::LittleEndian::write_u64_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::UnsignedVeryLong, bytes)
  }

  /// Creates a new `SignedVeryLong` data element value.
  ///
  pub fn new_signed_very_long(value: &[i64]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 8];
    byteorder::LittleEndian::write_i64_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::SignedVeryLong, bytes)
  }

  /// Creates a new `FloatingPointSingle` data element value.
  ///
  pub fn new_floating_point_single(value: &[f32]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 4];
    byteorder::LittleEndian::write_f32_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::FloatingPointSingle, bytes)
  }

  /// Creates a new `FloatingPointDouble` data element value.
  ///
  pub fn new_floating_point_double(value: &[f64]) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 8];
    byteorder::LittleEndian::write_f64_into(value, &mut bytes);

    Self::new_binary(ValueRepresentation::FloatingPointDouble, bytes)
  }

  /// Creates a new `AttributeTag` data element value.
  ///
  pub fn new_attribute_tag(
    value: &[DataElementTag],
  ) -> Result<Self, DataError> {
    let mut bytes = vec![0u8; value.len() * 4];
    for (tag, tag_bytes) in value.iter().zip(bytes.chunks_exact_mut(4)) {
      byteorder::LittleEndian::write_u16(&mut tag_bytes[0..2], tag.group);
      byteorder::LittleEndian::write_u16(&mut tag_bytes[2..4], tag.element);
    }

    Self::new_binary(ValueRepresentation::AttributeTag, bytes)
  }

  /// Returns the value representation for a data element value.
  ///
  pub fn value_representation(&self) -> ValueRepresentation {
    match &self.0 {
      RawDataElementValue::BinaryValue { vr, .. } => *vr,
      RawDataElementValue::SequenceValue { .. } => {
        ValueRepresentation::Sequence
      }
    }
  }

  /// For data element values that hold binary data, returns that data.
  ///
  pub fn bytes(&self) -> Result<&[u8], DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue { bytes, .. } => Ok(bytes),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For data element values that hold a sequence, returns a reference to the
  /// sequence's items.
  ///
  pub fn sequence_items(&self) -> Result<&[DataSet], DataError> {
    match &self.0 {
      RawDataElementValue::SequenceValue { items } => Ok(items),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For data element values that hold a sequence, returns a mutable reference
  /// to the sequence's items.
  ///
  pub fn sequence_items_mut(&mut self) -> Result<&mut Vec<DataSet>, DataError> {
    match &mut self.0 {
      RawDataElementValue::SequenceValue { items } => Ok(items),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns whether a data element value holds no data, i.e. has zero bytes
  /// or is a sequence with no items.
  ///
  pub fn is_empty(&self) -> bool {
    match &self.0 {
      RawDataElementValue::BinaryValue { bytes, .. } => bytes.is_empty(),
      RawDataElementValue::SequenceValue { items } => items.is_empty(),
    }
  }

  /// Returns the string contained in a data element value. This is only
  /// supported for string value representations, and for those that allow
  /// multiplicity only when exactly one string is present.
  ///
  pub fn get_string(&self) -> Result<&str, DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue { vr, bytes }
        if vr.is_string() && !vr.allows_multiplicity() =>
      {
        let string = utf8_string(bytes)?;

        let string = match *vr {
          ValueRepresentation::UniversalResourceIdentifier => {
            string.trim_matches(' ')
          }
          _ => string.trim_end_matches(' '),
        };

        Ok(string)
      }

      _ => {
        let strings = self.get_strings()?;

        match strings.as_slice() {
          [s] => Ok(s),
          _ => Err(DataError::new_multiplicity_mismatch()),
        }
      }
    }
  }

  /// Returns the strings contained in a data element value. This is only
  /// supported for string value representations that allow multiplicity.
  ///
  pub fn get_strings(&self) -> Result<Vec<&str>, DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue { vr, bytes }
        if vr.allows_multiplicity() =>
      {
        let string = utf8_string(bytes)?;

        let strings = string
          .split('\\')
          .map(|s| match vr {
            ValueRepresentation::UniqueIdentifier => s.trim_end_matches('\0'),
            ValueRepresentation::UnlimitedCharacters
            | ValueRepresentation::PersonName => s.trim_end_matches(' '),
            _ => s.trim_end_matches('\0').trim_matches(' '),
          })
          .collect::<Vec<&str>>();

        Ok(strings)
      }

      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the integers contained in a data element value. This is only
  /// supported for value representations that contain integer data.
  ///
  pub fn get_ints(&self) -> Result<Vec<i64>, DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue {
        vr: ValueRepresentation::IntegerString,
        ..
      } => self
        .get_strings()?
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| {
          s.parse::<i64>().map_err(|_| {
            DataError::new_value_invalid(format!(
              "IntegerString is invalid: '{}'",
              s
            ))
          })
        })
        .collect(),

      RawDataElementValue::BinaryValue { vr, bytes } => {
        let size = match vr {
          ValueRepresentation::SignedShort
          | ValueRepresentation::UnsignedShort => 2,
          ValueRepresentation::SignedLong
          | ValueRepresentation::UnsignedLong => 4,
          ValueRepresentation::SignedVeryLong
          | ValueRepresentation::UnsignedVeryLong => 8,
          _ => return Err(DataError::new_value_not_present()),
        };

        if bytes.len() % size != 0 {
          return Err(DataError::new_value_invalid(format!(
            "Invalid {} data",
            vr
          )));
        }

        bytes
          .chunks_exact(size)
          .map(|chunk| match vr {
            ValueRepresentation::SignedShort => {
              Ok(i64::from(byteorder::LittleEndian::read_i16(chunk)))
            }
            ValueRepresentation::UnsignedShort => {
              Ok(i64::from(byteorder::LittleEndian::read_u16(chunk)))
            }
            ValueRepresentation::SignedLong => {
              Ok(i64::from(byteorder::LittleEndian::read_i32(chunk)))
            }
            ValueRepresentation::UnsignedLong => {
              Ok(i64::from(byteorder::LittleEndian::read_u32(chunk)))
            }
            ValueRepresentation::SignedVeryLong => {
              Ok(byteorder::LittleEndian::read_i64(chunk))
            }
            _ => {
              let value = byteorder::LittleEndian::read_u64(chunk);
              i64::try_from(value).map_err(|_| {
                DataError::new_value_invalid(format!(
                  "Value '{}' is out of range for the target integer type",
                  value
                ))
              })
            }
          })
          .collect()
      }

      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the floats contained in a data element value. This is only
  /// supported for value representations containing floating point data.
  ///
  pub fn get_floats(&self) -> Result<Vec<f64>, DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue {
        vr: ValueRepresentation::DecimalString,
        ..
      } => self
        .get_strings()?
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| {
          s.parse::<f64>().map_err(|_| {
            DataError::new_value_invalid(format!(
              "DecimalString is invalid: '{}'",
              s
            ))
          })
        })
        .collect(),

      RawDataElementValue::BinaryValue { vr, bytes }
        if *vr == ValueRepresentation::FloatingPointDouble
          || *vr == ValueRepresentation::OtherDoubleString =>
      {
        if bytes.len() % 8 != 0 {
          return Err(DataError::new_value_invalid(
            "Invalid Float64 data".to_string(),
          ));
        }

        Ok(
          bytes
            .chunks_exact(8)
            .map(byteorder::LittleEndian::read_f64)
            .collect(),
        )
      }

      RawDataElementValue::BinaryValue { vr, bytes }
        if *vr == ValueRepresentation::FloatingPointSingle
          || *vr == ValueRepresentation::OtherFloatString =>
      {
        if bytes.len() % 4 != 0 {
          return Err(DataError::new_value_invalid(
            "Invalid Float32 data".to_string(),
          ));
        }

        Ok(
          bytes
            .chunks_exact(4)
            .map(|chunk| f64::from(byteorder::LittleEndian::read_f32(chunk)))
            .collect(),
        )
      }

      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the data element tags contained in a data element value. This is
  /// only supported for the `AttributeTag` value representation.
  ///
  pub fn get_attribute_tags(&self) -> Result<Vec<DataElementTag>, DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue {
        vr: ValueRepresentation::AttributeTag,
        bytes,
      } => {
        if bytes.len() % 4 != 0 {
          return Err(DataError::new_value_invalid(
            "Invalid AttributeTag data".to_string(),
          ));
        }

        Ok(
          bytes
            .chunks_exact(4)
            .map(|chunk| {
              DataElementTag::new(
                byteorder::LittleEndian::read_u16(&chunk[0..2]),
                byteorder::LittleEndian::read_u16(&chunk[2..4]),
              )
            })
            .collect(),
        )
      }

      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the value as a single line of text. Multiple values are joined
  /// with backslashes and an empty value is an empty string. This is the form
  /// used for values in templates.
  ///
  /// Sequences and VRs holding raw binary data have no text form.
  ///
  pub fn get_text(&self) -> Result<String, DataError> {
    let vr = self.value_representation();

    if vr != ValueRepresentation::Sequence && self.is_empty() {
      return Ok("".to_string());
    }

    if vr.allows_multiplicity() {
      return Ok(self.get_strings()?.join("\\"));
    }

    if vr.is_string() {
      return Ok(self.get_string()?.to_string());
    }

    let values = match vr {
      ValueRepresentation::FloatingPointSingle
      | ValueRepresentation::FloatingPointDouble => self
        .get_floats()?
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>(),

      ValueRepresentation::AttributeTag => self
        .get_attribute_tags()?
        .iter()
        .map(|tag| tag.to_hex_string())
        .collect(),

      _ => self.get_ints()?.iter().map(|i| i.to_string()).collect(),
    };

    Ok(values.join("\\"))
  }

  /// Checks that the number of bytes is a multiple of the size of the data
  /// type held by the VR.
  ///
  fn validate_length(&self) -> Result<(), DataError> {
    if let RawDataElementValue::BinaryValue { vr, bytes } = &self.0 {
      let multiple_of = match vr {
        ValueRepresentation::SignedShort
        | ValueRepresentation::UnsignedShort
        | ValueRepresentation::OtherWordString => 2,
        ValueRepresentation::AttributeTag
        | ValueRepresentation::FloatingPointSingle
        | ValueRepresentation::OtherFloatString
        | ValueRepresentation::OtherLongString
        | ValueRepresentation::SignedLong
        | ValueRepresentation::UnsignedLong => 4,
        ValueRepresentation::FloatingPointDouble
        | ValueRepresentation::OtherDoubleString
        | ValueRepresentation::OtherVeryLongString
        | ValueRepresentation::SignedVeryLong
        | ValueRepresentation::UnsignedVeryLong => 8,
        _ => 1,
      };

      if bytes.len() % multiple_of != 0 {
        return Err(DataError::new_value_length_invalid(
          *vr,
          bytes.len() as u64,
          format!("Must be a multiple of {} bytes", multiple_of),
        ));
      }
    }

    Ok(())
  }
}

fn utf8_string(bytes: &[u8]) -> Result<&str, DataError> {
  core::str::from_utf8(bytes).map_err(|_| {
    DataError::new_value_invalid("String bytes are not valid UTF-8".to_string())
  })
}
