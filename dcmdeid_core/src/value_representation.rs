//! The DICOM value representations (VRs), which describe the data type and
//! format of a data element's value.
//!
//! Ref: PS3.5 6.2.

/// All DICOM value representations.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueRepresentation {
  AgeString,
  ApplicationEntity,
  AttributeTag,
  CodeString,
  Date,
  DateTime,
  DecimalString,
  FloatingPointDouble,
  FloatingPointSingle,
  IntegerString,
  LongString,
  LongText,
  OtherByteString,
  OtherDoubleString,
  OtherFloatString,
  OtherLongString,
  OtherVeryLongString,
  OtherWordString,
  PersonName,
  Sequence,
  ShortString,
  ShortText,
  SignedLong,
  SignedShort,
  SignedVeryLong,
  Time,
  UniqueIdentifier,
  UniversalResourceIdentifier,
  Unknown,
  UnlimitedCharacters,
  UnlimitedText,
  UnsignedLong,
  UnsignedShort,
  UnsignedVeryLong,
}

const ALL: [ValueRepresentation; 34] = [
  ValueRepresentation::AgeString,
  ValueRepresentation::ApplicationEntity,
  ValueRepresentation::AttributeTag,
  ValueRepresentation::CodeString,
  ValueRepresentation::Date,
  ValueRepresentation::DateTime,
  ValueRepresentation::DecimalString,
  ValueRepresentation::FloatingPointDouble,
  ValueRepresentation::FloatingPointSingle,
  ValueRepresentation::IntegerString,
  ValueRepresentation::LongString,
  ValueRepresentation::LongText,
  ValueRepresentation::OtherByteString,
  ValueRepresentation::OtherDoubleString,
  ValueRepresentation::OtherFloatString,
  ValueRepresentation::OtherLongString,
  ValueRepresentation::OtherVeryLongString,
  ValueRepresentation::OtherWordString,
  ValueRepresentation::PersonName,
  ValueRepresentation::Sequence,
  ValueRepresentation::ShortString,
  ValueRepresentation::ShortText,
  ValueRepresentation::SignedLong,
  ValueRepresentation::SignedShort,
  ValueRepresentation::SignedVeryLong,
  ValueRepresentation::Time,
  ValueRepresentation::UniqueIdentifier,
  ValueRepresentation::UniversalResourceIdentifier,
  ValueRepresentation::Unknown,
  ValueRepresentation::UnlimitedCharacters,
  ValueRepresentation::UnlimitedText,
  ValueRepresentation::UnsignedLong,
  ValueRepresentation::UnsignedShort,
  ValueRepresentation::UnsignedVeryLong,
];

impl ValueRepresentation {
  /// Parses a two character VR code, e.g. `b"PN"`.
  ///
  #[allow(clippy::result_unit_err)]
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, ()> {
    ALL
      .iter()
      .find(|vr| vr.to_str().as_bytes() == bytes)
      .copied()
      .ok_or(())
  }

  /// Returns the two character code for a VR, e.g. `"PN"`.
  ///
  pub fn to_str(&self) -> &'static str {
    match self {
      Self::AgeString => "AS",
      Self::ApplicationEntity => "AE",
      Self::AttributeTag => "AT",
      Self::CodeString => "CS",
      Self::Date => "DA",
      Self::DateTime => "DT",
      Self::DecimalString => "DS",
      Self::FloatingPointDouble => "FD",
      Self::FloatingPointSingle => "FL",
      Self::IntegerString => "IS",
      Self::LongString => "LO",
      Self::LongText => "LT",
      Self::OtherByteString => "OB",
      Self::OtherDoubleString => "OD",
      Self::OtherFloatString => "OF",
      Self::OtherLongString => "OL",
      Self::OtherVeryLongString => "OV",
      Self::OtherWordString => "OW",
      Self::PersonName => "PN",
      Self::Sequence => "SQ",
      Self::ShortString => "SH",
      Self::ShortText => "ST",
      Self::SignedLong => "SL",
      Self::SignedShort => "SS",
      Self::SignedVeryLong => "SV",
      Self::Time => "TM",
      Self::UniqueIdentifier => "UI",
      Self::UniversalResourceIdentifier => "UR",
      Self::Unknown => "UN",
      Self::UnlimitedCharacters => "UC",
      Self::UnlimitedText => "UT",
      Self::UnsignedLong => "UL",
      Self::UnsignedShort => "US",
      Self::UnsignedVeryLong => "UV",
    }
  }

  /// Returns whether a VR holds string data.
  ///
  pub fn is_string(&self) -> bool {
    matches!(
      self,
      Self::AgeString
        | Self::ApplicationEntity
        | Self::CodeString
        | Self::Date
        | Self::DateTime
        | Self::DecimalString
        | Self::IntegerString
        | Self::LongString
        | Self::LongText
        | Self::PersonName
        | Self::ShortString
        | Self::ShortText
        | Self::Time
        | Self::UniqueIdentifier
        | Self::UniversalResourceIdentifier
        | Self::UnlimitedCharacters
        | Self::UnlimitedText
    )
  }

  /// Returns whether a VR holds string data that is affected by the Specific
  /// Character Set, i.e. may contain characters outside of the default
  /// character repertoire.
  ///
  pub fn is_encoded_string(&self) -> bool {
    matches!(
      self,
      Self::LongString
        | Self::LongText
        | Self::PersonName
        | Self::ShortString
        | Self::ShortText
        | Self::UnlimitedCharacters
        | Self::UnlimitedText
    )
  }

  /// Returns whether a string VR allows multiple values separated by a
  /// backslash. Text VRs treat the backslash as an ordinary character.
  ///
  pub fn allows_multiplicity(&self) -> bool {
    self.is_string()
      && !matches!(
        self,
        Self::LongText
          | Self::ShortText
          | Self::UniversalResourceIdentifier
          | Self::UnlimitedText
      )
  }

  /// Returns whether a VR holds raw binary data that has no natural text or
  /// numeric representation.
  ///
  pub fn is_binary(&self) -> bool {
    matches!(
      self,
      Self::OtherByteString
        | Self::OtherDoubleString
        | Self::OtherFloatString
        | Self::OtherLongString
        | Self::OtherVeryLongString
        | Self::OtherWordString
        | Self::Unknown
    )
  }

  /// Returns the byte used to pad values of this VR to an even length.
  ///
  pub fn padding_byte(&self) -> u8 {
    match self {
      Self::UniqueIdentifier | Self::OtherByteString | Self::Unknown => 0x00,
      _ => 0x20,
    }
  }
}

impl core::fmt::Display for ValueRepresentation {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    f.write_str(self.to_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_bytes_test() {
    for vr in ALL {
      assert_eq!(
        ValueRepresentation::from_bytes(vr.to_str().as_bytes()),
        Ok(vr)
      );
    }

    assert_eq!(ValueRepresentation::from_bytes(b"XX"), Err(()));
    assert_eq!(ValueRepresentation::from_bytes(b"pn"), Err(()));
  }

  #[test]
  fn is_string_test() {
    assert!(ValueRepresentation::PersonName.is_string());
    assert!(ValueRepresentation::Date.is_string());
    assert!(!ValueRepresentation::UnsignedShort.is_string());
    assert!(!ValueRepresentation::Sequence.is_string());
    assert!(!ValueRepresentation::OtherWordString.is_string());
  }

  #[test]
  fn allows_multiplicity_test() {
    assert!(ValueRepresentation::CodeString.allows_multiplicity());
    assert!(!ValueRepresentation::LongText.allows_multiplicity());
    assert!(!ValueRepresentation::UnsignedLong.allows_multiplicity());
  }

  #[test]
  fn padding_byte_test() {
    assert_eq!(ValueRepresentation::UniqueIdentifier.padding_byte(), 0x00);
    assert_eq!(ValueRepresentation::PersonName.padding_byte(), 0x20);
  }
}
