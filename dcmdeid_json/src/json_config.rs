/// Config options used when converting a data set to DICOM JSON.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DicomJsonConfig {
  /// Whether to format the DICOM JSON for readability with newlines and
  /// indentation. This increases the size of the output but is easier to
  /// directly inspect.
  ///
  pub pretty_print: bool,
}

/// Config options used when reading a data set from DICOM JSON.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DicomJsonReadConfig {
  /// Whether to stop at the *'(7FE0,0010) Pixel Data'* data element, i.e. to
  /// leave out pixel data and every root data element that follows it. This
  /// also skips decoding the Base64 of any `InlineBinary` values, which are
  /// read as empty values instead.
  ///
  /// Used when only the identifying data elements of a data set are needed.
  ///
  pub header_only: bool,
}
