//! A dictionary of the DICOM data elements that DCMdeid refers to by name.
//!
//! This is not a complete data dictionary. It covers the data elements that
//! identify patients, studies and staff, plus the handful of structural data
//! elements needed to read and write records, so that they can be referred to
//! by keyword in configuration and shown with their names in output.
//!
//! Ref: PS3.6 6.

use crate::{DataElementTag, ValueRepresentation};

/// A data element in the dictionary.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Item {
  pub tag: DataElementTag,
  pub name: &'static str,
  pub keyword: &'static str,
  pub vr: ValueRepresentation,
}

macro_rules! item {
  ($const_name:ident, $group:literal, $element:literal, $name:literal,
   $keyword:literal, $vr:ident) => {
    pub const $const_name: Item = Item {
      tag: DataElementTag::new($group, $element),
      name: $name,
      keyword: $keyword,
      vr: ValueRepresentation::$vr,
    };
  };
}

item!(SPECIFIC_CHARACTER_SET, 0x0008, 0x0005, "Specific Character Set",
  "SpecificCharacterSet", CodeString);
item!(SOP_CLASS_UID, 0x0008, 0x0016, "SOP Class UID", "SOPClassUID",
  UniqueIdentifier);
item!(SOP_INSTANCE_UID, 0x0008, 0x0018, "SOP Instance UID", "SOPInstanceUID",
  UniqueIdentifier);
item!(STUDY_DATE, 0x0008, 0x0020, "Study Date", "StudyDate", Date);
item!(SERIES_DATE, 0x0008, 0x0021, "Series Date", "SeriesDate", Date);
item!(STUDY_TIME, 0x0008, 0x0030, "Study Time", "StudyTime", Time);
item!(ACCESSION_NUMBER, 0x0008, 0x0050, "Accession Number", "AccessionNumber",
  ShortString);
item!(MODALITY, 0x0008, 0x0060, "Modality", "Modality", CodeString);
item!(INSTITUTION_NAME, 0x0008, 0x0080, "Institution Name", "InstitutionName",
  LongString);
item!(INSTITUTION_ADDRESS, 0x0008, 0x0081, "Institution Address",
  "InstitutionAddress", ShortText);
item!(REFERRING_PHYSICIAN_NAME, 0x0008, 0x0090, "Referring Physician's Name",
  "ReferringPhysicianName", PersonName);
item!(STATION_NAME, 0x0008, 0x1010, "Station Name", "StationName",
  ShortString);
item!(STUDY_DESCRIPTION, 0x0008, 0x1030, "Study Description",
  "StudyDescription", LongString);
item!(SERIES_DESCRIPTION, 0x0008, 0x103E, "Series Description",
  "SeriesDescription", LongString);
item!(INSTITUTIONAL_DEPARTMENT_NAME, 0x0008, 0x1040,
  "Institutional Department Name", "InstitutionalDepartmentName", LongString);
item!(PHYSICIANS_OF_RECORD, 0x0008, 0x1048, "Physician(s) of Record",
  "PhysiciansOfRecord", PersonName);
item!(PERFORMING_PHYSICIAN_NAME, 0x0008, 0x1050, "Performing Physician's Name",
  "PerformingPhysicianName", PersonName);
item!(OPERATORS_NAME, 0x0008, 0x1070, "Operators' Name", "OperatorsName",
  PersonName);
item!(REFERENCED_STUDY_SEQUENCE, 0x0008, 0x1110, "Referenced Study Sequence",
  "ReferencedStudySequence", Sequence);
item!(REFERENCED_SOP_CLASS_UID, 0x0008, 0x1150, "Referenced SOP Class UID",
  "ReferencedSOPClassUID", UniqueIdentifier);
item!(REFERENCED_SOP_INSTANCE_UID, 0x0008, 0x1155,
  "Referenced SOP Instance UID", "ReferencedSOPInstanceUID", UniqueIdentifier);
item!(PATIENT_NAME, 0x0010, 0x0010, "Patient's Name", "PatientName",
  PersonName);
item!(PATIENT_ID, 0x0010, 0x0020, "Patient ID", "PatientID", LongString);
item!(PATIENT_BIRTH_DATE, 0x0010, 0x0030, "Patient's Birth Date",
  "PatientBirthDate", Date);
item!(PATIENT_SEX, 0x0010, 0x0040, "Patient's Sex", "PatientSex", CodeString);
item!(OTHER_PATIENT_IDS_SEQUENCE, 0x0010, 0x1002, "Other Patient IDs Sequence",
  "OtherPatientIDsSequence", Sequence);
item!(PATIENT_AGE, 0x0010, 0x1010, "Patient's Age", "PatientAge", AgeString);
item!(PATIENT_ADDRESS, 0x0010, 0x1040, "Patient's Address", "PatientAddress",
  LongString);
item!(MEDICAL_RECORD_LOCATOR, 0x0010, 0x1090, "Medical Record Locator",
  "MedicalRecordLocator", LongString);
item!(PATIENT_TELEPHONE_NUMBERS, 0x0010, 0x2154, "Patient's Telephone Numbers",
  "PatientTelephoneNumbers", ShortString);
item!(ADDITIONAL_PATIENT_HISTORY, 0x0010, 0x21B0, "Additional Patient History",
  "AdditionalPatientHistory", LongText);
item!(PATIENT_COMMENTS, 0x0010, 0x4000, "Patient Comments", "PatientComments",
  LongText);
item!(STUDY_INSTANCE_UID, 0x0020, 0x000D, "Study Instance UID",
  "StudyInstanceUID", UniqueIdentifier);
item!(SERIES_INSTANCE_UID, 0x0020, 0x000E, "Series Instance UID",
  "SeriesInstanceUID", UniqueIdentifier);
item!(STUDY_ID, 0x0020, 0x0010, "Study ID", "StudyID", ShortString);
item!(ROWS, 0x0028, 0x0010, "Rows", "Rows", UnsignedShort);
item!(COLUMNS, 0x0028, 0x0011, "Columns", "Columns", UnsignedShort);
item!(REQUESTING_PHYSICIAN, 0x0032, 0x1032, "Requesting Physician",
  "RequestingPhysician", PersonName);
item!(REQUEST_ATTRIBUTES_SEQUENCE, 0x0040, 0x0275,
  "Request Attributes Sequence", "RequestAttributesSequence", Sequence);
item!(PIXEL_DATA, 0x7FE0, 0x0010, "Pixel Data", "PixelData", OtherWordString);

/// Every item in the dictionary, in tag order.
///
pub const ITEMS: [&Item; 40] = [
  &SPECIFIC_CHARACTER_SET,
  &SOP_CLASS_UID,
  &SOP_INSTANCE_UID,
  &STUDY_DATE,
  &SERIES_DATE,
  &STUDY_TIME,
  &ACCESSION_NUMBER,
  &MODALITY,
  &INSTITUTION_NAME,
  &INSTITUTION_ADDRESS,
  &REFERRING_PHYSICIAN_NAME,
  &STATION_NAME,
  &STUDY_DESCRIPTION,
  &SERIES_DESCRIPTION,
  &INSTITUTIONAL_DEPARTMENT_NAME,
  &PHYSICIANS_OF_RECORD,
  &PERFORMING_PHYSICIAN_NAME,
  &OPERATORS_NAME,
  &REFERENCED_STUDY_SEQUENCE,
  &REFERENCED_SOP_CLASS_UID,
  &REFERENCED_SOP_INSTANCE_UID,
  &PATIENT_NAME,
  &PATIENT_ID,
  &PATIENT_BIRTH_DATE,
  &PATIENT_SEX,
  &OTHER_PATIENT_IDS_SEQUENCE,
  &PATIENT_AGE,
  &PATIENT_ADDRESS,
  &MEDICAL_RECORD_LOCATOR,
  &PATIENT_TELEPHONE_NUMBERS,
  &ADDITIONAL_PATIENT_HISTORY,
  &PATIENT_COMMENTS,
  &STUDY_INSTANCE_UID,
  &SERIES_INSTANCE_UID,
  &STUDY_ID,
  &ROWS,
  &COLUMNS,
  &REQUESTING_PHYSICIAN,
  &REQUEST_ATTRIBUTES_SEQUENCE,
  &PIXEL_DATA,
];

/// Looks up the dictionary item for a tag.
///
pub fn find(tag: DataElementTag) -> Option<&'static Item> {
  ITEMS.iter().find(|item| item.tag == tag).copied()
}

/// Looks up the dictionary item for a keyword, e.g. `"PatientID"`. The match
/// is case sensitive.
///
pub fn find_by_keyword(keyword: &str) -> Option<&'static Item> {
  ITEMS.iter().find(|item| item.keyword == keyword).copied()
}

/// Returns the name of a tag, e.g. `"Patient's Name"`. Tags not in the
/// dictionary are named `"Private"` or `"Unknown"`.
///
pub fn tag_name(tag: DataElementTag) -> &'static str {
  match find(tag) {
    Some(item) => item.name,
    None if tag.is_private() => "Private",
    None => "Unknown",
  }
}

/// Formats a tag followed by its name, e.g. `"(0010,0010) Patient's Name"`.
///
pub fn tag_with_name(tag: DataElementTag) -> String {
  format!("{} {}", tag, tag_name(tag))
}

/// Returns the keyword for a tag, falling back to its eight character hex
/// form for tags not in the dictionary. This is the name used for columns in
/// templates.
///
pub fn keyword_or_hex(tag: DataElementTag) -> String {
  match find(tag) {
    Some(item) => item.keyword.to_string(),
    None => tag.to_hex_string(),
  }
}

/// Resolves a field reference to a tag. The reference is either a dictionary
/// keyword, e.g. `"PatientID"`, or a hex tag, e.g. `"00100020"` or
/// `"(0010,0020)"`.
///
#[allow(clippy::result_unit_err)]
pub fn resolve_field(reference: &str) -> Result<DataElementTag, ()> {
  match find_by_keyword(reference.trim()) {
    Some(item) => Ok(item.tag),
    None => DataElementTag::from_hex_string(reference),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn items_are_sorted_test() {
    assert!(ITEMS.windows(2).all(|pair| pair[0].tag < pair[1].tag));
  }

  #[test]
  fn find_test() {
    assert_eq!(find(DataElementTag::new(0x0010, 0x0020)), Some(&PATIENT_ID));
    assert_eq!(find(DataElementTag::new(0x0011, 0x0020)), None);
    assert_eq!(find_by_keyword("AccessionNumber"), Some(&ACCESSION_NUMBER));
    assert_eq!(find_by_keyword("accessionnumber"), None);
  }

  #[test]
  fn tag_name_test() {
    assert_eq!(tag_name(PATIENT_SEX.tag), "Patient's Sex");
    assert_eq!(tag_name(DataElementTag::new(0x0009, 0x1001)), "Private");
    assert_eq!(tag_name(DataElementTag::new(0x0018, 0x0015)), "Unknown");

    assert_eq!(
      tag_with_name(STUDY_ID.tag),
      "(0020,0010) Study ID".to_string()
    );
  }

  #[test]
  fn keyword_or_hex_test() {
    assert_eq!(keyword_or_hex(PATIENT_BIRTH_DATE.tag), "PatientBirthDate");
    assert_eq!(keyword_or_hex(DataElementTag::new(0x0018, 0x0015)), "00180015");
  }

  #[test]
  fn resolve_field_test() {
    assert_eq!(resolve_field("PatientName"), Ok(PATIENT_NAME.tag));
    assert_eq!(resolve_field("00180015"), Ok(DataElementTag::new(0x18, 0x15)));
    assert_eq!(resolve_field("(0008,0050)"), Ok(ACCESSION_NUMBER.tag));
    assert_eq!(resolve_field("NotAKeyword"), Err(()));
  }
}
