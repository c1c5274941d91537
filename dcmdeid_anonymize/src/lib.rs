//! De-identification of data sets by applying a [`TagPolicy`] to every data
//! element, including those nested inside sequences, and by removing private
//! data elements.

mod tag_policy;

use dcmdeid_core::{
  DataElementTag, DataElementValue, DataError, DataSet, DataSetPath,
  ValueRepresentation, dictionary,
};

pub use tag_policy::{DEFAULT_MAX_SEQUENCE_DEPTH, TagAction, TagPolicy};

/// The data elements that are cleared by default because they identify the
/// patient, or the staff and institution involved in their care.
///
pub const DEFAULT_CLEAR_DATA_ELEMENTS: [&dictionary::Item; 19] = [
  &dictionary::PATIENT_NAME,
  &dictionary::PATIENT_ID,
  &dictionary::PATIENT_BIRTH_DATE,
  &dictionary::PATIENT_SEX,
  &dictionary::PATIENT_ADDRESS,
  &dictionary::PATIENT_TELEPHONE_NUMBERS,
  &dictionary::ACCESSION_NUMBER,
  &dictionary::STUDY_ID,
  &dictionary::INSTITUTION_NAME,
  &dictionary::INSTITUTION_ADDRESS,
  &dictionary::REFERRING_PHYSICIAN_NAME,
  &dictionary::PHYSICIANS_OF_RECORD,
  &dictionary::PERFORMING_PHYSICIAN_NAME,
  &dictionary::OPERATORS_NAME,
  &dictionary::MEDICAL_RECORD_LOCATOR,
  &dictionary::ADDITIONAL_PATIENT_HISTORY,
  &dictionary::PATIENT_COMMENTS,
  &dictionary::REQUESTING_PHYSICIAN,
  &dictionary::INSTITUTIONAL_DEPARTMENT_NAME,
];

/// Returns the tags of [`DEFAULT_CLEAR_DATA_ELEMENTS`].
///
pub fn default_clear_tags() -> impl Iterator<Item = DataElementTag> {
  DEFAULT_CLEAR_DATA_ELEMENTS.iter().map(|item| item.tag)
}

/// Returns whether the given tag is allowed through private tag removal.
///
pub fn filter_tag(tag: DataElementTag) -> bool {
  !tag.is_private()
}

/// Adds functions to [`DataSet`] to perform de-identification.
///
pub trait DataSetAnonymizeExtensions {
  /// Applies a tag policy to every data element in a data set, including
  /// those inside sequence items at any depth. Data elements are never added
  /// or removed, only their values are replaced.
  ///
  /// The items of a sequence are walked after the sequence's own data element
  /// is resolved, so sparing a sequence doesn't stop its items being
  /// resolved individually.
  ///
  /// Errors when a replacement value can't be stored in a data element's VR,
  /// or when sequences are nested more deeply than the policy's maximum
  /// sequence depth. On error the data set may be partially modified.
  ///
  fn apply_tag_policy(&mut self, policy: &TagPolicy) -> Result<(), DataError>;

  /// Removes all private data elements, including those inside sequence items
  /// at any depth. Returns the number of data elements removed.
  ///
  fn remove_private_tags(&mut self) -> usize;
}

impl DataSetAnonymizeExtensions for DataSet {
  fn apply_tag_policy(&mut self, policy: &TagPolicy) -> Result<(), DataError> {
    let mut path = DataSetPath::new();

    apply_tag_policy_to_data_set(self, policy, &mut path)
  }

  fn remove_private_tags(&mut self) -> usize {
    let mut removed_count = 0;

    self.retain(|tag, value| {
      if !filter_tag(tag) {
        removed_count += 1;
        return false;
      }

      if let Ok(items) = value.sequence_items_mut() {
        for item in items.iter_mut() {
          removed_count += item.remove_private_tags();
        }
      }

      true
    });

    removed_count
  }
}

fn apply_tag_policy_to_data_set(
  data_set: &mut DataSet,
  policy: &TagPolicy,
  path: &mut DataSetPath,
) -> Result<(), DataError> {
  for (tag, value) in data_set.iter_mut() {
    path
      .add_data_element(*tag)
      .map_err(DataError::new_value_invalid)?;

    apply_tag_policy_to_value(*tag, value, policy, path)?;

    path.pop();
  }

  Ok(())
}

fn apply_tag_policy_to_value(
  tag: DataElementTag,
  value: &mut DataElementValue,
  policy: &TagPolicy,
  path: &mut DataSetPath,
) -> Result<(), DataError> {
  let vr = value.value_representation();

  if let TagAction::SetValue(text) = policy.resolve(tag, vr) {
    *value = replacement_value(vr, text).map_err(|e| e.with_path(path))?;
  }

  let Ok(items) = value.sequence_items_mut() else {
    return Ok(());
  };

  if !items.is_empty() && path.sequence_depth() >= policy.max_sequence_depth()
  {
    return Err(DataError::new_sequence_depth_exceeded(
      policy.max_sequence_depth(),
      path.clone(),
    ));
  }

  for (index, item) in items.iter_mut().enumerate() {
    path
      .add_sequence_item(index)
      .map_err(DataError::new_value_invalid)?;

    apply_tag_policy_to_data_set(item, policy, path)?;

    path.pop();
  }

  Ok(())
}

/// Creates the value that replaces a data element's value. Empty text empties
/// the value for any VR, but non-empty text can only be stored in string VRs.
///
fn replacement_value(
  vr: ValueRepresentation,
  text: &str,
) -> Result<DataElementValue, DataError> {
  if text.is_empty() {
    return Ok(DataElementValue::new_empty(vr));
  }

  if !vr.is_string() {
    return Err(DataError::new_value_invalid(format!(
      "Value representation '{}' can't be set to the value '{}'",
      vr, text
    )));
  }

  DataElementValue::new_string(vr, text)
}
