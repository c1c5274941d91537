//! A DICOM data set, defined as a map of data element tags to data element
//! values.

use std::collections::{BTreeMap, btree_map};

use crate::{
  DataElementTag, DataElementValue, DataError, DataSetPath, ValueRepresentation,
};

/// A DICOM data set that is a mapping of data element tags to data element
/// values. Data elements are kept in ascending tag order.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet(BTreeMap<DataElementTag, DataElementValue>);

impl DataSet {
  /// Returns a new empty data set.
  ///
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Returns the number of data elements in a data set.
  ///
  pub fn size(&self) -> usize {
    self.0.len()
  }

  /// Returns whether a data set is empty and contains no data elements.
  ///
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Returns whether a data element with the specified tag exists in a data
  /// set.
  ///
  pub fn has(&self, tag: DataElementTag) -> bool {
    self.0.contains_key(&tag)
  }

  /// Inserts a data element tag and value into a data set. If there is already
  /// a value for the tag then it is replaced with the new value.
  ///
  pub fn insert(&mut self, tag: DataElementTag, value: DataElementValue) {
    self.0.insert(tag, value);
  }

  /// Inserts a single string value into a data set.
  ///
  pub fn insert_string_value(
    &mut self,
    tag: DataElementTag,
    vr: ValueRepresentation,
    value: &str,
  ) -> Result<(), DataError> {
    let value = DataElementValue::new_string(vr, value)
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))?;

    self.insert(tag, value);

    Ok(())
  }

  /// Returns the value for a data element in a data set, if present.
  ///
  pub fn get(&self, tag: DataElementTag) -> Option<&DataElementValue> {
    self.0.get(&tag)
  }

  /// Returns a mutable reference to the value for a data element in a data
  /// set, if present.
  ///
  pub fn get_mut(
    &mut self,
    tag: DataElementTag,
  ) -> Option<&mut DataElementValue> {
    self.0.get_mut(&tag)
  }

  /// Returns the value for a data element in a data set, erroring if it isn't
  /// present.
  ///
  pub fn get_value(
    &self,
    tag: DataElementTag,
  ) -> Result<&DataElementValue, DataError> {
    self.0.get(&tag).ok_or_else(|| {
      DataError::new_tag_not_present()
        .with_path(&DataSetPath::new_with_data_element(tag))
    })
  }

  /// Returns the single string value for a data element in a data set.
  ///
  pub fn get_string(&self, tag: DataElementTag) -> Result<&str, DataError> {
    self
      .get_value(tag)?
      .get_string()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Returns the text form of the value of a data element in a data set. See
  /// [`DataElementValue::get_text()`] for details.
  ///
  pub fn get_text(&self, tag: DataElementTag) -> Result<String, DataError> {
    self
      .get_value(tag)?
      .get_text()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Deletes a data element from a data set, returning its value if it was
  /// present.
  ///
  pub fn delete(&mut self, tag: DataElementTag) -> Option<DataElementValue> {
    self.0.remove(&tag)
  }

  /// Retains only the data elements for which the predicate returns true.
  ///
  pub fn retain<F>(&mut self, mut f: F)
  where
    F: FnMut(DataElementTag, &mut DataElementValue) -> bool,
  {
    self.0.retain(|tag, value| f(*tag, value));
  }

  /// Returns the tags in a data set, sorted by group and element.
  ///
  pub fn tags(&self) -> Vec<DataElementTag> {
    self.0.keys().copied().collect()
  }

  /// Returns an iterator over the tags and values in a data set, in ascending
  /// tag order.
  ///
  pub fn iter(&self) -> btree_map::Iter<'_, DataElementTag, DataElementValue> {
    self.0.iter()
  }

  /// Returns an iterator over the tags and mutable values in a data set, in
  /// ascending tag order.
  ///
  pub fn iter_mut(
    &mut self,
  ) -> btree_map::IterMut<'_, DataElementTag, DataElementValue> {
    self.0.iter_mut()
  }
}

impl FromIterator<(DataElementTag, DataElementValue)> for DataSet {
  fn from_iter<T: IntoIterator<Item = (DataElementTag, DataElementValue)>>(
    iter: T,
  ) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl IntoIterator for DataSet {
  type Item = (DataElementTag, DataElementValue);
  type IntoIter = btree_map::IntoIter<DataElementTag, DataElementValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl<'a> IntoIterator for &'a DataSet {
  type Item = (&'a DataElementTag, &'a DataElementValue);
  type IntoIter = btree_map::Iter<'a, DataElementTag, DataElementValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary;

  fn patient_data_set() -> DataSet {
    let mut data_set = DataSet::new();

    data_set
      .insert_string_value(
        dictionary::PATIENT_NAME.tag,
        ValueRepresentation::PersonName,
        "Doe^John",
      )
      .unwrap();
    data_set
      .insert_string_value(
        dictionary::PATIENT_ID.tag,
        ValueRepresentation::LongString,
        "12345",
      )
      .unwrap();

    data_set
  }

  #[test]
  fn get_test() {
    let data_set = patient_data_set();

    assert_eq!(data_set.size(), 2);
    assert!(data_set.has(dictionary::PATIENT_ID.tag));
    assert_eq!(data_set.get_string(dictionary::PATIENT_ID.tag), Ok("12345"));
    assert_eq!(
      data_set.get_text(dictionary::PATIENT_NAME.tag),
      Ok("Doe^John".to_string())
    );

    assert_eq!(
      data_set.get_value(dictionary::PATIENT_SEX.tag),
      Err(DataError::new_tag_not_present().with_path(
        &DataSetPath::new_with_data_element(dictionary::PATIENT_SEX.tag)
      ))
    );
    assert_eq!(data_set.get(dictionary::PATIENT_SEX.tag), None);
  }

  #[test]
  fn tags_are_sorted_test() {
    let data_set = patient_data_set();

    assert_eq!(
      data_set.tags(),
      vec![dictionary::PATIENT_NAME.tag, dictionary::PATIENT_ID.tag]
    );
  }
}
