//! Paths that locate a data element or sequence item inside a data set,
//! including inside nested sequences.

use crate::{DataElementTag, dictionary};

/// A path to a data element or sequence item in a data set. When formatted as
/// a string its entries are separated by forward slashes, e.g.
/// `"00081110/[0]/00081150"` is the *'(0008,1150) Referenced SOP Class UID'*
/// data element in the first item of the *'(0008,1110) Referenced Study
/// Sequence'*.
///
/// An empty path refers to the root data set.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSetPath(Vec<PathEntry>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PathEntry {
  DataElement(DataElementTag),
  SequenceItem(usize),
}

impl DataSetPath {
  /// Creates an empty path that refers to the root data set.
  ///
  pub fn new() -> Self {
    Self(vec![])
  }

  /// Creates a path to a data element in the root data set.
  ///
  pub fn new_with_data_element(tag: DataElementTag) -> Self {
    Self(vec![PathEntry::DataElement(tag)])
  }

  /// Returns whether the path refers to the root data set or to a data element
  /// directly inside it.
  ///
  pub fn is_root(&self) -> bool {
    matches!(self.0.as_slice(), [] | [PathEntry::DataElement(_)])
  }

  /// Returns the number of sequence items on the path, i.e. how deeply nested
  /// inside sequences the path's target is.
  ///
  pub fn sequence_depth(&self) -> usize {
    self
      .0
      .iter()
      .filter(|entry| matches!(entry, PathEntry::SequenceItem(_)))
      .count()
  }

  /// Returns the tag of the data element at the end of the path, if the path
  /// ends with a data element.
  ///
  pub fn final_data_element(&self) -> Option<DataElementTag> {
    match self.0.last() {
      Some(PathEntry::DataElement(tag)) => Some(*tag),
      _ => None,
    }
  }

  /// Appends a data element to the path. A data element can only follow a
  /// sequence item or start the path.
  ///
  pub fn add_data_element(
    &mut self,
    tag: DataElementTag,
  ) -> Result<(), String> {
    if let Some(PathEntry::DataElement(_)) = self.0.last() {
      return Err(format!(
        "Data element {} can't directly follow another data element",
        tag.to_hex_string()
      ));
    }

    self.0.push(PathEntry::DataElement(tag));
    Ok(())
  }

  /// Appends a sequence item index to the path. A sequence item can only
  /// follow a data element.
  ///
  pub fn add_sequence_item(&mut self, index: usize) -> Result<(), String> {
    if !matches!(self.0.last(), Some(PathEntry::DataElement(_))) {
      return Err(format!("Sequence item [{index}] must follow a data element"));
    }

    self.0.push(PathEntry::SequenceItem(index));
    Ok(())
  }

  /// Removes the last entry from the path. Does nothing on an empty path.
  ///
  pub fn pop(&mut self) {
    self.0.pop();
  }

  /// Formats the path with the name of each data element, e.g.
  /// `"(0008,1110) Referenced Study Sequence / Item 0 / (0008,1150) Referenced
  /// SOP Class UID"`.
  ///
  pub fn to_detailed_string(&self) -> String {
    self
      .0
      .iter()
      .map(|entry| match entry {
        PathEntry::DataElement(tag) => dictionary::tag_with_name(*tag),
        PathEntry::SequenceItem(index) => format!("Item {index}"),
      })
      .collect::<Vec<_>>()
      .join(" / ")
  }
}

impl core::fmt::Display for DataSetPath {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    let entries = self
      .0
      .iter()
      .map(|entry| match entry {
        PathEntry::DataElement(tag) => tag.to_hex_string(),
        PathEntry::SequenceItem(index) => format!("[{index}]"),
      })
      .collect::<Vec<_>>();

    f.write_str(&entries.join("/"))
  }
}
