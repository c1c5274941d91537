//! Tag policies, which decide the final value of every data element in a data
//! set being de-identified.

use std::collections::{BTreeMap, BTreeSet};

use dcmdeid_core::{DataElementTag, ValueRepresentation};

/// The maximum depth of nested sequences walked by default when applying a tag
/// policy to a data set.
///
pub const DEFAULT_MAX_SEQUENCE_DEPTH: usize = 64;

/// The action a tag policy resolves for a single data element.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagAction<'a> {
  /// Leave the data element's value unchanged.
  Keep,

  /// Replace the data element's value with the given text. An empty string
  /// empties the value.
  SetValue(&'a str),
}

/// Describes how each data element in a data set is resolved during
/// de-identification. A tag policy has four parts:
///
/// 1. Spare tags. Data elements that are never modified.
/// 2. Mask VRs. Data elements with these VRs are set to the mask value.
/// 3. Clear tags. Data elements that are emptied.
/// 4. Overrides. Data elements that are set to an explicit value.
///
/// See [`TagPolicy::resolve()`] for how these combine.
///
#[derive(Clone, Debug, PartialEq)]
pub struct TagPolicy {
  spare_tags: BTreeSet<DataElementTag>,
  mask_vrs: BTreeSet<ValueRepresentation>,
  clear_tags: BTreeSet<DataElementTag>,
  overrides: BTreeMap<DataElementTag, String>,
  mask_value: String,
  max_sequence_depth: usize,
}

impl Default for TagPolicy {
  fn default() -> Self {
    Self::new()
  }
}

impl TagPolicy {
  /// Creates a tag policy that keeps every data element. It has no spare tags,
  /// mask VRs, clear tags or overrides, and its mask value is an empty string.
  ///
  pub fn new() -> Self {
    Self {
      spare_tags: BTreeSet::new(),
      mask_vrs: BTreeSet::new(),
      clear_tags: BTreeSet::new(),
      overrides: BTreeMap::new(),
      mask_value: "".to_string(),
      max_sequence_depth: DEFAULT_MAX_SEQUENCE_DEPTH,
    }
  }

  /// Adds tags that are never modified, regardless of any other part of the
  /// policy.
  ///
  pub fn with_spare_tags(
    mut self,
    tags: impl IntoIterator<Item = DataElementTag>,
  ) -> Self {
    self.spare_tags.extend(tags);
    self
  }

  /// Adds VRs whose data elements are set to the mask value.
  ///
  pub fn with_mask_vrs(
    mut self,
    vrs: impl IntoIterator<Item = ValueRepresentation>,
  ) -> Self {
    self.mask_vrs.extend(vrs);
    self
  }

  /// Adds tags whose data elements are emptied.
  ///
  pub fn with_clear_tags(
    mut self,
    tags: impl IntoIterator<Item = DataElementTag>,
  ) -> Self {
    self.clear_tags.extend(tags);
    self
  }

  /// Adds explicit values for data elements. An override for a tag that
  /// already has one replaces it.
  ///
  pub fn with_overrides(
    mut self,
    overrides: impl IntoIterator<Item = (DataElementTag, String)>,
  ) -> Self {
    self.overrides.extend(overrides);
    self
  }

  /// Sets the value written to data elements whose VR is masked.
  ///
  pub fn with_mask_value(mut self, mask_value: impl Into<String>) -> Self {
    self.mask_value = mask_value.into();
    self
  }

  /// Sets the maximum depth of nested sequences that will be walked.
  ///
  pub fn with_max_sequence_depth(mut self, max_sequence_depth: usize) -> Self {
    self.max_sequence_depth = max_sequence_depth;
    self
  }

  /// Sets the explicit value for a single data element.
  ///
  pub fn set_override(
    &mut self,
    tag: DataElementTag,
    value: impl Into<String>,
  ) {
    self.overrides.insert(tag, value.into());
  }

  pub fn spare_tags(&self) -> &BTreeSet<DataElementTag> {
    &self.spare_tags
  }

  pub fn mask_vrs(&self) -> &BTreeSet<ValueRepresentation> {
    &self.mask_vrs
  }

  pub fn clear_tags(&self) -> &BTreeSet<DataElementTag> {
    &self.clear_tags
  }

  pub fn overrides(&self) -> &BTreeMap<DataElementTag, String> {
    &self.overrides
  }

  pub fn mask_value(&self) -> &str {
    &self.mask_value
  }

  pub fn max_sequence_depth(&self) -> usize {
    self.max_sequence_depth
  }

  /// Resolves the action for a data element with the given tag and VR.
  ///
  /// The checks below run in order, and each one that matches replaces the
  /// action chosen by the ones before it:
  ///
  /// 1. A spare tag is kept, and no further checks run.
  /// 2. A masked VR is set to the mask value.
  /// 3. A clear tag is set to an empty value.
  /// 4. An overridden tag is set to its override value.
  ///
  /// An override therefore always wins over masking and clearing, unless the
  /// tag is spared.
  ///
  pub fn resolve(
    &self,
    tag: DataElementTag,
    vr: ValueRepresentation,
  ) -> TagAction<'_> {
    if self.spare_tags.contains(&tag) {
      return TagAction::Keep;
    }

    let mut action = TagAction::Keep;

    if self.mask_vrs.contains(&vr) {
      action = TagAction::SetValue(&self.mask_value);
    }

    if self.clear_tags.contains(&tag) {
      action = TagAction::SetValue("");
    }

    if let Some(value) = self.overrides.get(&tag) {
      action = TagAction::SetValue(value);
    }

    action
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use dcmdeid_core::dictionary;

  const PN: ValueRepresentation = ValueRepresentation::PersonName;
  const LO: ValueRepresentation = ValueRepresentation::LongString;
  const CS: ValueRepresentation = ValueRepresentation::CodeString;

  #[test]
  fn resolve_unconfigured_test() {
    let policy = TagPolicy::new();

    assert_eq!(
      policy.resolve(dictionary::PATIENT_NAME.tag, PN),
      TagAction::Keep
    );
  }

  #[test]
  fn resolve_clear_without_override_test() {
    let policy = TagPolicy::new()
      .with_clear_tags([dictionary::PATIENT_ID.tag])
      .with_mask_vrs([LO])
      .with_mask_value("MASKED");

    assert_eq!(
      policy.resolve(dictionary::PATIENT_ID.tag, LO),
      TagAction::SetValue("")
    );
  }

  #[test]
  fn resolve_override_beats_clear_test() {
    let policy = TagPolicy::new()
      .with_clear_tags([dictionary::PATIENT_ID.tag])
      .with_mask_vrs([LO])
      .with_overrides([(dictionary::PATIENT_ID.tag, "12345".to_string())]);

    assert_eq!(
      policy.resolve(dictionary::PATIENT_ID.tag, LO),
      TagAction::SetValue("12345")
    );
  }

  #[test]
  fn resolve_spare_is_absolute_test() {
    let policy = TagPolicy::new()
      .with_spare_tags([dictionary::PATIENT_NAME.tag])
      .with_clear_tags([dictionary::PATIENT_NAME.tag])
      .with_mask_vrs([PN])
      .with_overrides([(dictionary::PATIENT_NAME.tag, "Anon".to_string())]);

    assert_eq!(
      policy.resolve(dictionary::PATIENT_NAME.tag, PN),
      TagAction::Keep
    );
  }

  #[test]
  fn resolve_mask_test() {
    let policy = TagPolicy::new()
      .with_mask_vrs([PN])
      .with_mask_value("XXXX")
      .with_clear_tags([dictionary::PATIENT_ID.tag]);

    assert_eq!(
      policy.resolve(dictionary::OPERATORS_NAME.tag, PN),
      TagAction::SetValue("XXXX")
    );
    assert_eq!(
      policy.resolve(dictionary::PATIENT_SEX.tag, CS),
      TagAction::Keep
    );
  }

  #[test]
  fn set_override_test() {
    let mut policy = TagPolicy::new()
      .with_overrides([(dictionary::PATIENT_ID.tag, "A".to_string())]);

    policy.set_override(dictionary::PATIENT_ID.tag, "B");

    assert_eq!(
      policy.resolve(dictionary::PATIENT_ID.tag, LO),
      TagAction::SetValue("B")
    );
    assert_eq!(policy.overrides().len(), 1);
  }
}
