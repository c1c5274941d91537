//! Configuration of a batch de-identification, stored as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dcmdeid_anonymize::{
  DEFAULT_CLEAR_DATA_ELEMENTS, DEFAULT_MAX_SEQUENCE_DEPTH, TagPolicy,
};
use dcmdeid_core::{
  DataElementTag, DcmdeidError, ValueRepresentation, dictionary,
};

use crate::{UpdateField, UpdateRule};

/// The configuration of a batch de-identification. Fields are referenced by
/// their dictionary keyword, e.g. `"PatientID"`, or by their hex tag, e.g.
/// `"00100020"`. Any setting left out of a config file takes its default
/// value.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeidConfig {
  /// The extension of the files to de-identify.
  pub extension: String,

  /// Fields whose values are joined to form each file's primary key.
  pub key_fields: Vec<String>,

  /// Fields shown in the template after the key fields.
  pub reference_fields: Vec<String>,

  /// Fields that get a replacement value from the template.
  pub update_fields: Vec<UpdateFieldConfig>,

  /// The template column used to match rows in an override table.
  pub join_column: String,

  pub clear_tags: Vec<String>,
  pub spare_tags: Vec<String>,
  pub mask_vrs: Vec<String>,
  pub mask_value: String,
  pub remove_private_tags: bool,
  pub max_sequence_depth: usize,
}

/// A field that gets a replacement value, and how its default is derived.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateFieldConfig {
  pub field: String,

  #[serde(flatten)]
  pub rule: UpdateRuleConfig,
}

/// The serialized form of an [`UpdateRule`].
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum UpdateRuleConfig {
  Constant { value: String },
  StripPrefix { length: usize },
}

impl Default for DeidConfig {
  fn default() -> Self {
    let update_field = |field: &str, rule| UpdateFieldConfig {
      field: field.to_string(),
      rule,
    };
    let constant = |value: &str| UpdateRuleConfig::Constant {
      value: value.to_string(),
    };

    Self {
      extension: "json".to_string(),
      key_fields: vec![
        "PatientName".to_string(),
        "PatientID".to_string(),
        "AccessionNumber".to_string(),
      ],
      reference_fields: vec![
        "PatientBirthDate".to_string(),
        "PatientSex".to_string(),
        "PatientAge".to_string(),
        "StudyDate".to_string(),
      ],
      update_fields: vec![
        update_field("PatientName", constant("")),
        update_field("PatientID", constant("")),
        update_field("InstitutionName", constant("")),
        update_field("PatientBirthDate", constant("19700101")),
        update_field(
          "AccessionNumber",
          UpdateRuleConfig::StripPrefix { length: 3 },
        ),
      ],
      join_column: "PatientID".to_string(),
      clear_tags: DEFAULT_CLEAR_DATA_ELEMENTS
        .iter()
        .map(|item| item.keyword.to_string())
        .collect(),
      spare_tags: vec![],
      mask_vrs: ["PN", "LO", "SH", "AE", "DT", "DA"]
        .iter()
        .map(|vr| vr.to_string())
        .collect(),
      mask_value: "".to_string(),
      remove_private_tags: true,
      max_sequence_depth: DEFAULT_MAX_SEQUENCE_DEPTH,
    }
  }
}

/// A [`DeidConfig`] with its field references resolved to tags.
///
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
  pub extension: String,
  pub key_fields: Vec<DataElementTag>,

  /// The key fields followed by the reference fields, without duplicates.
  pub template_fields: Vec<DataElementTag>,

  pub update_fields: Vec<UpdateField>,

  /// The join column's name as it appears in templates.
  pub join_column: String,

  pub tag_policy: TagPolicy,
  pub remove_private_tags: bool,
}

impl ResolvedConfig {
  /// Returns the names of the template's update columns.
  ///
  pub fn update_column_names(&self) -> Vec<String> {
    self
      .update_fields
      .iter()
      .map(|field| crate::update_column_name(field.tag))
      .collect()
  }
}

impl DeidConfig {
  /// Parses a config from JSON.
  ///
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::JsonInvalid {
      details: e.to_string(),
    })
  }

  /// Reads a config from a JSON file.
  ///
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let json =
      std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        details: e.to_string(),
      })?;

    Self::from_json(&json)
  }

  /// Converts the config to pretty-printed JSON.
  ///
  pub fn to_json(&self) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(self).map_err(|e| ConfigError::JsonInvalid {
      details: e.to_string(),
    })
  }

  /// Resolves the config's field references and VRs, and builds the tag
  /// policy it describes.
  ///
  pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
    if self.key_fields.is_empty() {
      return Err(ConfigError::KeyFieldsEmpty);
    }

    let key_fields = resolve_fields(&self.key_fields)?;

    let mut template_fields = key_fields.clone();
    for tag in resolve_fields(&self.reference_fields)? {
      if !template_fields.contains(&tag) {
        template_fields.push(tag);
      }
    }

    let update_fields = self
      .update_fields
      .iter()
      .map(|field| {
        Ok(UpdateField {
          tag: resolve_field(&field.field)?,
          rule: match &field.rule {
            UpdateRuleConfig::Constant { value } => {
              UpdateRule::Constant(value.clone())
            }
            UpdateRuleConfig::StripPrefix { length } => {
              UpdateRule::strip_prefix(*length)
            }
          },
        })
      })
      .collect::<Result<Vec<_>, ConfigError>>()?;

    let join_column =
      dictionary::keyword_or_hex(resolve_field(&self.join_column)?);

    let mask_vrs = self
      .mask_vrs
      .iter()
      .map(|vr| {
        ValueRepresentation::from_bytes(vr.trim().as_bytes())
          .map_err(|_| ConfigError::VrInvalid { vr: vr.clone() })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let tag_policy = TagPolicy::new()
      .with_spare_tags(resolve_fields(&self.spare_tags)?)
      .with_mask_vrs(mask_vrs)
      .with_clear_tags(resolve_fields(&self.clear_tags)?)
      .with_mask_value(self.mask_value.clone())
      .with_max_sequence_depth(self.max_sequence_depth);

    Ok(ResolvedConfig {
      extension: self.extension.clone(),
      key_fields,
      template_fields,
      update_fields,
      join_column,
      tag_policy,
      remove_private_tags: self.remove_private_tags,
    })
  }
}

fn resolve_field(field: &str) -> Result<DataElementTag, ConfigError> {
  dictionary::resolve_field(field).map_err(|_| ConfigError::FieldInvalid {
    field: field.to_string(),
  })
}

fn resolve_fields(
  fields: &[String],
) -> Result<Vec<DataElementTag>, ConfigError> {
  fields.iter().map(|field| resolve_field(field)).collect()
}

/// An error that occurred reading or resolving a [`DeidConfig`].
///
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
  /// The config file couldn't be read.
  IoError { path: PathBuf, details: String },

  /// The config isn't valid JSON, or doesn't have the expected structure.
  JsonInvalid { details: String },

  /// A field reference isn't a known keyword or a valid hex tag.
  FieldInvalid { field: String },

  /// A mask VR isn't a valid VR.
  VrInvalid { vr: String },

  /// No key fields were specified.
  KeyFieldsEmpty,
}

impl core::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      ConfigError::IoError { path, details } => {
        write!(f, "Failed reading \"{}\": {}", path.display(), details)
      }
      ConfigError::JsonInvalid { details } => {
        write!(f, "Config JSON is invalid: {}", details)
      }
      ConfigError::FieldInvalid { field } => {
        write!(f, "Field '{}' is not a known keyword or hex tag", field)
      }
      ConfigError::VrInvalid { vr } => write!(f, "VR '{}' is invalid", vr),
      ConfigError::KeyFieldsEmpty => write!(f, "No key fields are specified"),
    }
  }
}

impl std::error::Error for ConfigError {}

impl DcmdeidError for ConfigError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Config error {}", task_description),
      "".to_string(),
      format!("  Details: {}", self),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use dcmdeid_anonymize::TagAction;

  #[test]
  fn default_config_resolve_test() {
    let config = DeidConfig::default().resolve().unwrap();

    assert_eq!(config.extension, "json");
    assert_eq!(
      config.key_fields,
      vec![
        dictionary::PATIENT_NAME.tag,
        dictionary::PATIENT_ID.tag,
        dictionary::ACCESSION_NUMBER.tag,
      ]
    );
    assert_eq!(config.template_fields.len(), 7);
    assert_eq!(config.join_column, "PatientID");
    assert_eq!(
      config.update_column_names(),
      vec![
        "Update_PatientName",
        "Update_PatientID",
        "Update_InstitutionName",
        "Update_PatientBirthDate",
        "Update_AccessionNumber",
      ]
    );
    assert_eq!(config.update_fields[4].rule.apply("ABC123"), "123");

    let policy = &config.tag_policy;
    assert_eq!(policy.clear_tags().len(), 19);
    assert_eq!(policy.mask_vrs().len(), 6);
    assert_eq!(
      policy.resolve(
        dictionary::STATION_NAME.tag,
        ValueRepresentation::ShortString
      ),
      TagAction::SetValue("")
    );
    assert_eq!(
      policy.resolve(dictionary::MODALITY.tag, ValueRepresentation::CodeString),
      TagAction::Keep
    );
  }

  #[test]
  fn from_json_test() {
    let config = DeidConfig::from_json(
      r#"{
        "key_fields": ["00100020"],
        "update_fields": [
          { "field": "PatientID", "rule": "constant", "value": "SUBJ" },
          { "field": "AccessionNumber", "rule": "strip_prefix", "length": 2 }
        ],
        "spare_tags": ["StudyDate"],
        "mask_vrs": []
      }"#,
    )
    .unwrap();

    assert_eq!(config.key_fields, vec!["00100020"]);
    assert_eq!(config.reference_fields.len(), 4);
    assert!(config.remove_private_tags);

    let resolved = config.resolve().unwrap();
    assert_eq!(resolved.key_fields, vec![dictionary::PATIENT_ID.tag]);
    assert_eq!(resolved.update_fields[0].rule.apply("MRN"), "SUBJ");
    assert_eq!(resolved.update_fields[1].rule.apply("ABC123"), "C123");
    assert_eq!(
      resolved.tag_policy.resolve(
        dictionary::STUDY_DATE.tag,
        ValueRepresentation::Date
      ),
      TagAction::Keep
    );
  }

  #[test]
  fn to_json_round_trip_test() {
    let config = DeidConfig::default();

    assert_eq!(DeidConfig::from_json(&config.to_json().unwrap()), Ok(config));
  }

  #[test]
  fn config_errors_test() {
    assert!(matches!(
      DeidConfig::from_json(r#"{"unknown": 1}"#),
      Err(ConfigError::JsonInvalid { .. })
    ));

    let config = DeidConfig {
      key_fields: vec!["PatientShoeSize".to_string()],
      ..Default::default()
    };
    assert_eq!(
      config.resolve().unwrap_err(),
      ConfigError::FieldInvalid {
        field: "PatientShoeSize".to_string()
      }
    );

    let config = DeidConfig {
      mask_vrs: vec!["XX".to_string()],
      ..Default::default()
    };
    assert_eq!(
      config.resolve().unwrap_err(),
      ConfigError::VrInvalid {
        vr: "XX".to_string()
      }
    );

    let config = DeidConfig {
      key_fields: vec![],
      ..Default::default()
    };
    assert_eq!(config.resolve().unwrap_err(), ConfigError::KeyFieldsEmpty);
  }
}
