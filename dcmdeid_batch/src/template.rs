//! Templates, which hold one row per distinct primary key in a batch along with
//! the replacement values that will be written into that key's files.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use dcmdeid_core::{DataElementTag, dictionary};

use crate::{MetadataRow, TableError};

/// The prefix of the names of a template's update columns.
///
pub const UPDATE_COLUMN_PREFIX: &str = "Update_";

/// Returns the name of the update column for a field, e.g.
/// `"Update_PatientID"`.
///
pub fn update_column_name(tag: DataElementTag) -> String {
  format!("{}{}", UPDATE_COLUMN_PREFIX, dictionary::keyword_or_hex(tag))
}

/// How the default replacement value for a field is derived.
///
#[derive(Clone)]
pub enum UpdateRule {
  /// Every row gets the same replacement value.
  Constant(String),

  /// Each row's replacement value is computed from the field's current value
  /// in that row. An absent field is passed as an empty string.
  Transform(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl UpdateRule {
  /// Creates a rule that removes the first `length` characters of the current
  /// value, e.g. an institution prefix on an accession number.
  ///
  pub fn strip_prefix(length: usize) -> Self {
    Self::Transform(Arc::new(move |value: &str| {
      value.chars().skip(length).collect()
    }))
  }

  /// Returns the replacement value for the given current value.
  ///
  pub fn apply(&self, value: &str) -> String {
    match self {
      Self::Constant(constant) => constant.clone(),
      Self::Transform(transform) => transform(value),
    }
  }
}

impl core::fmt::Debug for UpdateRule {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
      Self::Transform(_) => f.write_str("Transform"),
    }
  }
}

/// A field that gets a replacement value during de-identification, and the
/// rule for its default value.
///
#[derive(Clone, Debug)]
pub struct UpdateField {
  pub tag: DataElementTag,
  pub rule: UpdateRule,
}

/// A single row of a template.
///
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateRow {
  pub primary_key: String,

  /// Values of the reference fields, in the same order as
  /// [`Template::reference_fields()`].
  pub reference_values: Vec<String>,

  /// Replacement values, in the same order as [`Template::update_fields()`].
  pub update_values: Vec<String>,
}

/// An editable table of replacement values with one row per primary key.
///
/// Its columns are the reference fields followed by one update column per
/// update field, named with [`update_column_name()`].
///
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
  pub(crate) reference_fields: Vec<DataElementTag>,
  pub(crate) update_fields: Vec<DataElementTag>,
  pub(crate) rows: Vec<TemplateRow>,
}

/// A column in a template.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateColumn {
  Reference(usize),
  Update(usize),
}

/// Builds a template from extracted metadata rows. The reference fields should
/// list the key fields first, followed by any other fields shown for
/// reference.
///
/// Rows are deduplicated by primary key with the first occurrence kept, so
/// files that share a primary key also share replacement values.
///
pub fn build_template(
  rows: &[MetadataRow],
  reference_fields: &[DataElementTag],
  update_fields: &[UpdateField],
) -> Template {
  let mut seen_primary_keys = HashSet::new();
  let mut template_rows = vec![];

  for row in rows {
    if !seen_primary_keys.insert(row.primary_key.as_str()) {
      continue;
    }

    template_rows.push(TemplateRow {
      primary_key: row.primary_key.clone(),
      reference_values: reference_fields
        .iter()
        .map(|tag| row.value(*tag).to_string())
        .collect(),
      update_values: update_fields
        .iter()
        .map(|field| field.rule.apply(row.value(field.tag)))
        .collect(),
    });
  }

  Template {
    reference_fields: reference_fields.to_vec(),
    update_fields: update_fields.iter().map(|field| field.tag).collect(),
    rows: template_rows,
  }
}

impl Template {
  pub fn reference_fields(&self) -> &[DataElementTag] {
    &self.reference_fields
  }

  pub fn update_fields(&self) -> &[DataElementTag] {
    &self.update_fields
  }

  pub fn rows(&self) -> &[TemplateRow] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Returns the names of the template's reference columns.
  ///
  pub fn reference_column_names(&self) -> Vec<String> {
    self
      .reference_fields
      .iter()
      .map(|tag| dictionary::keyword_or_hex(*tag))
      .collect()
  }

  /// Returns the names of the template's update columns.
  ///
  pub fn update_column_names(&self) -> Vec<String> {
    self
      .update_fields
      .iter()
      .map(|tag| update_column_name(*tag))
      .collect()
  }

  /// Returns the names of all the template's columns, in order.
  ///
  pub fn column_names(&self) -> Vec<String> {
    let mut names = self.reference_column_names();
    names.extend(self.update_column_names());
    names
  }

  /// Looks up a column by name.
  ///
  pub fn column(&self, name: &str) -> Option<TemplateColumn> {
    if let Some(index) = self
      .reference_column_names()
      .iter()
      .position(|column| column == name)
    {
      return Some(TemplateColumn::Reference(index));
    }

    self
      .update_column_names()
      .iter()
      .position(|column| column == name)
      .map(TemplateColumn::Update)
  }

  /// Returns the row for a primary key.
  ///
  pub fn row(&self, primary_key: &str) -> Option<&TemplateRow> {
    self.rows.iter().find(|row| row.primary_key == primary_key)
  }

  /// Returns the replacement value for each update field in the row for a
  /// primary key.
  ///
  pub fn overrides(
    &self,
    primary_key: &str,
  ) -> Option<Vec<(DataElementTag, &str)>> {
    let row = self.row(primary_key)?;

    Some(
      self
        .update_fields
        .iter()
        .copied()
        .zip(row.update_values.iter().map(|value| value.as_str()))
        .collect(),
    )
  }

  /// Writes the template as CSV with a header row.
  ///
  pub fn write_csv(&self, stream: impl Write) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(stream);

    writer
      .write_record(self.column_names())
      .map_err(TableError::CsvError)?;

    for row in self.rows.iter() {
      writer
        .write_record(row.reference_values.iter().chain(&row.update_values))
        .map_err(TableError::CsvError)?;
    }

    writer.flush().map_err(TableError::IoError)
  }
}

impl TemplateRow {
  /// Returns the value in the given column of this row.
  ///
  pub fn value(&self, column: TemplateColumn) -> Option<&str> {
    let value = match column {
      TemplateColumn::Reference(index) => self.reference_values.get(index),
      TemplateColumn::Update(index) => self.update_values.get(index),
    };

    value.map(|value| value.as_str())
  }
}
