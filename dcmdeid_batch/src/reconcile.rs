//! Merging an operator's override table back into a template.

use std::collections::HashSet;

use dcmdeid_core::DcmdeidError;

use crate::{OverrideTable, Template, TemplateColumn, UPDATE_COLUMN_PREFIX};

/// An error that stops an override table being merged into a template. When
/// one of these occurs the template is left unmodified.
///
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideSchemaError {
  /// The override table has no join column.
  MissingJoinColumn { column: String },

  /// The override table is missing one of the update columns.
  MissingUpdateColumn { column: String },

  /// The template has no join column, which means the join column isn't one
  /// of the configured reference fields.
  TemplateMissingJoinColumn { column: String },

  /// The template is missing one of the update columns being merged.
  TemplateMissingUpdateColumn { column: String },
}

impl core::fmt::Display for OverrideSchemaError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::MissingJoinColumn { column } => {
        write!(f, "Override table has no '{}' column", column)
      }
      Self::MissingUpdateColumn { column } => {
        write!(f, "Override table has no '{}' column", column)
      }
      Self::TemplateMissingJoinColumn { column } => {
        write!(f, "Template has no '{}' join column", column)
      }
      Self::TemplateMissingUpdateColumn { column } => {
        write!(f, "Template has no '{}' column", column)
      }
    }
  }
}

impl std::error::Error for OverrideSchemaError {}

impl DcmdeidError for OverrideSchemaError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Override table error {}", task_description),
      "".to_string(),
      format!("  Details: {}", self),
    ]
  }
}

/// The result of a successful merge.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
  /// Template join values not found in the override table, unique and in
  /// template order.
  pub unmatched: Vec<String>,

  /// Join values of override rows that were skipped because they left an
  /// update column empty.
  pub incomplete_rows: Vec<String>,

  /// Join values shared by more than one template row or by more than one
  /// override row, unique and with template values first. Only the first
  /// template row with such a value receives overrides, and a later override
  /// row replaces the values of an earlier one.
  pub ambiguous: Vec<String>,
}

impl Template {
  /// Merges an override table into this template.
  ///
  /// Each override row replaces the update columns of the first template row
  /// whose join column has the same value. Override rows with no matching
  /// template row are ignored, and override rows with an empty value in any
  /// update column are skipped and listed in
  /// [`MergeOutcome::incomplete_rows`].
  ///
  /// Template join values that appear in neither the override table's join
  /// column nor its `Update_<join column>` column are listed in
  /// [`MergeOutcome::unmatched`]. Join values that don't identify a single
  /// template row or a single override row are listed in
  /// [`MergeOutcome::ambiguous`].
  ///
  pub fn merge_overrides(
    &mut self,
    table: &OverrideTable,
    join_column: &str,
    update_columns: &[String],
  ) -> Result<MergeOutcome, OverrideSchemaError> {
    let Some(table_join_index) = table.column_index(join_column) else {
      return Err(OverrideSchemaError::MissingJoinColumn {
        column: join_column.to_string(),
      });
    };

    let mut table_update_indices = Vec::with_capacity(update_columns.len());
    for column in update_columns {
      let Some(index) = table.column_index(column) else {
        return Err(OverrideSchemaError::MissingUpdateColumn {
          column: column.clone(),
        });
      };

      table_update_indices.push(index);
    }

    let Some(TemplateColumn::Reference(template_join_index)) =
      self.column(join_column)
    else {
      return Err(OverrideSchemaError::TemplateMissingJoinColumn {
        column: join_column.to_string(),
      });
    };

    let mut template_update_indices = Vec::with_capacity(update_columns.len());
    for column in update_columns {
      let Some(TemplateColumn::Update(index)) = self.column(column) else {
        return Err(OverrideSchemaError::TemplateMissingUpdateColumn {
          column: column.clone(),
        });
      };

      template_update_indices.push(index);
    }

    let mut outcome = MergeOutcome {
      ambiguous: self.ambiguous_join_values(
        table,
        table_join_index,
        template_join_index,
      ),
      ..Default::default()
    };

    for override_row in table.rows() {
      let join_value = override_row[table_join_index].as_str();

      if table_update_indices
        .iter()
        .any(|index| override_row[*index].is_empty())
      {
        outcome.incomplete_rows.push(join_value.to_string());
        continue;
      }

      let Some(template_row) = self.rows.iter_mut().find(|row| {
        row.reference_values[template_join_index].as_str() == join_value
      }) else {
        continue;
      };

      for (table_index, template_index) in
        table_update_indices.iter().zip(template_update_indices.iter())
      {
        template_row.update_values[*template_index] =
          override_row[*table_index].clone();
      }
    }

    outcome.unmatched = self.unmatched_join_values(
      table,
      join_column,
      template_join_index,
    );

    Ok(outcome)
  }

  fn ambiguous_join_values(
    &self,
    table: &OverrideTable,
    table_join_index: usize,
    template_join_index: usize,
  ) -> Vec<String> {
    let template_values = self
      .rows
      .iter()
      .map(|row| row.reference_values[template_join_index].as_str());
    let table_values = table
      .rows()
      .iter()
      .map(|row| row[table_join_index].as_str());

    let mut ambiguous = repeated_values(template_values);
    for value in repeated_values(table_values) {
      if !ambiguous.contains(&value) {
        ambiguous.push(value);
      }
    }

    ambiguous
  }

  fn unmatched_join_values(
    &self,
    table: &OverrideTable,
    join_column: &str,
    template_join_index: usize,
  ) -> Vec<String> {
    let mut known_values: HashSet<&str> = HashSet::new();

    let update_join_column = format!("{}{}", UPDATE_COLUMN_PREFIX, join_column);
    for column in [join_column, update_join_column.as_str()] {
      if let Some(values) = table.column_values(column) {
        known_values.extend(values);
      }
    }

    let mut unmatched: Vec<String> = vec![];

    for row in self.rows.iter() {
      let value = row.reference_values[template_join_index].as_str();
      if !known_values.contains(value) && !unmatched.iter().any(|u| u == value)
      {
        unmatched.push(value.to_string());
      }
    }

    unmatched
  }
}

/// Returns the values that occur more than once, in order of first
/// occurrence.
///
fn repeated_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut repeated: Vec<String> = vec![];

  for value in values {
    if !seen.insert(value) && !repeated.iter().any(|r| r == value) {
      repeated.push(value.to_string());
    }
  }

  repeated
}
