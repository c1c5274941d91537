//! Tables of replacement values supplied by an operator, usually an edited
//! copy of an exported template.

use std::io::Read;
use std::path::Path;

use dcmdeid_core::DcmdeidError;

/// An error that occurred reading or writing a CSV table.
///
#[derive(Debug)]
pub enum TableError {
  CsvError(csv::Error),
  IoError(std::io::Error),
}

impl core::fmt::Display for TableError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      TableError::CsvError(e) => write!(f, "CSV error: {}", e),
      TableError::IoError(e) => write!(f, "I/O error: {}", e),
    }
  }
}

impl std::error::Error for TableError {}

impl DcmdeidError for TableError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Table error {}", task_description),
      "".to_string(),
      format!("  Error: {}", self),
    ]
  }
}

/// A table of strings with a header row. Every row has one value per header.
///
#[derive(Clone, Debug, PartialEq)]
pub struct OverrideTable {
  headers: Vec<String>,
  rows: Vec<Vec<String>>,
}

impl OverrideTable {
  /// Creates a new override table. Rows shorter than the header row are padded
  /// with empty strings, and longer rows are truncated.
  ///
  pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
    let rows = rows
      .into_iter()
      .map(|mut row| {
        row.resize(headers.len(), "".to_string());
        row
      })
      .collect();

    Self { headers, rows }
  }

  /// Reads an override table from CSV. The first record is the header row.
  ///
  pub fn from_csv(stream: impl Read) -> Result<Self, TableError> {
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(true)
      .trim(csv::Trim::Headers)
      .from_reader(stream);

    let headers = reader
      .headers()
      .map_err(TableError::CsvError)?
      .iter()
      .enumerate()
      .map(|(i, header)| {
        // Spreadsheet applications commonly save CSVs with a byte order mark
        if i == 0 {
          header.trim_start_matches('\u{feff}').to_string()
        } else {
          header.to_string()
        }
      })
      .collect();

    let mut rows = vec![];
    for record in reader.records() {
      let record = record.map_err(TableError::CsvError)?;
      rows.push(record.iter().map(|value| value.to_string()).collect());
    }

    Ok(Self { headers, rows })
  }

  /// Reads an override table from a CSV file.
  ///
  pub fn from_csv_file(path: &Path) -> Result<Self, TableError> {
    let file = std::fs::File::open(path).map_err(TableError::IoError)?;

    Self::from_csv(std::io::BufReader::new(file))
  }

  pub fn headers(&self) -> &[String] {
    &self.headers
  }

  pub fn rows(&self) -> &[Vec<String>] {
    &self.rows
  }

  /// Returns the index of the column with the given name.
  ///
  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|header| header == name)
  }

  /// Returns every value in the column with the given name.
  ///
  pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
    let index = self.column_index(name)?;

    Some(self.rows.iter().map(|row| row[index].as_str()).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_csv_test() {
    let csv = "\u{feff}PatientID, Update_PatientID\n\
               MRN-001,A\n\
               \"MRN,002\",\n";

    let table = OverrideTable::from_csv(csv.as_bytes()).unwrap();

    assert_eq!(table.headers(), &["PatientID", "Update_PatientID"]);
    assert_eq!(
      table.rows(),
      &[vec!["MRN-001", "A"], vec!["MRN,002", ""]]
    );
    assert_eq!(table.column_index("Update_PatientID"), Some(1));
    assert_eq!(
      table.column_values("PatientID"),
      Some(vec!["MRN-001", "MRN,002"])
    );
    assert_eq!(table.column_values("PatientName"), None);
  }

  #[test]
  fn from_csv_ragged_rows_test() {
    let csv = "PatientID,Update_PatientID\nMRN-001\n";

    assert!(matches!(
      OverrideTable::from_csv(csv.as_bytes()),
      Err(TableError::CsvError(_))
    ));
  }

  #[test]
  fn new_pads_rows_test() {
    let table = OverrideTable::new(
      vec!["A".to_string(), "B".to_string()],
      vec![vec!["1".to_string()]],
    );

    assert_eq!(table.rows(), &[vec!["1", ""]]);
  }
}
