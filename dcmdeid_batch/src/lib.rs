//! Batch de-identification of a directory tree of records.
//!
//! A batch runs in stages:
//!
//! 1. [`scan_directory()`] finds the files to process.
//! 2. [`extract_metadata()`] reads each file's identifying fields.
//! 3. [`build_template()`] creates one row of replacement values per primary
//!    key, which can be exported for an operator to edit and then merged back
//!    in with [`Template::merge_overrides()`].
//! 4. [`AnonymizationDriver`] applies the tag policy and the template's
//!    replacement values to every file and writes the results.

mod config;
mod driver;
mod file_error;
mod metadata;
mod override_table;
mod reconcile;
mod record_codec;
mod scan;
mod template;

pub use config::{
  ConfigError, DeidConfig, ResolvedConfig, UpdateFieldConfig,
  UpdateRuleConfig,
};
pub use driver::{AnonymizationDriver, BatchReport, write_record};
pub use file_error::{FileError, FileFailure};
pub use metadata::{
  ExtractedMetadata, MetadataRow, OUTPUT_DIRECTORY_SUFFIX, extract_metadata,
  output_path, primary_key,
};
pub use override_table::{OverrideTable, TableError};
pub use reconcile::{MergeOutcome, OverrideSchemaError};
pub use record_codec::{JsonRecordCodec, RecordCodec, RecordIoError};
pub use scan::{ScanError, scan_directory};
pub use template::{
  Template, TemplateColumn, TemplateRow, UPDATE_COLUMN_PREFIX, UpdateField,
  UpdateRule, build_template, update_column_name,
};
