use std::path::PathBuf;

use clap::Args;

use dcmdeid::batch::*;
use dcmdeid::core::{DcmdeidError, print_warning};

use crate::{args::BatchArgs, utils};

pub const ABOUT: &str = "De-identifies the records in a directory, writing \
  the results to a new directory";

#[derive(Args)]
pub struct AnonymizeArgs {
  #[command(flatten)]
  batch: BatchArgs,

  #[arg(
    long,
    help_heading = "Input",
    help = "A CSV file of replacement values, usually an edited template \
      created by the template command. It must have the join column and every \
      'Update_' column. Its rows are matched to the template's rows by the \
      join column, and rows that leave an 'Update_' column empty are ignored."
  )]
  overrides: Option<PathBuf>,

  #[arg(
    long,
    help_heading = "Output",
    help = "Write into the output directory even if it already exists. \
      Existing files in it are overwritten.",
    default_value_t = false
  )]
  overwrite: bool,

  #[arg(
    long,
    short,
    help_heading = "Output",
    help = "Don't print a line for each file as it is de-identified.",
    default_value_t = false
  )]
  quiet: bool,
}

pub fn run(args: &AnonymizeArgs) -> Result<(), ()> {
  let thread_pool = utils::create_thread_pool(args.batch.threads)?;
  let mut batch = utils::load_batch(&args.batch, &thread_pool)?;

  let mut unmatched_count = 0;

  if let Some(overrides) = &args.overrides {
    let task_description = format!("reading \"{}\"", overrides.display());

    let table = OverrideTable::from_csv_file(overrides)
      .map_err(|e| e.print(&task_description))?;

    let outcome = batch
      .template
      .merge_overrides(
        &table,
        &batch.config.join_column,
        &batch.config.update_column_names(),
      )
      .map_err(|e| e.print(&format!("merging \"{}\"", overrides.display())))?;

    for join_value in outcome.incomplete_rows.iter() {
      print_warning(&format!(
        "Ignoring override row for {} \"{}\" because it has empty update \
         values",
        batch.config.join_column, join_value
      ));
    }

    for join_value in outcome.unmatched.iter() {
      print_warning(&format!(
        "{} \"{}\" was not found in the overrides, its default replacement \
         values will be used",
        batch.config.join_column, join_value
      ));
    }

    for join_value in outcome.ambiguous.iter() {
      print_warning(&format!(
        "{} \"{}\" is on more than one template or override row, only the \
         first template row with it receives the last override row's values",
        batch.config.join_column, join_value
      ));
    }

    unmatched_count = outcome.unmatched.len();
  }

  let output_directory =
    path_with_suffix(&batch.root, OUTPUT_DIRECTORY_SUFFIX);
  if !args.overwrite {
    utils::error_if_exists(&output_directory);
  }

  let codec = JsonRecordCodec::default();
  let driver = AnonymizationDriver::new(&codec, &batch.config.tag_policy)
    .with_remove_private_tags(batch.config.remove_private_tags);

  let on_file = |row: &MetadataRow| {
    if !args.quiet {
      println!(
        "Anonymizing \"{}\" => \"{}\" …",
        row.path.display(),
        row.output_path.display()
      );
    }
  };

  let report = thread_pool.install(|| {
    driver.run(&batch.extracted.rows, &batch.template, &on_file)
  });

  for failure in report.failures.iter() {
    failure.print("anonymizing");
  }

  let failed_count = batch.extracted.failures.len() + report.failures.len();

  let mut table = utils::create_table(&["Summary", "Value"]);
  table.add_row(["Files found".to_string(), batch.file_count.to_string()]);
  table.add_row([
    "Files anonymized".to_string(),
    report.written.len().to_string(),
  ]);
  table.add_row(["Files failed".to_string(), failed_count.to_string()]);
  table
    .add_row(["Template rows".to_string(), batch.template.len().to_string()]);
  table.add_row([
    "Unmatched identifiers".to_string(),
    unmatched_count.to_string(),
  ]);
  table.add_row([
    "Output directory".to_string(),
    output_directory.display().to_string(),
  ]);
  eprintln!("{table}");

  if failed_count > 0 { Err(()) } else { Ok(()) }
}

/// Appends a suffix to the final component of a path.
///
fn path_with_suffix(path: &std::path::Path, suffix: &str) -> PathBuf {
  let mut path = path.to_path_buf();

  path.set_file_name(format!(
    "{}{}",
    path
      .file_name()
      .unwrap_or(std::ffi::OsStr::new(""))
      .to_string_lossy(),
    suffix
  ));

  path
}
