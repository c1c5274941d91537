use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use dcmdeid::batch::*;
use dcmdeid::core::DcmdeidError;

use crate::{args::BatchArgs, utils};

pub const ABOUT: &str = "Builds a CSV template of replacement values for the \
  records in a directory";

#[derive(Args)]
pub struct TemplateArgs {
  #[command(flatten)]
  batch: BatchArgs,

  #[arg(
    long,
    short,
    help_heading = "Output",
    help = "The name of the CSV file to write the template to. Specify '-' to \
      write to stdout.\n\
      \n\
      The template has one row per distinct primary key. Edit the values in \
      its 'Update_' columns and pass it to the anonymize command with \
      --overrides.",
    default_value = "-"
  )]
  output_filename: PathBuf,

  #[arg(
    long,
    help_heading = "Output",
    help = "Overwrite the output file if it already exists.",
    default_value_t = false
  )]
  overwrite: bool,
}

pub fn run(args: &TemplateArgs) -> Result<(), ()> {
  let writing_to_stdout = args.output_filename == PathBuf::from("-");

  if !writing_to_stdout && !args.overwrite {
    utils::error_if_exists(&args.output_filename);
  }

  let thread_pool = utils::create_thread_pool(args.batch.threads)?;
  let batch = utils::load_batch(&args.batch, &thread_pool)?;

  let task_description =
    format!("writing template \"{}\"", args.output_filename.display());

  if writing_to_stdout {
    batch
      .template
      .write_csv(std::io::stdout().lock())
      .map_err(|e| e.print(&task_description))?;
  } else {
    let file = std::fs::File::create(&args.output_filename).map_err(|e| {
      TableError::IoError(e).print(&task_description);
    })?;

    let mut stream = std::io::BufWriter::new(file);
    batch
      .template
      .write_csv(&mut stream)
      .map_err(|e| e.print(&task_description))?;
    stream
      .flush()
      .map_err(|e| TableError::IoError(e).print(&task_description))?;
  }

  let mut table = utils::create_table(&["Summary", "Value"]);
  table.add_row(["Directory".to_string(), batch.root.display().to_string()]);
  table.add_row(["Files found".to_string(), batch.file_count.to_string()]);
  table.add_row([
    "Files skipped".to_string(),
    batch.extracted.failures.len().to_string(),
  ]);
  table
    .add_row(["Template rows".to_string(), batch.template.len().to_string()]);
  eprintln!("{table}");

  Ok(())
}
