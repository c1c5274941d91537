use std::io::Write;
use std::path::{Path, PathBuf};

use owo_colors::{OwoColorize, Stream::Stderr};

use dcmdeid::batch::*;
use dcmdeid::core::{DcmdeidError, print_warning};

use crate::args::BatchArgs;

/// Creates a Rayon thread pool with the specified number of threads.
///
pub fn create_thread_pool(threads: usize) -> Result<rayon::ThreadPool, ()> {
  rayon::ThreadPoolBuilder::new()
    .num_threads(threads)
    .build()
    .map_err(|e| print_error(&format!("Failed creating thread pool: {e}")))
}

/// Prints a single line error message to stderr, in red when stderr supports
/// color.
///
pub fn print_error(message: &str) {
  let _ = std::io::stdout().flush();

  let line = format!("Error: {message}");
  eprintln!("{}", line.if_supports_color(Stderr, |text| text.red()));
}

/// Prints an error and exits the process if the specified path exists.
///
pub fn error_if_exists(path: &Path) {
  if !path.exists() {
    return;
  }

  print_error(&format!(
    "Output \"{}\" already exists. Specify --overwrite to automatically \
     overwrite existing files",
    path.display()
  ));
  std::process::exit(1);
}

/// A directory of records that has been scanned and had its metadata
/// extracted and built into a template.
///
pub struct Batch {
  pub root: PathBuf,
  pub config: ResolvedConfig,
  pub file_count: usize,
  pub extracted: ExtractedMetadata,
  pub template: Template,
}

/// Loads the config for a batch, scans its directory, extracts metadata from
/// every file on the given thread pool, and builds the template. Files that
/// fail extraction are reported as warnings and left out of the batch.
///
pub fn load_batch(
  args: &BatchArgs,
  thread_pool: &rayon::ThreadPool,
) -> Result<Batch, ()> {
  let config = load_config(args)?;

  let root = std::fs::canonicalize(&args.directory).map_err(|e| {
    print_error(&format!(
      "Unable to open directory \"{}\": {}",
      args.directory.display(),
      e
    ))
  })?;

  if !root.is_dir() {
    print_error(&format!("\"{}\" is not a directory", root.display()));
    return Err(());
  }

  let paths = scan_directory(&root, &config.extension)
    .map_err(|e| e.print(&format!("scanning \"{}\"", root.display())))?;

  let codec = JsonRecordCodec::default();

  let extracted = thread_pool.install(|| {
    extract_metadata(
      &codec,
      &root,
      &paths,
      &config.template_fields,
      &config.key_fields,
    )
  });

  for failure in extracted.failures.iter() {
    print_warning(&format!(
      "Skipping \"{}\": {}",
      failure.path.display(),
      failure.error
    ));
  }

  let template = build_template(
    &extracted.rows,
    &config.template_fields,
    &config.update_fields,
  );

  Ok(Batch {
    root,
    config,
    file_count: paths.len(),
    extracted,
    template,
  })
}

fn load_config(args: &BatchArgs) -> Result<ResolvedConfig, ()> {
  let config = match &args.config {
    Some(path) => DeidConfig::from_file(path)
      .map_err(|e| e.print(&format!("reading \"{}\"", path.display())))?,
    None => DeidConfig::default(),
  };

  let mut config = config
    .resolve()
    .map_err(|e| e.print("resolving config"))?;

  if let Some(extension) = &args.extension {
    config.extension = extension.clone();
  }

  Ok(config)
}

/// Creates a two column table for printing a summary.
///
pub fn create_table(header: &[&str]) -> comfy_table::Table {
  use comfy_table::{
    Attribute, Cell, CellAlignment, Table, presets::UTF8_FULL,
  };

  let mut table = Table::new();
  table.load_preset(UTF8_FULL);

  table.set_header(
    header
      .iter()
      .map(|text| Cell::new(text).add_attribute(Attribute::Bold))
      .collect::<Vec<_>>(),
  );

  if let Some(column) = table.column_mut(1) {
    column.set_cell_alignment(CellAlignment::Right);
  }

  table
}
