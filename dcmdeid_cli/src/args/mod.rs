use std::path::PathBuf;

use clap::Args;

/// Arguments shared by the commands that process a directory of records.
///
#[derive(Args, Debug)]
pub struct BatchArgs {
  #[arg(
    help_heading = "Input",
    help = "The directory to recursively search for records. De-identified \
      records are written to a sibling directory with '-Anonymized' appended \
      to its name."
  )]
  pub directory: PathBuf,

  #[arg(
    long,
    short,
    help_heading = "Input",
    help = "A JSON file containing the de-identification config. Settings not \
      specified in the file take their default values. Run `dcmdeid \
      default-config` to see the defaults."
  )]
  pub config: Option<PathBuf>,

  #[arg(
    long,
    short,
    help_heading = "Input",
    help = "Extension that a file must have in order to be processed. This \
      overrides the extension in the config. The extension check is not case \
      sensitive."
  )]
  pub extension: Option<String>,

  #[arg(
    long,
    help = "The number of threads to use to perform work.",
    default_value_t = rayon::current_num_threads()
  )]
  pub threads: usize,
}
