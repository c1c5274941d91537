use std::path::PathBuf;

use clap::Args;

use dcmdeid::batch::DeidConfig;
use dcmdeid::core::DcmdeidError;

use crate::utils;

pub const ABOUT: &str = "Prints the default de-identification config as JSON, \
  for use as a starting point with --config";

#[derive(Args)]
pub struct DefaultConfigArgs {
  #[arg(
    long,
    short,
    help = "The name of the file to write the config to. If not specified \
      then the config is written to stdout."
  )]
  output_filename: Option<PathBuf>,

  #[arg(
    long,
    help = "Overwrite the output file if it already exists.",
    default_value_t = false
  )]
  overwrite: bool,
}

pub fn run(args: &DefaultConfigArgs) -> Result<(), ()> {
  let json = DeidConfig::default()
    .to_json()
    .map_err(|e| e.print("serializing the default config"))?;

  match &args.output_filename {
    Some(output_filename) => {
      if !args.overwrite {
        utils::error_if_exists(output_filename);
      }

      std::fs::write(output_filename, format!("{json}\n")).map_err(|e| {
        utils::print_error(&format!(
          "Failed writing \"{}\": {}",
          output_filename.display(),
          e
        ))
      })
    }

    None => {
      println!("{json}");
      Ok(())
    }
  }
}
