//! Entry point for DCMdeid's CLI tool.

mod args;
mod commands;
mod utils;

use clap::{Parser, Subcommand};

use commands::{anonymize_command, default_config_command, template_command};

#[derive(Parser)]
#[command(
  name = "dcmdeid",
  bin_name = "dcmdeid",
  version = env!("CARGO_PKG_VERSION"),
  about = "DCMdeid is a CLI tool for de-identifying directories of DICOM JSON \
    records",
  max_term_width = 80
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  #[arg(
    long,
    default_value_t = false,
    help = "Write timing and memory stats to stderr on exit"
  )]
  print_stats: bool,
}

#[derive(Subcommand)]
enum Commands {
  #[command(about = template_command::ABOUT)]
  Template(template_command::TemplateArgs),

  #[command(about = anonymize_command::ABOUT)]
  Anonymize(anonymize_command::AnonymizeArgs),

  #[command(about = default_config_command::ABOUT)]
  DefaultConfig(default_config_command::DefaultConfigArgs),
}

fn main() -> Result<(), ()> {
  let cli = Cli::parse();

  let started_at = std::time::Instant::now();

  let r = match cli.command {
    Commands::Template(args) => template_command::run(&args),
    Commands::Anonymize(args) => anonymize_command::run(&args),
    Commands::DefaultConfig(args) => default_config_command::run(&args),
  };

  if cli.print_stats {
    #[cfg(not(windows))]
    let peak_memory_mb = get_peak_memory_usage() as f64 / (1024.0 * 1024.0);

    eprintln!();
    eprintln!("-----");
    eprintln!(
      "Time elapsed:      {:.2} seconds",
      started_at.elapsed().as_secs_f64()
    );

    #[cfg(not(windows))]
    eprintln!("Peak memory usage: {:.0} MiB", peak_memory_mb);
  }

  r
}

#[cfg(not(windows))]
fn get_peak_memory_usage() -> i64 {
  let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
  unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };

  #[allow(clippy::unnecessary_cast)]
  let mut max = usage.ru_maxrss as i64;

  // On Linux, ru_maxrss is in KiB
  if std::env::consts::OS == "linux" {
    max *= 1024;
  }

  max
}
