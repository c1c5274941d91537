//! Defines a trait implemented by all error types in DCMdeid.

use std::io::Write;

use owo_colors::{OwoColorize, Stream::Stderr};

/// Error trait implemented by all error types in DCMdeid.
///
pub trait DcmdeidError {
  /// Returns lines of text that describe an error in a human-readable format.
  /// The task description says what was being done when the error occurred,
  /// e.g. `"anonymizing \"scan.json\""`.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String>;

  /// Prints details on the error to stderr.
  ///
  fn print(&self, task_description: &str) {
    print_error_lines(&self.to_lines(task_description));
  }
}

/// Prints lines of error information to stderr, in red when stderr supports
/// color. Stdout is flushed first so the error lines don't interleave with any
/// buffered progress output.
///
pub fn print_error_lines(lines: &[String]) {
  let _ = std::io::stdout().flush();
  let _ = std::io::stderr().flush();

  eprintln!();
  eprintln!("{}", "-----".if_supports_color(Stderr, |text| text.red()));

  for line in lines {
    eprintln!("{}", line.if_supports_color(Stderr, |text| text.red()));
  }

  eprintln!();
}

/// Prints a single warning line to stderr, prefixed with `"Warning: "` and in
/// yellow when stderr supports color. Warnings report problems that don't stop
/// the current operation, such as a file that couldn't be read during a scan.
///
pub fn print_warning(message: &str) {
  let _ = std::io::stdout().flush();

  let line = format!("Warning: {message}");
  eprintln!("{}", line.if_supports_color(Stderr, |text| text.yellow()));
}
