//! CLI output formatting utilities.
//!
//! Provides the console output channel used outside of CI, host selection,
//! and consistent colored status messages.

use std::time::Duration;

use anyhow::Context;
use bundlever_lib::host::{GithubActions, OutputChannel};
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Which host the step reports to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HostKind {
  /// GitHub Actions when `GITHUB_ACTIONS=true`, console otherwise.
  #[default]
  Auto,
  Github,
  Console,
}

impl HostKind {
  /// Resolve `Auto` against the current environment.
  pub fn resolve(self) -> Self {
    match self {
      HostKind::Auto if running_in_github_actions() => HostKind::Github,
      HostKind::Auto => HostKind::Console,
      other => other,
    }
  }

  /// Build the channel for this host.
  ///
  /// With JSON output the console keeps stdout for the JSON document and
  /// sends the step log and exports to stderr.
  pub fn channel(self, verbose: bool, format: OutputFormat) -> Box<dyn OutputChannel> {
    match self.resolve() {
      HostKind::Github => Box::new(GithubActions::from_env()),
      _ => Box::new(Console::new(verbose, format.is_json())),
    }
  }
}

fn running_in_github_actions() -> bool {
  std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
}

/// Console channel for local runs.
///
/// Exports are printed as `NAME=value` so they can be sourced by a shell.
pub struct Console {
  verbose: bool,
  log_to_stderr: bool,
}

impl Console {
  pub fn new(verbose: bool, log_to_stderr: bool) -> Self {
    Self { verbose, log_to_stderr }
  }

  fn line(&self, line: &str) {
    if self.log_to_stderr {
      eprintln!("{}", line);
    } else {
      println!("{}", line);
    }
  }
}

impl OutputChannel for Console {
  fn info(&mut self, message: &str) {
    self.line(message);
  }

  fn debug(&mut self, message: &str) {
    if self.verbose {
      eprintln!("{}", message.if_supports_color(Stream::Stderr, |s| s.dimmed()));
    }
  }

  fn warning(&mut self, message: &str) {
    print_warning(message);
  }

  fn export_variable(&mut self, name: &str, value: &str) -> std::io::Result<()> {
    self.line(&format!("{}={}", name, value));
    Ok(())
  }

  fn set_failed(&mut self, message: &str) {
    print_error(message);
  }
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {} {}: {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
