//! GitHub Actions workflow-command channel.
//!
//! Logs are written to stdout as `::command::data` lines. Exported variables
//! are appended to the file named by `GITHUB_ENV`, or emitted with the legacy
//! `::set-env` command when that file is not available.

use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use super::OutputChannel;

/// Channel speaking the GitHub Actions workflow-command protocol.
pub struct GithubActions<W: Write = Stdout> {
  out: W,
  env_file: Option<PathBuf>,
}

impl GithubActions<Stdout> {
  /// Channel writing to stdout, exporting through `$GITHUB_ENV` when set.
  pub fn from_env() -> Self {
    let env_file = std::env::var_os("GITHUB_ENV")
      .filter(|v| !v.is_empty())
      .map(PathBuf::from);
    Self::new(io::stdout(), env_file)
  }
}

impl<W: Write> GithubActions<W> {
  pub fn new(out: W, env_file: Option<PathBuf>) -> Self {
    Self { out, env_file }
  }

  #[cfg(test)]
  fn env_file(&self) -> Option<&Path> {
    self.env_file.as_deref()
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  fn line(&mut self, line: &str) {
    if let Err(e) = writeln!(self.out, "{}", line) {
      warn!(error = %e, "failed to write workflow command");
    }
  }

  fn command(&mut self, command: &str, message: &str) {
    let line = format!("::{}::{}", command, escape_data(message));
    self.line(&line);
  }
}

impl<W: Write> OutputChannel for GithubActions<W> {
  fn info(&mut self, message: &str) {
    self.line(message);
  }

  fn debug(&mut self, message: &str) {
    self.command("debug", message);
  }

  fn warning(&mut self, message: &str) {
    self.command("warning", message);
  }

  fn export_variable(&mut self, name: &str, value: &str) -> io::Result<()> {
    match self.env_file.clone() {
      Some(path) => append_env_file(&path, name, value),
      None => {
        let line = format!(
          "::set-env name={}::{}",
          escape_property(name),
          escape_data(value)
        );
        self.line(&line);
        Ok(())
      }
    }
  }

  fn set_failed(&mut self, message: &str) {
    self.command("error", message);
  }
}

/// Append `name=value` to an Actions environment file.
///
/// Multi-line values use the `name<<delimiter` heredoc form.
fn append_env_file(path: &Path, name: &str, value: &str) -> io::Result<()> {
  let entry = if value.contains('\n') || value.contains('\r') {
    let delimiter = heredoc_delimiter(value);
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
  } else {
    format!("{}={}\n", name, value)
  };

  let mut file = OpenOptions::new().create(true).append(true).open(path)?;
  file.write_all(entry.as_bytes())
}

fn heredoc_delimiter(value: &str) -> String {
  loop {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    if !value.contains(&delimiter) {
      return delimiter;
    }
  }
}

fn escape_data(data: &str) -> String {
  data
    .replace('%', "%25")
    .replace('\r', "%0D")
    .replace('\n', "%0A")
}

fn escape_property(prop: &str) -> String {
  escape_data(prop).replace(':', "%3A").replace(',', "%2C")
}
