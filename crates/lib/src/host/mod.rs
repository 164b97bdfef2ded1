//! Output channels for CI hosts.
//!
//! The updater never prints or touches process-wide state directly. Every
//! user-visible line, exported variable and failure goes through an
//! [`OutputChannel`], which the caller wires to the real host:
//! - [`GithubActions`] speaks the runner's workflow-command protocol
//! - [`CapturedOutput`] records everything in memory

mod github;

pub use github::GithubActions;

/// Sink for step logs, exported variables and failure reports.
pub trait OutputChannel {
  /// Informational line shown in the step log.
  fn info(&mut self, message: &str);

  /// Line only shown when step debugging is enabled.
  fn debug(&mut self, message: &str);

  fn warning(&mut self, message: &str);

  /// Make `name=value` visible to later steps of the job.
  ///
  /// # Errors
  ///
  /// Returns an error if the host's environment file cannot be written.
  fn export_variable(&mut self, name: &str, value: &str) -> std::io::Result<()>;

  /// Report the step as failed with `message`.
  fn set_failed(&mut self, message: &str);
}

/// A single call recorded by [`CapturedOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
  Info(String),
  Debug(String),
  Warning(String),
  Export { name: String, value: String },
  Failed(String),
}

/// In-memory channel, used by tests and when embedding the updater.
#[derive(Debug, Default)]
pub struct CapturedOutput {
  pub events: Vec<HostEvent>,
}

impl CapturedOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Value of the last export of `name`, if any.
  pub fn exported(&self, name: &str) -> Option<&str> {
    self.events.iter().rev().find_map(|event| match event {
      HostEvent::Export { name: n, value } if n == name => Some(value.as_str()),
      _ => None,
    })
  }

  pub fn infos(&self) -> impl Iterator<Item = &str> {
    self.events.iter().filter_map(|event| match event {
      HostEvent::Info(message) => Some(message.as_str()),
      _ => None,
    })
  }
}

impl OutputChannel for CapturedOutput {
  fn info(&mut self, message: &str) {
    self.events.push(HostEvent::Info(message.to_string()));
  }

  fn debug(&mut self, message: &str) {
    self.events.push(HostEvent::Debug(message.to_string()));
  }

  fn warning(&mut self, message: &str) {
    self.events.push(HostEvent::Warning(message.to_string()));
  }

  fn export_variable(&mut self, name: &str, value: &str) -> std::io::Result<()> {
    self.events.push(HostEvent::Export {
      name: name.to_string(),
      value: value.to_string(),
    });
    Ok(())
  }

  fn set_failed(&mut self, message: &str) {
    self.events.push(HostEvent::Failed(message.to_string()));
  }
}

/// Parse a boolean action input.
///
/// Only a case-insensitive `true` (after trimming) enables the flag; any other
/// value, including `1` and an absent input, is `false`.
pub fn parse_bool_input(raw: Option<&str>) -> bool {
  raw.map(str::trim).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
