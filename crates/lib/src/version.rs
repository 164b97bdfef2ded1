//! Full version name composition.

use std::fmt;

use serde::Serialize;

/// The derived `v<short>(<version>)` string exported to downstream steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FullVersionName(String);

impl FullVersionName {
  /// Compose from the effective short version and build version.
  pub fn new(short_version: &str, version: &str) -> Self {
    Self(format!("v{}({})", short_version, version))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for FullVersionName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
