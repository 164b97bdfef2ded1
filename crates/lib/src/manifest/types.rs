//! Manifest key and format types.
//!
//! Only four top-level keys of an `Info.plist` carry meaning for bundlever.
//! Everything else in the file is treated as opaque and written back as-is.

use std::fmt;

use serde::Serialize;

use crate::consts::{
  BINARY_PLIST_MAGIC, INPUT_APP_ID, INPUT_BUNDLE_DISPLAY_NAME, INPUT_BUNDLE_SHORT_VERSION_STRING,
  INPUT_BUNDLE_VERSION,
};

/// A well-known top-level key of an `Info.plist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BundleKey {
  /// User-facing version, e.g. `1.2`.
  ShortVersionString,
  /// Build number, e.g. `7`.
  Version,
  DisplayName,
  Identifier,
}

impl BundleKey {
  /// All keys, in the order overrides are applied.
  pub const ALL: [BundleKey; 4] = [
    BundleKey::ShortVersionString,
    BundleKey::Version,
    BundleKey::DisplayName,
    BundleKey::Identifier,
  ];

  /// The key as it appears in the property list.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ShortVersionString => "CFBundleShortVersionString",
      Self::Version => "CFBundleVersion",
      Self::DisplayName => "CFBundleDisplayName",
      Self::Identifier => "CFBundleIdentifier",
    }
  }

  /// The action input that overrides this key.
  pub fn input_name(&self) -> &'static str {
    match self {
      Self::ShortVersionString => INPUT_BUNDLE_SHORT_VERSION_STRING,
      Self::Version => INPUT_BUNDLE_VERSION,
      Self::DisplayName => INPUT_BUNDLE_DISPLAY_NAME,
      Self::Identifier => INPUT_APP_ID,
    }
  }

  /// Whether the effective value of this key feeds the full version name.
  pub fn is_version_component(&self) -> bool {
    matches!(self, Self::ShortVersionString | Self::Version)
  }
}

impl fmt::Display for BundleKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// On-disk serialization of a property list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlistFormat {
  #[default]
  Xml,
  Binary,
}

impl PlistFormat {
  /// Detect the format from the raw file bytes.
  pub fn detect(bytes: &[u8]) -> Self {
    if bytes.starts_with(BINARY_PLIST_MAGIC) {
      Self::Binary
    } else {
      Self::Xml
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Xml => "xml",
      Self::Binary => "binary",
    }
  }
}

impl fmt::Display for PlistFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
