//! `Info.plist` loading, editing and serialization.
//!
//! The manifest is held as a [`plist::Dictionary`], which keeps keys in
//! insertion order. Values the updater does not know about (nested
//! dictionaries, arrays, dates, data) are never inspected and round-trip
//! unchanged. Replacing an existing key keeps its position.

mod types;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use plist::{Dictionary, Value};
use thiserror::Error;
use tracing::debug;

pub use types::*;

/// Errors that can occur while reading or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse property list: {0}")]
  Parse(#[source] plist::Error),

  #[error("property list root is not a dictionary")]
  NotADictionary,

  #[error("failed to serialize property list: {0}")]
  Serialize(#[source] plist::Error),

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

/// A parsed `Info.plist`.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPlist {
  root: Dictionary,
  format: PlistFormat,
}

impl InfoPlist {
  /// Parse a property list from raw bytes, detecting XML or binary encoding.
  ///
  /// # Errors
  ///
  /// Returns `ManifestError::Parse` for malformed input and
  /// `ManifestError::NotADictionary` if the root object is not a dictionary.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
    let format = PlistFormat::detect(bytes);
    let value = Value::from_reader(Cursor::new(bytes)).map_err(ManifestError::Parse)?;
    let root = value.into_dictionary().ok_or(ManifestError::NotADictionary)?;

    debug!(%format, keys = root.len(), "parsed property list");

    Ok(Self { root, format })
  }

  /// Read and parse the manifest at `path`.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let bytes = fs::read(path).map_err(|e| ManifestError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    Self::from_bytes(&bytes)
  }

  /// Serialize in the format the manifest was loaded from.
  pub fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
    let value = Value::Dictionary(self.root.clone());
    let mut out = Vec::new();

    match self.format {
      PlistFormat::Xml => {
        value.to_writer_xml(&mut out).map_err(ManifestError::Serialize)?;
        if !out.ends_with(b"\n") {
          out.push(b'\n');
        }
      }
      PlistFormat::Binary => {
        value.to_writer_binary(&mut out).map_err(ManifestError::Serialize)?;
      }
    }

    Ok(out)
  }

  /// Serialize and overwrite the file at `path`.
  pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
    let bytes = self.to_bytes()?;
    fs::write(path, bytes).map_err(|e| ManifestError::Write {
      path: path.to_path_buf(),
      source: e,
    })
  }

  pub fn format(&self) -> PlistFormat {
    self.format
  }

  /// The top-level dictionary.
  pub fn root(&self) -> &Dictionary {
    &self.root
  }

  pub fn get(&self, key: BundleKey) -> Option<&Value> {
    self.root.get(key.as_str())
  }

  /// Replace (or insert) a well-known key with a string value.
  pub fn set_string(&mut self, key: BundleKey, value: &str) {
    self
      .root
      .insert(key.as_str().to_string(), Value::String(value.to_string()));
  }

  /// Render a well-known key as text.
  ///
  /// Strings are returned verbatim, numbers in decimal and booleans as
  /// `true`/`false`. Missing keys and container values yield `None`.
  pub fn display_value(&self, key: BundleKey) -> Option<String> {
    match self.get(key)? {
      Value::String(s) => Some(s.clone()),
      Value::Integer(i) => i
        .as_signed()
        .map(|n| n.to_string())
        .or_else(|| i.as_unsigned().map(|n| n.to_string())),
      Value::Real(r) => Some(r.to_string()),
      Value::Boolean(b) => Some(b.to_string()),
      _ => None,
    }
  }
}
