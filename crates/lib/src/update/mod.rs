//! `Info.plist` update orchestration.
//!
//! This module provides the single operation bundlever performs: apply the
//! supplied overrides to the well-known bundle keys, rewrite the file, and
//! export the derived full version name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{FULL_VERSION_NAME_VAR, INPUT_INFO_PLIST_PATH};
use crate::host::OutputChannel;
use crate::manifest::{BundleKey, InfoPlist, ManifestError, PlistFormat};
use crate::platform::{PermissionError, restrict_to_owner};
use crate::version::FullVersionName;

pub use crate::host::parse_bool_input;

/// Values to write into the well-known bundle keys.
///
/// `None`, empty and whitespace-only values all mean "leave the key as is".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
  pub short_version: Option<String>,
  pub version: Option<String>,
  pub display_name: Option<String>,
  pub app_id: Option<String>,
}

impl Overrides {
  /// The override for `key`, if one was supplied.
  pub fn get(&self, key: BundleKey) -> Option<&str> {
    let raw = match key {
      BundleKey::ShortVersionString => &self.short_version,
      BundleKey::Version => &self.version,
      BundleKey::DisplayName => &self.display_name,
      BundleKey::Identifier => &self.app_id,
    };
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
  }

  pub fn is_empty(&self) -> bool {
    BundleKey::ALL.iter().all(|key| self.get(*key).is_none())
  }
}

/// Options for the update operation.
#[derive(Debug, Default, Clone)]
pub struct UpdateOptions {
  /// Path to the `Info.plist` to rewrite.
  pub info_plist_path: Option<PathBuf>,
  /// Dump the file contents before and after the update.
  pub print_file: bool,
  pub overrides: Overrides,
}

/// An override that was written into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
  pub key: BundleKey,
  pub value: String,
}

/// Result of a successful update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
  pub path: PathBuf,
  pub format: PlistFormat,
  /// Overrides applied, in application order.
  pub applied: Vec<AppliedOverride>,
  /// Effective `CFBundleShortVersionString` (override or existing value).
  pub short_version: String,
  /// Effective `CFBundleVersion` (override or existing value).
  pub version: String,
  pub full_version_name: FullVersionName,
}

/// Errors that can occur during an update.
#[derive(Debug, Error)]
pub enum UpdateError {
  #[error("input required and not supplied: {name}")]
  MissingInput { name: &'static str },

  #[error("the file path for the Info.plist does not exist or is not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Permissions(#[from] PermissionError),

  #[error("failed to export {name}: {source}")]
  Export { name: String, source: std::io::Error },
}

/// Apply `options` to the manifest and export the full version name.
///
/// The steps run strictly in order:
/// 1. Check the manifest exists (nothing else is touched if it does not)
/// 2. Optionally dump the current contents
/// 3. Parse and apply each supplied override
/// 4. Restrict the file to owner read/write and overwrite it
/// 5. Optionally dump the new contents
/// 6. Export `FULL_VERSION_NAME` through `channel`
///
/// # Errors
///
/// Returns an error if the path is missing or does not exist, the manifest
/// cannot be read, parsed, or written, permissions cannot be changed, or the
/// variable cannot be exported. There is no rollback: a failure after the
/// permission change leaves the new mode in place.
pub fn update_info_plist(
  options: &UpdateOptions,
  channel: &mut dyn OutputChannel,
) -> Result<UpdateResult, UpdateError> {
  let path = options
    .info_plist_path
    .as_deref()
    .filter(|p| !p.as_os_str().is_empty())
    .ok_or(UpdateError::MissingInput {
      name: INPUT_INFO_PLIST_PATH,
    })?;

  if !path.exists() {
    return Err(UpdateError::NotFound {
      path: path.to_path_buf(),
    });
  }

  channel.debug(&format!("Running task with {}", path.display()));
  info!(path = %path.display(), "updating Info.plist");

  if options.print_file {
    channel.info("Before update:");
    dump_file(path, channel)?;
  }

  let bytes = fs::read(path).map_err(|e| ManifestError::Read {
    path: path.to_path_buf(),
    source: e,
  })?;
  channel.debug(&format!("{:?}", String::from_utf8_lossy(&bytes)));

  let mut plist = InfoPlist::from_bytes(&bytes)?;
  if options.overrides.is_empty() {
    debug!("no overrides supplied, rewriting unchanged");
  }
  let mut applied = Vec::new();
  let mut short_version = None;
  let mut version = None;

  for key in BundleKey::ALL {
    let effective = match options.overrides.get(key) {
      Some(value) => {
        channel.info(&format!("Overriding {}: {}", key, value));
        plist.set_string(key, value);
        applied.push(AppliedOverride {
          key,
          value: value.to_string(),
        });
        Some(value.to_string())
      }
      // Display name and identifier are write-only.
      None if key.is_version_component() => plist.display_value(key),
      None => continue,
    };

    match key {
      BundleKey::ShortVersionString => short_version = effective,
      BundleKey::Version => version = effective,
      _ => {}
    }
  }

  restrict_to_owner(path)?;
  plist.save(path)?;
  debug!(path = %path.display(), applied = applied.len(), "wrote Info.plist");

  if options.print_file {
    channel.info("After update:");
    dump_file(path, channel)?;
  }

  let short_version = effective_or_empty(BundleKey::ShortVersionString, short_version, channel);
  let version = effective_or_empty(BundleKey::Version, version, channel);
  let full_version_name = FullVersionName::new(&short_version, &version);

  channel.info("Info.plist updated successfully");
  channel
    .export_variable(FULL_VERSION_NAME_VAR, full_version_name.as_str())
    .map_err(|e| UpdateError::Export {
      name: FULL_VERSION_NAME_VAR.to_string(),
      source: e,
    })?;
  info!(%full_version_name, "exported {}", FULL_VERSION_NAME_VAR);

  Ok(UpdateResult {
    path: path.to_path_buf(),
    format: plist.format(),
    applied,
    short_version,
    version,
    full_version_name,
  })
}

/// Emit the raw file contents to the info sink.
fn dump_file(path: &Path, channel: &mut dyn OutputChannel) -> Result<(), UpdateError> {
  let bytes = fs::read(path).map_err(|e| ManifestError::Read {
    path: path.to_path_buf(),
    source: e,
  })?;
  let text = String::from_utf8_lossy(&bytes);
  channel.info(text.trim_end_matches('\n'));
  Ok(())
}

// A missing key renders as an empty component (`v1.0()`) rather than the
// literal `undefined` the JavaScript action produced.
fn effective_or_empty(key: BundleKey, value: Option<String>, channel: &mut dyn OutputChannel) -> String {
  value.unwrap_or_else(|| {
    warn!(%key, "no usable value in Info.plist");
    channel.warning(&format!("{} is not set in the Info.plist", key));
    String::new()
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::host::{CapturedOutput, HostEvent};
  use tempfile::TempDir;
  use tracing_test::traced_test;

  const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDisplayName</key>
	<string>Demo</string>
	<key>CFBundleIdentifier</key>
	<string>com.example.demo</string>
	<key>CFBundleShortVersionString</key>
	<string>1.2</string>
	<key>CFBundleVersion</key>
	<string>7</string>
	<key>UIRequiredDeviceCapabilities</key>
	<array>
		<string>armv7</string>
	</array>
</dict>
</plist>
"#;

  fn fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Info.plist");
    fs::write(&path, INFO_PLIST).unwrap();
    (temp, path)
  }

  fn options(path: &Path, overrides: Overrides) -> UpdateOptions {
    UpdateOptions {
      info_plist_path: Some(path.to_path_buf()),
      print_file: false,
      overrides,
    }
  }

  #[test]
  fn no_overrides_exports_existing_versions() {
    let (_temp, path) = fixture();
    let mut out = CapturedOutput::new();

    let result = update_info_plist(&options(&path, Overrides::default()), &mut out).unwrap();

    assert_eq!(result.full_version_name.as_str(), "v1.2(7)");
    assert!(result.applied.is_empty());
    assert_eq!(out.exported("FULL_VERSION_NAME"), Some("v1.2(7)"));
    assert!(out.infos().any(|m| m == "Info.plist updated successfully"));
  }

  #[test]
  fn short_version_override_is_used_in_full_name() {
    let (_temp, path) = fixture();
    let mut out = CapturedOutput::new();
    let overrides = Overrides {
      short_version: Some("2.0".to_string()),
      ..Default::default()
    };

    let result = update_info_plist(&options(&path, overrides), &mut out).unwrap();

    assert_eq!(result.full_version_name.as_str(), "v2.0(7)");
    assert!(out.infos().any(|m| m == "Overriding CFBundleShortVersionString: 2.0"));
    let plist = InfoPlist::load(&path).unwrap();
    assert_eq!(
      plist.display_value(BundleKey::ShortVersionString).as_deref(),
      Some("2.0")
    );
  }

  #[test]
  fn all_overrides_are_written() {
    let (_temp, path) = fixture();
    let mut out = CapturedOutput::new();
    let overrides = Overrides {
      short_version: Some("3.1".to_string()),
      version: Some("42".to_string()),
      display_name: Some("Demo Beta".to_string()),
      app_id: Some("com.example.demo.beta".to_string()),
    };

    let result = update_info_plist(&options(&path, overrides), &mut out).unwrap();

    let plist = InfoPlist::load(&path).unwrap();
    for (key, expected) in [
      (BundleKey::ShortVersionString, "3.1"),
      (BundleKey::Version, "42"),
      (BundleKey::DisplayName, "Demo Beta"),
      (BundleKey::Identifier, "com.example.demo.beta"),
    ] {
      assert_eq!(plist.display_value(key).as_deref(), Some(expected), "{key}");
    }
    let keys: Vec<_> = result.applied.iter().map(|a| a.key).collect();
    assert_eq!(keys, BundleKey::ALL);
    assert_eq!(result.full_version_name.as_str(), "v3.1(42)");
  }

  #[test]
  fn empty_overrides_leave_values_untouched() {
    let (_temp, path) = fixture();
    let mut out = CapturedOutput::new();
    let overrides = Overrides {
      short_version: Some(String::new()),
      version: Some("   ".to_string()),
      display_name: Some(String::new()),
      app_id: None,
    };

    update_info_plist(&options(&path, overrides), &mut out).unwrap();

    let plist = InfoPlist::load(&path).unwrap();
    assert_eq!(plist.display_value(BundleKey::DisplayName).as_deref(), Some("Demo"));
    assert_eq!(
      plist.display_value(BundleKey::Identifier).as_deref(),
      Some("com.example.demo")
    );
    assert_eq!(out.exported("FULL_VERSION_NAME"), Some("v1.2(7)"));
  }

  #[test]
  fn missing_file_fails_before_any_write() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Info.plist");
    let mut out = CapturedOutput::new();

    let err = update_info_plist(&options(&path, Overrides::default()), &mut out).unwrap_err();

    assert!(matches!(err, UpdateError::NotFound { .. }));
    assert!(!path.exists());
    assert!(out.events.is_empty());
  }

  #[test]
  fn missing_path_input_is_reported() {
    let mut out = CapturedOutput::new();
    let options = UpdateOptions {
      info_plist_path: Some(PathBuf::new()),
      ..Default::default()
    };

    let err = update_info_plist(&options, &mut out).unwrap_err();
    assert_eq!(err.to_string(), "input required and not supplied: info-plist-path");
  }

  #[test]
  fn malformed_manifest_is_not_rewritten() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Info.plist");
    fs::write(&path, "<plist><dict><key>broken").unwrap();
    let mut out = CapturedOutput::new();

    let err = update_info_plist(&options(&path, Overrides::default()), &mut out).unwrap_err();

    assert!(matches!(err, UpdateError::Manifest(ManifestError::Parse(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "<plist><dict><key>broken");
    assert_eq!(out.exported("FULL_VERSION_NAME"), None);
  }

  #[test]
  #[cfg(unix)]
  fn rewritten_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = fixture();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o664)).unwrap();

    update_info_plist(&options(&path, Overrides::default()), &mut CapturedOutput::new()).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }

  #[test]
  fn repeated_no_op_runs_are_stable() {
    let (_temp, path) = fixture();

    update_info_plist(&options(&path, Overrides::default()), &mut CapturedOutput::new()).unwrap();
    let first = InfoPlist::load(&path).unwrap();
    update_info_plist(&options(&path, Overrides::default()), &mut CapturedOutput::new()).unwrap();
    let second = InfoPlist::load(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, InfoPlist::from_bytes(INFO_PLIST.as_bytes()).unwrap());
  }

  #[test]
  fn print_file_dumps_before_and_after() {
    let (_temp, path) = fixture();
    let mut out = CapturedOutput::new();
    let options = UpdateOptions {
      info_plist_path: Some(path.clone()),
      print_file: true,
      overrides: Overrides {
        version: Some("8".to_string()),
        ..Default::default()
      },
    };

    update_info_plist(&options, &mut out).unwrap();

    let infos: Vec<&str> = out.infos().collect();
    let before = infos.iter().position(|m| *m == "Before update:").unwrap();
    let after = infos.iter().position(|m| *m == "After update:").unwrap();
    assert!(before < after);
    assert!(infos[before + 1].contains("<string>7</string>"));
    assert!(infos[after + 1].contains("<string>8</string>"));
  }

  #[test]
  fn missing_version_key_renders_empty_with_warning() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Info.plist");
    fs::write(
      &path,
      r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>CFBundleShortVersionString</key>
	<string>1.0</string>
</dict>
</plist>
"#,
    )
    .unwrap();
    let mut out = CapturedOutput::new();

    let result = update_info_plist(&options(&path, Overrides::default()), &mut out).unwrap();

    assert_eq!(result.full_version_name.as_str(), "v1.0()");
    assert!(
      out
        .events
        .contains(&HostEvent::Warning("CFBundleVersion is not set in the Info.plist".to_string()))
    );
  }

  #[test]
  fn overrides_report_only_non_empty_values() {
    let overrides = Overrides {
      version: Some(" 12 ".to_string()),
      display_name: Some(String::new()),
      ..Default::default()
    };

    assert_eq!(overrides.get(BundleKey::Version), Some("12"));
    assert_eq!(overrides.get(BundleKey::DisplayName), None);
    assert!(!overrides.is_empty());
    assert!(Overrides::default().is_empty());
  }

  #[test]
  #[traced_test]
  fn logs_the_exported_name() {
    let (_temp, path) = fixture();

    update_info_plist(&options(&path, Overrides::default()), &mut CapturedOutput::new()).unwrap();

    assert!(logs_contain("exported FULL_VERSION_NAME"));
    assert!(logs_contain("v1.2(7)"));
  }
}
