//! File permission handling for the rewritten manifest.
//!
//! The manifest is restricted to owner read/write before it is rewritten so
//! the new contents never inherit broader permissions from the checkout.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Errors that can occur while changing permissions.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
  #[error("failed to read metadata for {}: {source}", path.display())]
  Metadata { path: PathBuf, source: std::io::Error },

  #[error("failed to set permissions on {}: {source}", path.display())]
  SetPermissions { path: PathBuf, source: std::io::Error },
}

/// Restrict `path` to owner read/write (`0o600`).
///
/// On non-unix targets there is no mode to set; the read-only attribute is
/// cleared instead so the following write can succeed.
///
/// # Errors
///
/// Returns an error if the file's metadata cannot be read or the new
/// permissions cannot be applied.
#[cfg(unix)]
pub fn restrict_to_owner(path: &Path) -> Result<(), PermissionError> {
  use std::os::unix::fs::PermissionsExt;

  use crate::consts::OWNER_READ_WRITE_MODE;

  let metadata = std::fs::metadata(path).map_err(|e| PermissionError::Metadata {
    path: path.to_path_buf(),
    source: e,
  })?;

  let mut perms = metadata.permissions();
  debug!(
    path = %path.display(),
    from = %format!("{:o}", perms.mode() & 0o777),
    to = %format!("{:o}", OWNER_READ_WRITE_MODE),
    "restricting permissions"
  );
  perms.set_mode(OWNER_READ_WRITE_MODE);
  std::fs::set_permissions(path, perms).map_err(|e| PermissionError::SetPermissions {
    path: path.to_path_buf(),
    source: e,
  })
}

#[cfg(not(unix))]
pub fn restrict_to_owner(path: &Path) -> Result<(), PermissionError> {
  let metadata = std::fs::metadata(path).map_err(|e| PermissionError::Metadata {
    path: path.to_path_buf(),
    source: e,
  })?;

  let mut perms = metadata.permissions();
  if perms.readonly() {
    debug!(path = %path.display(), "clearing read-only attribute");
    perms.set_readonly(false);
    std::fs::set_permissions(path, perms).map_err(|e| PermissionError::SetPermissions {
      path: path.to_path_buf(),
      source: e,
    })?;
  }

  Ok(())
}
