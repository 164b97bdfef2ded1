//! Platform-specific file handling.

mod permissions;

pub use permissions::{PermissionError, restrict_to_owner};
