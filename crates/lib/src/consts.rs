//! Names shared between the library and the CLI.

/// Environment variable exported for downstream steps.
pub const FULL_VERSION_NAME_VAR: &str = "FULL_VERSION_NAME";

/// Input names as declared by the action.
pub const INPUT_INFO_PLIST_PATH: &str = "info-plist-path";
pub const INPUT_BUNDLE_SHORT_VERSION_STRING: &str = "bundle-short-version-string";
pub const INPUT_BUNDLE_VERSION: &str = "bundle-version";
pub const INPUT_BUNDLE_DISPLAY_NAME: &str = "bundle-display-name";
pub const INPUT_APP_ID: &str = "app-id";

/// Magic prefix of a binary property list.
pub const BINARY_PLIST_MAGIC: &[u8] = b"bplist00";

/// Mode applied to the manifest before it is rewritten.
pub const OWNER_READ_WRITE_MODE: u32 = 0o600;
