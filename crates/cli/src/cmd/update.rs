//! Implementation of the `Info.plist` update step.
//!
//! Every input can be given as a flag or, when running as an action, through
//! the `INPUT_*` variable the runner sets for it.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use bundlever_lib::host::OutputChannel;
use bundlever_lib::update::{Overrides, UpdateOptions, parse_bool_input, update_info_plist};

use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

/// Action inputs.
#[derive(Debug, Args)]
pub struct UpdateArgs {
  /// Path to the Info.plist to update
  #[arg(long, env = "INPUT_INFO-PLIST-PATH")]
  pub info_plist_path: Option<PathBuf>,

  /// Print the file before and after the update ("true" to enable)
  #[arg(long, env = "INPUT_PRINT-FILE")]
  pub print_file: Option<String>,

  /// Value for CFBundleShortVersionString
  #[arg(long, env = "INPUT_BUNDLE-SHORT-VERSION-STRING")]
  pub bundle_short_version_string: Option<String>,

  /// Value for CFBundleVersion
  #[arg(long, env = "INPUT_BUNDLE-VERSION")]
  pub bundle_version: Option<String>,

  /// Value for CFBundleIdentifier
  #[arg(long, env = "INPUT_APP-ID")]
  pub app_id: Option<String>,

  /// Value for CFBundleDisplayName
  #[arg(long, env = "INPUT_BUNDLE-DISPLAY-NAME")]
  pub bundle_display_name: Option<String>,
}

impl UpdateArgs {
  pub fn to_options(&self) -> UpdateOptions {
    UpdateOptions {
      info_plist_path: self.info_plist_path.clone(),
      print_file: parse_bool_input(self.print_file.as_deref()),
      overrides: Overrides {
        short_version: self.bundle_short_version_string.clone(),
        version: self.bundle_version.clone(),
        display_name: self.bundle_display_name.clone(),
        app_id: self.app_id.clone(),
      },
    }
  }
}

/// Execute the update.
///
/// Applies the overrides, rewrites the file and exports `FULL_VERSION_NAME`
/// through `channel`. With `--output json` a summary of the result is printed
/// after the step log.
///
/// # Errors
///
/// Returns the update error unchanged so its message can be reported as the
/// step failure.
pub fn cmd_update(
  args: &UpdateArgs,
  format: OutputFormat,
  summary: bool,
  channel: &mut dyn OutputChannel,
) -> Result<()> {
  let start = Instant::now();
  let result = update_info_plist(&args.to_options(), channel)?;

  if format.is_json() {
    return print_json(&result);
  }

  if summary {
    print_success(&format!("{} -> {}", result.path.display(), result.full_version_name));
    print_stat("Format", result.format.as_str());
    print_stat("Overrides", &result.applied.len().to_string());
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
