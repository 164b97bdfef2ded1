//! bundlever-lib: Core types and logic for bundlever
//!
//! This crate provides everything needed to stamp an `Info.plist`:
//! - `InfoPlist`: the parsed property list, preserving unknown structure
//! - `Overrides`: the optional values to write into well-known bundle keys
//! - `update_info_plist`: the single linear update operation
//! - `OutputChannel`: where logs, exported variables and failures are sent

pub mod consts;
pub mod host;
pub mod manifest;
pub mod platform;
pub mod update;
pub mod version;
