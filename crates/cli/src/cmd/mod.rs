mod update;

pub use update::{UpdateArgs, cmd_update};
