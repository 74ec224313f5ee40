//! CLI command handlers. Each command is in its own file.

mod clean;
mod install;
mod list;

pub use clean::run_clean;
pub use install::run_install;
pub use list::run_list;
