//! Interactive shell over the budget tracker.

mod commands;
mod context;
mod output;
mod registry;
mod shell;

pub use context::{CliError, CliMode};
pub use shell::{run_cli, SCRIPT_MODE_ENV};
