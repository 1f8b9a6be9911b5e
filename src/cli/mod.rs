mod context;
mod handlers;
pub mod output;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext, TODAY_ENV};
pub use shell::{run_cli, SCRIPT_ENV};
