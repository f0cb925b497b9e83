pub mod commands;
pub mod core;
pub mod help;
pub mod intent;
pub mod io;
pub mod output;
mod shell;
pub mod shell_context;
pub mod view;

pub use intent::{DeleteTarget, Intent};
pub use shell::{run_cli, SCRIPT_ENV};
pub use shell_context::{CliMode, ShellContext};
