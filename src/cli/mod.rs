pub mod commands;
pub mod core;
pub mod format;
pub mod output;
pub mod registry;
pub mod render;
pub mod shell;
pub mod system_clock;

pub use self::core::{process_script, CliMode, ShellContext, SCRIPT_ENV};
pub use shell::run_cli;
