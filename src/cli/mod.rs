//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, interrupt handling,
//! and the describe runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_describe, EXIT_CANCELLED, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, DescribeArgs, ProviderArg};
pub use presenter::Presenter;
