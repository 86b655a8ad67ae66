//! CLI command handlers for fbkeys.
//!
//! Each subcommand is an argument struct with an `execute()` method. The
//! binary only parses arguments, sets up logging and maps errors to exit
//! codes.

pub mod common;
pub mod config;
pub mod devices;
pub mod geometry;
pub mod run;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use devices::DevicesArgs;
pub use geometry::GeometryArgs;
pub use run::RunArgs;
