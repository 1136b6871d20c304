// RemakeEngine init - source path bootstrap for the asset pipeline
//
// This is the library crate containing the workflow and its collaborators.
// The binary crate (main.rs) wires it to the terminal.

pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use crate::config::{ConfigError, ConfigStore};
pub use console::{Operator, Severity, StdConsole};
pub use error::InitError;
pub use models::{DirectoryLayout, DirectorySet, ProjectConfig, TransferChoice, TransferProgress};
pub use resolver::{Outcome, SourcePathResolver, Status, report_outcome, run_until_settled};
pub use settings::InitSettings;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
