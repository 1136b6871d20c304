//! Data models for the source-path workflow.
//!
//! - [`ProjectConfig`]: the `project.json` document, with unknown keys preserved
//! - [`DirectoryLayout`]: the required-directory sets and marker directory a source root is checked against
//! - [`TransferChoice`] / [`TransferProgress`]: how the source tree is brought into the project

pub mod layout;
pub mod project;
pub mod transfer;

pub use layout::{
    ALTERNATE_DIRS, DirectoryLayout, DirectorySet, MARKER_DIR, PRIMARY_DIRS, RequiredDirectorySet,
};
pub use project::{Directories, EngineConfig, ProjectConfig, RemakeEngine};
pub use transfer::{TransferChoice, TransferProgress, UnknownChoice};
