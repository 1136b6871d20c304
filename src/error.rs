use crate::config::ConfigError;
use crate::services::TransferError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures of the source-path workflow.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to create config file {path}")]
    ConfigCreate {
        path: Utf8PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Failed to read config file {path}")]
    ConfigRead {
        path: Utf8PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Failed to update config file {path}")]
    ConfigUpdate {
        path: Utf8PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Source path is not a directory: {0}")]
    InvalidSourcePath(Utf8PathBuf),

    #[error("Required subdirectories missing from both layouts in {0}")]
    InvalidSubdirs(Utf8PathBuf),

    #[error("File operation failed")]
    FatalTransfer(#[from] TransferError),

    #[error("No source path was provided")]
    NoInput,
}
