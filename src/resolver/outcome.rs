use crate::console::{Operator, Severity};
use crate::error::InitError;
use crate::models::DirectorySet;
use crate::services::TransferError;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Status code of a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Created,
    Valid,
    InvalidSubdirs,
    UserInputInvalid,
    FatalTransferError,
    ConfigIoError,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Status::Created => "CREATED",
            Status::Valid => "EXISTS_VALID",
            Status::InvalidSubdirs => "EXISTS_INVALID_SUBDIRS",
            Status::UserInputInvalid => "USER_PROVIDED_PATH_INVALID",
            Status::FatalTransferError => "ERROR_FILE_OPERATION",
            Status::ConfigIoError => "ERROR_CONFIG",
        };
        f.write_str(code)
    }
}

/// Where a run of the resolver ended.
#[derive(Debug)]
pub enum Outcome {
    /// A fresh config file was written; the workflow should be run again.
    Created { config_path: Utf8PathBuf },

    /// `root` holds a complete layout and has been saved to the config.
    Valid {
        root: Utf8PathBuf,
        matched: DirectorySet,
    },

    /// `checked` is a directory but matches neither required set.
    InvalidSubdirs { checked: Utf8PathBuf },

    /// Operator input closed before a usable answer was given.
    UserInputInvalid,

    FatalTransferError(TransferError),

    ConfigIoError(InitError),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Created { .. } => Status::Created,
            Outcome::Valid { .. } => Status::Valid,
            Outcome::InvalidSubdirs { .. } => Status::InvalidSubdirs,
            Outcome::UserInputInvalid => Status::UserInputInvalid,
            Outcome::FatalTransferError(_) => Status::FatalTransferError,
            Outcome::ConfigIoError(_) => Status::ConfigIoError,
        }
    }

    /// The path associated with the outcome, if any.
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Outcome::Valid { root, .. } => Some(root),
            Outcome::InvalidSubdirs { checked } => Some(checked),
            _ => None,
        }
    }

    /// The validated root for the downstream pipeline, or why there is none.
    pub fn into_result(self) -> Result<Utf8PathBuf, InitError> {
        match self {
            Outcome::Valid { root, .. } => Ok(root),
            Outcome::InvalidSubdirs { checked } => Err(InitError::InvalidSubdirs(checked)),
            Outcome::Created { .. } | Outcome::UserInputInvalid => Err(InitError::NoInput),
            Outcome::FatalTransferError(e) => Err(InitError::FatalTransfer(e)),
            Outcome::ConfigIoError(e) => Err(e),
        }
    }
}

/// Print the final status banner and what the operator should do next.
pub fn report_outcome(outcome: &Outcome, operator: &mut dyn Operator) {
    operator.emit(
        Severity::Info,
        &format!("--- Final Status: {} ---", outcome.status()),
    );

    match outcome {
        Outcome::Created { config_path } => {
            operator.emit(
                Severity::Success,
                &format!("Configuration file {} was newly created.", config_path),
            );
            operator.emit(
                Severity::Warning,
                "Action Required: run again to provide the source path and choose how to use it.",
            );
        }
        Outcome::Valid { root, matched } => {
            operator.emit(
                Severity::Success,
                &format!(
                    "Configuration is valid. Source path '{}' matches the {} layout.",
                    root, matched
                ),
            );
        }
        Outcome::InvalidSubdirs { checked } => {
            operator.emit(
                Severity::Error,
                &format!("Required subdirectories are missing within '{}'.", checked),
            );
            operator.emit(
                Severity::Error,
                "Action Required: check the contents of this directory.",
            );
        }
        Outcome::UserInputInvalid => {
            operator.emit(
                Severity::Error,
                "Failed to obtain a valid source directory from user input.",
            );
            operator.emit(
                Severity::Error,
                "Action Required: run again and provide a valid directory path.",
            );
        }
        Outcome::FatalTransferError(e) => {
            operator.emit(
                Severity::Error,
                &format!("A critical error occurred during a copy/move operation: {}", e),
            );
            operator.emit(
                Severity::Error,
                "Action Required: check disk space, permissions and earlier messages. \
                 Source and destination may be inconsistent.",
            );
        }
        Outcome::ConfigIoError(e) => {
            operator.emit(
                Severity::Error,
                &format!("{}: {}", e, error_chain(e)),
            );
            operator.emit(
                Severity::Error,
                "Action Required: check file permissions or disk space.",
            );
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    parts.join(": ")
}
