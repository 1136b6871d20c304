use crate::models::ProjectConfig;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io;
use thiserror::Error;

/// Errors from reading or writing the project document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Loads, creates and saves the `project.json` document.
///
/// There is no auto-save: callers save after every mutation they want
/// to survive the run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: Utf8PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Utf8Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Read and parse the document.
    ///
    /// A missing file is reported as [`ConfigError::NotFound`], distinct from
    /// an unreadable or malformed one.
    pub fn load(&self) -> Result<ProjectConfig, ConfigError> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.config_path.clone()));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.config_path.clone(),
                    source,
                });
            }
        };

        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })?;

        tracing::info!("Loaded project config from {}", self.config_path);
        Ok(config)
    }

    /// Write a fresh default document pointing at `project_base_dir`.
    pub fn create_default(&self, project_base_dir: &Utf8Path) -> Result<ProjectConfig, ConfigError> {
        let config = ProjectConfig::with_defaults(project_base_dir.as_str());
        self.save(&config)?;

        tracing::info!("Created default project config at {}", self.config_path);
        Ok(config)
    }

    /// Overwrite the file with `config`, pretty-printed with 4-space indents.
    ///
    /// Unknown keys captured on load are written back in their original order.
    ///
    /// # Errors
    /// [`ConfigError::Write`] when the file cannot be written, for example
    /// when the path is a directory or the disk is full
    pub fn save(&self, config: &ProjectConfig) -> Result<(), ConfigError> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        config
            .serialize(&mut serializer)
            .map_err(ConfigError::Serialize)?;
        buffer.push(b'\n');

        fs::write(&self.config_path, buffer).map_err(|source| ConfigError::Write {
            path: self.config_path.clone(),
            source,
        })?;

        tracing::debug!("Saved project config to {}", self.config_path);
        Ok(())
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
