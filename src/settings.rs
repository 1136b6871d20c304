use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Name of the optional settings file, without extension.
pub const SETTINGS_FILE_STEM: &str = "remake-init";

/// Prefix for environment overrides, e.g. `REMAKE_INIT_DEBUG_MODE=true`.
pub const ENV_PREFIX: &str = "REMAKE_INIT";

/// Application settings for the bootstrap tool.
///
/// Loaded from built-in defaults, then an optional `remake-init.{toml,json,yaml}`
/// in the working directory, then `REMAKE_INIT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitSettings {
    /// Project config file, relative to the working directory.
    pub config_file: String,

    /// Where relocated game files live, relative to the project directory.
    pub local_data_subpath: String,

    pub log_dir: String,
    pub log_prefix: String,
    pub debug_mode: bool,
    pub console_log: bool,

    /// How many times the driver re-runs the workflow after creating a fresh
    /// config file.
    pub max_restarts: u32,
}

impl Default for InitSettings {
    fn default() -> Self {
        Self {
            config_file: "project.json".to_string(),
            local_data_subpath: "Source/GameFiles/SimpGamePS2".to_string(),
            log_dir: "logs".to_string(),
            log_prefix: "remake-init".to_string(),
            debug_mode: false,
            console_log: false,
            max_restarts: 1,
        }
    }
}

impl InitSettings {
    /// Load settings from `dir` and the process environment.
    pub fn load_from<P: AsRef<Utf8Path>>(dir: P) -> Result<Self> {
        let defaults = Self::default();
        let file = dir.as_ref().join(SETTINGS_FILE_STEM);

        let settings = config::Config::builder()
            .set_default("config_file", defaults.config_file)?
            .set_default("local_data_subpath", defaults.local_data_subpath)?
            .set_default("log_dir", defaults.log_dir)?
            .set_default("log_prefix", defaults.log_prefix)?
            .set_default("debug_mode", defaults.debug_mode)?
            .set_default("console_log", defaults.console_log)?
            .set_default("max_restarts", i64::from(defaults.max_restarts))?
            .add_source(config::File::with_name(file.as_str()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load settings")?;

        settings
            .try_deserialize()
            .context("Failed to parse settings")
    }

    /// Load settings from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(".")
    }

    /// Absolute path of the project config file.
    pub fn config_path(&self) -> Result<Utf8PathBuf> {
        let absolute = std::path::absolute(&self.config_file)
            .with_context(|| format!("Failed to resolve config path: {}", self.config_file))?;
        Utf8PathBuf::from_path_buf(absolute)
            .map_err(|p| anyhow::anyhow!("Config path is not valid UTF-8: {}", p.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = InitSettings::default();
        assert_eq!(settings.config_file, "project.json");
        assert_eq!(settings.local_data_subpath, "Source/GameFiles/SimpGamePS2");
        assert_eq!(settings.max_restarts, 1);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        fs::write(
            dir.join("remake-init.toml"),
            "config_file = \"engine.json\"\nmax_restarts = 3\n",
        )
        .unwrap();

        let settings = InitSettings::load_from(&dir).unwrap();
        assert_eq!(settings.config_file, "engine.json");
        assert_eq!(settings.max_restarts, 3);
        assert_eq!(settings.log_dir, "logs");
    }

    #[test]
    fn test_config_path_is_absolute() {
        let settings = InitSettings::default();
        let path = settings.config_path().unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.file_name(), Some("project.json"));
    }
}
