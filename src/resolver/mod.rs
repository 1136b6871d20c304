//! Source path resolution workflow.
//!
//! [`SourcePathResolver::resolve`] runs one pass of the workflow:
//!
//! 1. Load `project.json`, or create it and stop with [`Outcome::Created`]
//! 2. Validate the recorded `TSGPS2SourcePath`
//! 3. If that fails, ask the operator for a directory until one exists
//! 4. Unless the project already has local game files, ask whether to copy,
//!    move or use the source in place
//! 5. Save the effective path, validate it (following `USRDIR` if present)
//!    and save the validated root
//!
//! The config file is rewritten at every checkpoint so a crash after a
//! transfer does not lose the relocation.

mod outcome;

pub use outcome::{Outcome, Status, report_outcome};

use crate::config::{ConfigError, ConfigStore};
use crate::console::{Operator, Severity};
use crate::error::InitError;
use crate::models::{DirectoryLayout, ProjectConfig, TransferChoice};
use crate::services::{self, DirectorySetValidator, require_directory};
use crate::settings::InitSettings;
use camino::{Utf8Path, Utf8PathBuf};

/// Either continue with a value or stop the run with a terminal outcome.
type Step<T> = Result<T, Outcome>;

#[derive(Debug, Clone)]
pub struct SourcePathResolver {
    store: ConfigStore,
    project_dir: Utf8PathBuf,
    local_data_path: Utf8PathBuf,
    validator: DirectorySetValidator,
}

impl SourcePathResolver {
    /// Build a resolver for the config file at `config_path`.
    ///
    /// # Arguments
    /// * `config_path` - Location of `project.json`; its parent is the project directory
    /// * `local_data_subpath` - Where copied or moved game files go, relative
    ///   to the project directory (e.g., "Source/GameFiles/SimpGamePS2")
    pub fn new<P: AsRef<Utf8Path>>(config_path: P, local_data_subpath: &str) -> Self {
        let config_path = config_path.as_ref().to_path_buf();
        let project_dir = config_path
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        let local_data_path = project_dir.join(local_data_subpath);

        Self {
            store: ConfigStore::new(&config_path),
            project_dir,
            local_data_path,
            validator: DirectorySetValidator::default(),
        }
    }

    pub fn from_settings(settings: &InitSettings) -> anyhow::Result<Self> {
        let config_path = settings.config_path()?;
        Ok(Self::new(config_path, &settings.local_data_subpath))
    }

    /// Replace the required-directory layout.
    pub fn with_layout(mut self, layout: DirectoryLayout) -> Self {
        self.validator = DirectorySetValidator::new(layout);
        self
    }

    pub fn config_path(&self) -> &Utf8Path {
        self.store.config_path()
    }

    pub fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    pub fn local_data_path(&self) -> &Utf8Path {
        &self.local_data_path
    }

    /// Run the workflow once and return where it ended.
    ///
    /// Every failure is folded into the returned [`Outcome`].
    pub fn resolve(&self, operator: &mut dyn Operator) -> Outcome {
        match self.run(operator) {
            Ok(outcome) | Err(outcome) => {
                tracing::info!("Resolver finished with status {}", outcome.status());
                outcome
            }
        }
    }

    fn run(&self, operator: &mut dyn Operator) -> Step<Outcome> {
        let mut config = match self.store.load() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => return Ok(self.create(operator)),
            Err(source) => {
                operator.emit(Severity::Error, &source.to_string());
                return Err(Outcome::ConfigIoError(InitError::ConfigRead {
                    path: self.config_path().to_path_buf(),
                    source,
                }));
            }
        };
        operator.emit(
            Severity::Info,
            &format!("File '{}' exists. Verifying content...", self.config_path()),
        );

        if config.ensure_project_path(self.project_dir.as_str()) {
            tracing::info!("Filled missing project_path with {}", self.project_dir);
        }

        let confirmed = match self.check_recorded_path(&config, operator) {
            Some(path) => path,
            None => self.prompt_for_source(&mut config, operator)?,
        };
        tracing::info!("Source path confirmed: {}", confirmed);

        operator.emit(Severity::Info, &format!("Validated source path: '{}'", confirmed));
        operator.emit(
            Severity::Info,
            &format!("Local project data path: '{}'", self.local_data_path),
        );

        let effective = if self.local_data_path.exists() {
            operator.emit(
                Severity::Info,
                "Local project data already exists, skipping file handling.",
            );
            self.local_data_path.clone()
        } else {
            self.choose_transfer(&confirmed, operator)?
        };

        self.revalidate(&mut config, &effective, operator)
    }

    fn create(&self, operator: &mut dyn Operator) -> Outcome {
        operator.emit(
            Severity::Warning,
            &format!("File '{}' not found. Creating it...", self.config_path()),
        );

        match self.store.create_default(&self.project_dir) {
            Ok(_) => {
                operator.emit(
                    Severity::Success,
                    &format!("File '{}' created successfully.", self.config_path()),
                );
                Outcome::Created {
                    config_path: self.config_path().to_path_buf(),
                }
            }
            Err(source) => {
                operator.emit(Severity::Error, &source.to_string());
                Outcome::ConfigIoError(InitError::ConfigCreate {
                    path: self.config_path().to_path_buf(),
                    source,
                })
            }
        }
    }

    /// The recorded source path, if it still exists and has a valid layout.
    fn check_recorded_path(
        &self,
        config: &ProjectConfig,
        operator: &mut dyn Operator,
    ) -> Option<Utf8PathBuf> {
        let recorded = Utf8PathBuf::from(config.source_path()?);

        if require_directory(&recorded).is_err() {
            operator.emit(
                Severity::Warning,
                &format!(
                    "Configured SourcePath '{}' is not currently a valid directory.",
                    recorded
                ),
            );
            return None;
        }

        operator.emit(
            Severity::Info,
            &format!("Found SourcePath in config: '{}'", recorded),
        );
        let root = self.validation_root(&recorded, operator);
        if self.validator.validate_against_either_set(&root).valid {
            Some(recorded)
        } else {
            operator.emit(
                Severity::Warning,
                &format!(
                    "Could not find all required subdirectories from either list within '{}'.",
                    root
                ),
            );
            None
        }
    }

    /// Ask until the operator names an existing directory.
    ///
    /// The answer is saved under the provisional key. A failed save only
    /// warns; the run continues with the path held in memory.
    fn prompt_for_source(
        &self,
        config: &mut ProjectConfig,
        operator: &mut dyn Operator,
    ) -> Step<Utf8PathBuf> {
        operator.emit(
            Severity::Warning,
            &format!(
                "'RemakeEngine.Directories.TSGPS2SourcePath' in '{}' is missing, empty, or invalid.",
                self.config_path()
            ),
        );

        loop {
            let Some(line) = operator.prompt_line("Please enter the full path to the source directory:")
            else {
                operator.emit(Severity::Error, "Input closed before a source path was given.");
                return Err(Outcome::UserInputInvalid);
            };

            let candidate = clean_input(&line);
            if candidate.is_empty() {
                operator.emit(Severity::Warning, "Path cannot be empty. Please try again.");
                continue;
            }

            let path = Utf8PathBuf::from(candidate);
            if let Err(e) = require_directory(&path) {
                operator.emit(Severity::Error, &format!("{}. Please try again.", e));
                continue;
            }

            operator.emit(
                Severity::Success,
                &format!("Path '{}' is a valid directory.", path),
            );
            config.set_provisional_source_path(path.as_str());
            match self.store.save(config) {
                Ok(()) => operator.emit(
                    Severity::Success,
                    &format!("Config file '{}' updated.", self.config_path()),
                ),
                Err(e) => {
                    tracing::warn!("Provisional save failed: {}", e);
                    operator.emit(Severity::Error, &e.to_string());
                    operator.emit(
                        Severity::Warning,
                        "Proceeding with the provided path, but the config file was not saved.",
                    );
                }
            }
            return Ok(path);
        }
    }

    /// Ask how to bring the source into the project and carry it out.
    fn choose_transfer(
        &self,
        confirmed: &Utf8Path,
        operator: &mut dyn Operator,
    ) -> Step<Utf8PathBuf> {
        let source_name = confirmed.file_name().unwrap_or(confirmed.as_str());
        let local_name = self
            .local_data_path
            .file_name()
            .unwrap_or(self.local_data_path.as_str());

        operator.emit(Severity::Info, "Choose how to use the source files:");
        for choice in TransferChoice::ALL {
            let description = match choice {
                TransferChoice::Copy => format!(
                    "Copy files from '{}' to local '{}' (Recommended, Safe)",
                    source_name, local_name
                ),
                TransferChoice::Move => format!(
                    "Move files from '{}' to local '{}' (Warning: removes the original files)",
                    source_name, local_name
                ),
                TransferChoice::UseInPlace => format!(
                    "Use '{}' directly (Warning: later steps might modify or corrupt the original files)",
                    source_name
                ),
            };
            operator.emit(
                Severity::Info,
                &format!("  {}) {}", choice.key(), description),
            );
        }

        loop {
            let Some(line) = operator.prompt_line("Enter your choice (1, 2, or 3):") else {
                operator.emit(Severity::Error, "Input closed before a choice was made.");
                return Err(Outcome::UserInputInvalid);
            };

            let choice = match line.parse::<TransferChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    operator.emit(
                        Severity::Warning,
                        &format!("{}. Please enter 1, 2, or 3.", e),
                    );
                    continue;
                }
            };
            tracing::info!("Operator chose {}", choice);

            match choice {
                TransferChoice::Copy => {
                    operator.emit(
                        Severity::Info,
                        &format!(
                            "Copying files from '{}' to '{}'...",
                            confirmed, self.local_data_path
                        ),
                    );
                    return match services::copy_tree(confirmed, &self.local_data_path, |p| {
                        operator.report_progress(p)
                    }) {
                        Ok(summary) => {
                            operator.emit(
                                Severity::Success,
                                &format!("Copy successful ({} files).", summary.files),
                            );
                            Ok(self.local_data_path.clone())
                        }
                        Err(e) => Err(self.transfer_failed("copy", e, operator)),
                    };
                }
                TransferChoice::Move => {
                    if self.local_data_path.exists() {
                        operator.emit(
                            Severity::Error,
                            &format!(
                                "Destination path '{}' already exists. Cannot move.",
                                self.local_data_path
                            ),
                        );
                        operator.emit(
                            Severity::Warning,
                            &format!(
                                "Remove the existing directory or choose Copy ({}) or Use original ({}).",
                                TransferChoice::Copy.key(),
                                TransferChoice::UseInPlace.key()
                            ),
                        );
                        continue;
                    }

                    operator.emit(
                        Severity::Warning,
                        &format!(
                            "Moving files from '{}' to '{}'...",
                            confirmed, self.local_data_path
                        ),
                    );
                    return match services::move_tree(confirmed, &self.local_data_path, |p| {
                        operator.report_progress(p)
                    }) {
                        Ok(_) => {
                            operator.emit(Severity::Success, "Move successful.");
                            Ok(self.local_data_path.clone())
                        }
                        Err(e) => Err(self.transfer_failed("move", e, operator)),
                    };
                }
                TransferChoice::UseInPlace => {
                    operator.emit(
                        Severity::Info,
                        &format!("Using original path '{}' directly.", confirmed),
                    );
                    operator.emit(
                        Severity::Warning,
                        "Ensure you have a backup, as later operations might modify these files.",
                    );
                    return Ok(confirmed.to_path_buf());
                }
            }
        }
    }

    fn transfer_failed(
        &self,
        operation: &str,
        error: services::TransferError,
        operator: &mut dyn Operator,
    ) -> Outcome {
        tracing::error!("{} failed: {}", operation, error);
        operator.emit(
            Severity::Error,
            &format!("Error during {} operation: {}", operation, error),
        );
        operator.emit(Severity::Error, "Cannot proceed with file operations.");
        Outcome::FatalTransferError(error)
    }

    /// Save `effective`, validate it and save the root that was checked.
    fn revalidate(
        &self,
        config: &mut ProjectConfig,
        effective: &Utf8Path,
        operator: &mut dyn Operator,
    ) -> Step<Outcome> {
        config.set_source_path(effective.as_str());
        self.checkpoint(config, operator)?;

        operator.emit(
            Severity::Info,
            &format!("Using effective source path for validation: '{}'", effective),
        );
        let root = self.validation_root(effective, operator);
        let layout_match = self.validator.validate_against_either_set(&root);

        if root != effective {
            config.set_source_path(root.as_str());
            self.checkpoint(config, operator)?;
        }

        match layout_match.matched {
            Some(matched) => {
                operator.emit(
                    Severity::Success,
                    &format!(
                        "Validation passed. All required subdirectories from the {} list found within '{}'.",
                        matched, root
                    ),
                );
                Ok(Outcome::Valid { root, matched })
            }
            None => {
                self.report_missing(&root, effective, operator);
                Ok(Outcome::InvalidSubdirs { checked: root })
            }
        }
    }

    fn validation_root(&self, path: &Utf8Path, operator: &mut dyn Operator) -> Utf8PathBuf {
        let root = self.validator.resolve_validation_root(path);
        if root != path {
            operator.emit(
                Severity::Info,
                &format!(
                    "Found '{}' subdirectory, validating inside '{}'.",
                    self.validator.layout().marker,
                    root
                ),
            );
        }
        root
    }

    fn report_missing(&self, root: &Utf8Path, effective: &Utf8Path, operator: &mut dyn Operator) {
        operator.emit(
            Severity::Error,
            &format!(
                "Validation failed. Could not find all required subdirectories from either list within '{}'.",
                root
            ),
        );
        if root != effective {
            operator.emit(
                Severity::Info,
                &format!(
                    "(This path was checked because '{}' was found inside '{}')",
                    self.validator.layout().marker,
                    effective
                ),
            );
        }
        for set in self.validator.layout().sets() {
            let missing = services::missing_dirs(root, set.dirs.as_slice());
            operator.emit(
                Severity::Info,
                &format!("  {} list is missing: {}", set.name, missing.join(", ")),
            );
        }
        operator.emit(
            Severity::Error,
            &format!("Action Required: Verify the contents of '{}'.", root),
        );
    }

    fn checkpoint(&self, config: &ProjectConfig, operator: &mut dyn Operator) -> Step<()> {
        match self.store.save(config) {
            Ok(()) => {
                operator.emit(
                    Severity::Success,
                    &format!("Config file '{}' updated.", self.config_path()),
                );
                Ok(())
            }
            Err(source) => {
                operator.emit(Severity::Error, &source.to_string());
                Err(Outcome::ConfigIoError(InitError::ConfigUpdate {
                    path: self.config_path().to_path_buf(),
                    source,
                }))
            }
        }
    }
}

/// Run the resolver, re-running it after a fresh config was created at most
/// `max_restarts` times.
pub fn run_until_settled(
    resolver: &SourcePathResolver,
    operator: &mut dyn Operator,
    max_restarts: u32,
) -> Outcome {
    let mut restarts = 0;
    loop {
        let outcome = resolver.resolve(operator);
        if outcome.status() != Status::Created || restarts >= max_restarts {
            return outcome;
        }
        restarts += 1;
        tracing::info!("Config created, restarting workflow ({}/{})", restarts, max_restarts);
    }
}

/// Trim operator input and drop one pair of surrounding quotes, as left by
/// pasting a path from a file manager.
fn clean_input(line: &str) -> &str {
    let trimmed = line.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}
