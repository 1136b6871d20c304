//! RemakeEngine init - command-line entry point.
//!
//! # Execution Flow
//!
//! 1. Load [`InitSettings`] (defaults, `remake-init.toml`, `REMAKE_INIT_*`)
//! 2. Initialize logging → `logs/remake-init.<date>`
//! 3. Resolve the game source path, re-running once after creating `project.json`
//! 4. Print the final status and hand the validated path to the pipeline
//!
//! Exits non-zero unless the source path validated or a fresh config was created.

use anyhow::{Context, Result};
use camino::Utf8Path;
use remake_init::{
    APP_NAME, InitSettings, Operator, Severity, SourcePathResolver, Status, StdConsole, VERSION,
    report_outcome, run_until_settled,
};

fn main() -> Result<()> {
    let settings = InitSettings::load()?;

    let _guard = remake_init::logging::setup_logging_with_console(
        Utf8Path::new(&settings.log_dir),
        &settings.log_prefix,
        settings.debug_mode,
        settings.console_log,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let resolver = SourcePathResolver::from_settings(&settings)?;
    tracing::info!(
        "Config file: {}, local data path: {}",
        resolver.config_path(),
        resolver.local_data_path()
    );

    let mut console = StdConsole::new();
    let outcome = run_until_settled(&resolver, &mut console, settings.max_restarts);
    report_outcome(&outcome, &mut console);

    if outcome.status() == Status::Created {
        return Ok(());
    }

    let source_path = outcome
        .into_result()
        .context("Cannot proceed due to configuration or file operation issues")?;

    console.emit(
        Severity::Success,
        &format!(
            "Proceeding with operations using validated source directory: {}",
            source_path
        ),
    );
    tracing::info!("Handing off source path {}", source_path);

    Ok(())
}
