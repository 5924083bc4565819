//! Compare command handler.
//!
//! Implements the `compare` subcommand: check an implementation snapshot
//! against a contract snapshot.

use crate::config::{AppConfig, ComparePaths, Validatable};
use crate::pipeline::{compute_compat, exit_code_for, load_surface, output_report, PipelineError};
use anyhow::Result;
use std::path::Path;

/// Run the compare command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_compare(config: &AppConfig, paths: &ComparePaths) -> Result<i32> {
    let quiet = config.behavior.quiet;

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("Invalid configuration: {}", error);
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    let contract = load(&paths.contract, quiet)?;
    let implementation = load(&paths.implementation, quiet)?;

    let report = compute_compat(config, &implementation, &contract)
        .map_err(|source| PipelineError::CompareFailed { source })?;

    let exit_code = exit_code_for(&report, config);

    output_report(&config.output, &report, quiet)
        .map_err(|source| PipelineError::ReportFailed { source })?;

    Ok(exit_code)
}

fn load(path: &Path, quiet: bool) -> Result<crate::model::ApiSurface> {
    load_surface(path, quiet).map_err(|e| {
        PipelineError::LoadFailed {
            path: path.display().to_string(),
            source: e.into(),
        }
        .into()
    })
}
