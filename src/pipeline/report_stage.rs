//! Report output stage.

use super::{render_json, render_text, write_output, OutputTarget};
use crate::config::{OutputConfig, OutputFormat};
use crate::diff::CompatReport;
use anyhow::Result;

/// Render `report` in the configured format and write it to the configured target.
pub fn output_report(output: &OutputConfig, report: &CompatReport, quiet: bool) -> Result<()> {
    let content = match output.format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report)?,
    };
    let target = OutputTarget::from_option(output.file.clone());
    write_output(&content, &target, quiet)
}
