//! Report rendering and output.
//!
//! The text format is one `RuleId : message` line per difference between
//! a header and a `Total Issues` footer, so a saved report can be fed back
//! as a baseline.

use crate::diff::CompatReport;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }
}

/// Render the report as text.
#[must_use]
pub fn render_text(report: &CompatReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Compat issues with assembly {}:", report.implementation);

    let mut total = 0usize;
    for difference in report.differences() {
        let _ = writeln!(out, "{difference}");
        total += 1;
    }

    for entry in &report.unused_baseline_entries {
        let _ = writeln!(out, "# Unused baseline entry: {entry}");
    }

    let _ = write!(out, "Total Issues: {total}");
    out
}

/// Render the full report as pretty JSON.
pub fn render_json(report: &CompatReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Report written to {}", path.display());
            }
            Ok(())
        }
    }
}
