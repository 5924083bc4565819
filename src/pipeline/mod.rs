//! Pipeline orchestration for compatibility runs.
//!
//! load -> compare -> filter -> report, shared by the CLI handlers.

mod compare_stage;
mod load;
mod output;
mod report_stage;

pub use compare_stage::{
    build_attribute_filter, build_comparer, build_registry, compute_compat, exit_code_for,
};
pub use load::{load_surface, parse_surface_str, SnapshotFormat};
pub use output::{render_json, render_text, write_output, OutputTarget};
pub use report_stage::output_report;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse a snapshot
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Comparison failed: {source}")]
    CompareFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// No incompatible differences (or `--no-fail-on-incompatible`)
    pub const SUCCESS: i32 = 0;
    /// Incompatible differences remain after filtering
    pub const INCOMPATIBLE: i32 = 1;
    /// Baseline validation found unused entries
    pub const BASELINE_VALIDATION_FAILED: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::INCOMPATIBLE, 1);
        assert_eq!(exit_codes::BASELINE_VALIDATION_FAILED, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::LoadFailed {
            path: "ref.json".to_string(),
            source: anyhow::anyhow!("bad json"),
        };
        assert_eq!(err.to_string(), "Load failed for ref.json: bad json");
    }
}
