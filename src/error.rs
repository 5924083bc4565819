//! Unified error types for api-compat.
//!
//! Expected API breaks are never errors: they are reported as
//! [`Difference`](crate::diff::Difference) data. The variants here cover
//! input that cannot be compared at all and failures of the surrounding
//! tooling (files, configuration, baselines).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for api-compat operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompatError {
    /// Errors while reading an API surface snapshot
    #[error("Failed to load API surface: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// A mapping with neither side present
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// A type that is none of class, struct, interface, delegate or enum.
    /// This aborts the whole pass.
    #[error("Type '{type_name}' has an unsupported classification in the {side}")]
    UnsupportedClassification { type_name: String, side: String },

    /// Errors while reading or applying a baseline
    #[error("Baseline error: {0}")]
    Baseline(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Unsupported snapshot extension: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// Convenient Result type for api-compat operations
pub type Result<T> = std::result::Result<T, CompatError>;

impl CompatError {
    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    pub fn unsupported_classification(
        type_name: impl Into<String>,
        side: impl Into<String>,
    ) -> Self {
        Self::UnsupportedClassification {
            type_name: type_name.into(),
            side: side.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a baseline error
    pub fn baseline(message: impl Into<String>) -> Self {
        Self::Baseline(message.into())
    }

    /// Whether the error means the comparison itself is meaningless,
    /// as opposed to a tooling failure around it.
    #[must_use]
    pub fn is_fatal_invariant(&self) -> bool {
        matches!(self, Self::UnsupportedClassification { .. } | Self::InvalidMapping(_))
    }
}

impl From<std::io::Error> for CompatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CompatError {
    fn from(err: serde_json::Error) -> Self {
        Self::load("JSON deserialization", LoadErrorKind::InvalidJson(err.to_string()))
    }
}

impl From<serde_yaml::Error> for CompatError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::load("YAML deserialization", LoadErrorKind::InvalidYaml(err.to_string()))
    }
}

/// Extension trait for adding context to errors.
///
/// ```ignore
/// use api_compat::error::ErrorContext;
///
/// let content = std::fs::read_to_string(path).context("reading contract snapshot")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error, prepended to any existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CompatError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: CompatError, new_ctx: &str) -> CompatError {
    match err {
        CompatError::Load {
            context: existing,
            source,
        } => CompatError::Load {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CompatError::Io {
            path,
            message,
            source,
        } => CompatError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CompatError::Config(msg) => CompatError::Config(chain_context(new_ctx, &msg)),
        CompatError::Baseline(msg) => CompatError::Baseline(chain_context(new_ctx, &msg)),
        CompatError::InvalidMapping(msg) => {
            CompatError::InvalidMapping(chain_context(new_ctx, &msg))
        }
        // No free-form context to chain.
        err @ CompatError::UnsupportedClassification { .. } => err,
    }
}

/// `"new: existing"`, or just `new` when there is no existing context.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
