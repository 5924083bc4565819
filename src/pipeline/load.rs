//! Snapshot loading.
//!
//! A snapshot is one [`ApiSurface`] serialized as JSON or YAML. The format
//! follows the file extension.

use crate::error::{CompatError, ErrorContext, LoadErrorKind, Result};
use crate::model::ApiSurface;
use std::path::Path;

/// Serialization of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(CompatError::load(
                path.display().to_string(),
                LoadErrorKind::UnsupportedFormat(extension),
            )),
        }
    }
}

/// Parse snapshot text.
pub fn parse_surface_str(content: &str, format: SnapshotFormat) -> Result<ApiSurface> {
    let surface: ApiSurface = match format {
        SnapshotFormat::Json => serde_json::from_str(content)?,
        SnapshotFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(surface)
}

/// Read and parse one snapshot file.
///
/// A surface with an empty name takes the file stem.
pub fn load_surface(path: &Path, quiet: bool) -> Result<ApiSurface> {
    if !quiet {
        tracing::info!("Loading API surface: {}", path.display());
    }

    let format = SnapshotFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| CompatError::io(path, e))
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let mut surface = parse_surface_str(&content, format)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;

    if surface.name.is_empty() {
        surface.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    if !quiet {
        tracing::info!(
            "Loaded {} types, {} members from {}",
            surface.types.len(),
            surface.member_count(),
            surface.name
        );
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SNAPSHOT: &str = r#"{
        "name": "Widgets",
        "types": [
            {
                "full_name": "Ns.Widget",
                "kind": "class",
                "members": [
                    { "name": ".ctor", "kind": "constructor" },
                    { "name": "Run", "kind": "method", "modifiers": { "is_virtual": true } }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SnapshotFormat::from_path(Path::new("a.JSON")).ok(), Some(SnapshotFormat::Json));
        assert_eq!(SnapshotFormat::from_path(Path::new("a.yml")).ok(), Some(SnapshotFormat::Yaml));
        let err = SnapshotFormat::from_path(Path::new("a.dll")).unwrap_err();
        assert!(err.to_string().contains("a.dll"));
    }

    #[test]
    fn test_parse_json_snapshot() {
        let surface = parse_surface_str(SNAPSHOT, SnapshotFormat::Json).expect("valid snapshot");
        assert_eq!(surface.name, "Widgets");
        assert_eq!(surface.types[0].members.len(), 2);
        assert!(surface.types[0].members[1].modifiers.is_virtual);
    }

    #[test]
    fn test_parse_yaml_snapshot() {
        let yaml = "
name: Widgets
types:
  - full_name: Ns.IWidget
    kind: interface
    is_abstract: true
";
        let surface = parse_surface_str(yaml, SnapshotFormat::Yaml).expect("valid snapshot");
        assert!(surface.types[0].is_interface());
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let err = parse_surface_str("{ not json", SnapshotFormat::Json).unwrap_err();
        assert!(matches!(err, CompatError::Load { .. }));
    }

    #[test]
    fn test_load_surface_defaults_name_to_stem() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path: PathBuf = dir.path().join("contract.json");
        std::fs::write(&path, r#"{ "types": [] }"#).expect("write snapshot");

        let surface = load_surface(&path, true).expect("load");
        assert_eq!(surface.name, "contract");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_surface(Path::new("/nonexistent/contract.json"), true).unwrap_err();
        assert!(matches!(err, CompatError::Io { .. }));
        assert!(err.to_string().contains("reading snapshot"));
    }
}
