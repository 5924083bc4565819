//! Attribute types excluded from attribute comparison.

use crate::error::{CompatError, ErrorContext, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Attributes whose presence says nothing about API compatibility.
pub const DEFAULT_EXCLUDED_ATTRIBUTES: &[&str] = &[
    "System.Reflection.AssemblyFileVersionAttribute",
    "System.Reflection.AssemblyInformationalVersionAttribute",
    "System.Reflection.AssemblyKeyFileAttribute",
    "System.Reflection.AssemblyProductAttribute",
    "System.Runtime.AssemblyTargetedPatchBandAttribute",
    "System.ObsoleteAttribute",
    "System.SupportedPlatformsAttribute",
    "System.Resources.SatelliteContractVersionAttribute",
    "System.Runtime.CompilerServices.TypeForwardedFromAttribute",
    "System.Runtime.CompilerServices.CompilerGeneratedAttribute",
    "System.Runtime.TargetedPatchingOptOutAttribute",
    "System.ComponentModel.EditorBrowsableAttribute",
    "System.Diagnostics.DebuggerDisplayAttribute",
    "System.Diagnostics.DebuggerTypeProxyAttribute",
    "System.Diagnostics.DebuggerBrowsableAttribute",
    "System.Runtime.CompilerServices.FriendAccessAllowedAttribute",
    "System.Runtime.CompilerServices.InternalsVisibleToAttribute",
    "System.Runtime.CompilerServices.ReferenceAssemblyAttribute",
    "System.Runtime.CompilerServices.ExtensionAttribute",
    "System.Security.UnverifiableCodeAttribute",
    "System.Security.SecuritySafeCriticalAttribute",
    "System.Security.SecurityCriticalAttribute",
    "System.Security.AllowPartiallyTrustedCallersAttribute",
    "System.Security.SecurityRulesAttribute",
    // Compiler markers; readonly and ref-struct shape is checked by classification.
    "System.Runtime.CompilerServices.IsReadOnlyAttribute",
    "System.Runtime.CompilerServices.IsByRefLikeAttribute",
];

/// Decides which attribute types the attribute rule skips.
///
/// Entries are exact type names or globs (`*`, `?`). A leading `T:`
/// documentation-id prefix is accepted and ignored.
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    exact: HashSet<String>,
    globs: Vec<(String, Regex)>,
}

impl AttributeFilter {
    /// An empty filter that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter seeded with [`DEFAULT_EXCLUDED_ATTRIBUTES`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut filter = Self::new();
        filter
            .exact
            .extend(DEFAULT_EXCLUDED_ATTRIBUTES.iter().map(ToString::to_string));
        filter
    }

    /// Add one exact name or glob.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        let pattern = strip_doc_id(pattern.trim());
        if pattern.is_empty() {
            return Ok(());
        }
        if pattern.contains(['*', '?']) {
            let regex = compile_glob(pattern)?;
            self.globs.push((pattern.to_string(), regex));
        } else {
            self.exact.insert(pattern.to_string());
        }
        Ok(())
    }

    /// Add every pattern.
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self.add_pattern(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add the entries of an exclusion file: one name per line, `#` comments.
    pub fn add_ignore_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompatError::io(path, e))
            .context("reading attribute exclusion file")?;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.add_pattern(line)?;
        }
        tracing::debug!("Loaded attribute exclusions from {}", path.display());
        Ok(())
    }

    #[must_use]
    pub fn should_exclude(&self, attribute_type: &str) -> bool {
        let name = strip_doc_id(attribute_type);
        self.exact.contains(name) || self.globs.iter().any(|(_, re)| re.is_match(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.globs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.globs.is_empty()
    }
}

fn strip_doc_id(name: &str) -> &str {
    name.strip_prefix("T:").unwrap_or(name)
}

/// Compile a `*`/`?` glob into an anchored regex.
pub(crate) fn compile_glob(pattern: &str) -> Result<Regex> {
    let regex_pattern = regex::escape(pattern).replace(r"\*", ".*").replace(r"\?", ".");
    Regex::new(&format!("^{regex_pattern}$"))
        .map_err(|e| CompatError::config(format!("Invalid glob pattern '{pattern}': {e}")))
}
