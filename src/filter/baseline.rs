//! Accepted-break baselines.
//!
//! A baseline is a previous text report: one `RuleId : message` line per
//! accepted difference. Report headers, `Total Issues` footers, blank
//! lines and `#` comments are ignored, so a saved report can be used as
//! a baseline unchanged.

use super::DifferenceFilter;
use crate::diff::Difference;
use crate::error::{CompatError, ErrorContext, Result};
use indexmap::IndexMap;
use std::path::Path;

const REPORT_HEADER_PREFIX: &str = "Compat issues with";
const REPORT_FOOTER_PREFIX: &str = "Total Issues:";

/// Suppresses differences listed in one or more baseline files and
/// remembers which entries were used.
#[derive(Debug, Clone, Default)]
pub struct BaselineFilter {
    /// Entry -> matched at least once
    entries: IndexMap<String, bool>,
}

impl BaselineFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse baseline text.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut filter = Self::new();
        filter.add_content(content);
        filter
    }

    /// Read one baseline file. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut filter = Self::new();
        filter.add_file(path)?;
        Ok(filter)
    }

    /// Read and merge several baseline files.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut filter = Self::new();
        for path in paths {
            filter.add_file(path.as_ref())?;
        }
        Ok(filter)
    }

    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(CompatError::baseline(format!(
                "baseline file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompatError::io(path, e))
            .with_context(|| format!("reading baseline {}", path.display()))?;
        let before = self.entries.len();
        self.add_content(&content);
        tracing::debug!(
            "Loaded {} baseline entries from {}",
            self.entries.len() - before,
            path.display()
        );
        Ok(())
    }

    fn add_content(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with(REPORT_HEADER_PREFIX)
                || line.starts_with(REPORT_FOOTER_PREFIX)
            {
                continue;
            }
            self.entries.entry(line.to_string()).or_insert(false);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, difference: &Difference) -> bool {
        self.entries.contains_key(&difference.baseline_key())
    }

    /// Entries that matched no difference, in file order.
    #[must_use]
    pub fn unused_entries(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, used)| !**used)
            .map(|(entry, _)| entry.clone())
            .collect()
    }
}

impl DifferenceFilter for BaselineFilter {
    fn include(&mut self, difference: &Difference) -> bool {
        match self.entries.get_mut(&difference.baseline_key()) {
            Some(used) => {
                *used = true;
                false
            }
            None => true,
        }
    }

    fn name(&self) -> &'static str {
        "baseline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DifferenceType;
    use std::io::Write;

    const BASELINE: &str = "\
Compat issues with assembly Widgets:
# accepted in 2.0
CannotSealType : Type 'Ns.Widget' is sealed in the implementation but not sealed in the contract.

MembersMustExist : Member 'Ns.Widget.Run()' does not exist in the implementation \
but it does exist in the contract.
Total Issues: 2
";

    fn sealed() -> Difference {
        Difference::incompatible(
            "CannotSealType",
            "Type 'Ns.Widget' is sealed in the implementation but not sealed in the contract.",
            DifferenceType::Changed,
        )
    }

    #[test]
    fn test_parse_skips_headers_and_comments() {
        let filter = BaselineFilter::parse(BASELINE);
        assert_eq!(filter.len(), 2);
        assert!(filter.contains(&sealed()));
    }

    #[test]
    fn test_include_marks_entries_used() {
        let mut filter = BaselineFilter::parse(BASELINE);
        assert!(!filter.include(&sealed()));

        let other =
            Difference::incompatible("CannotMakeTypeAbstract", "other", DifferenceType::Changed);
        assert!(filter.include(&other));

        let unused = filter.unused_entries();
        assert_eq!(unused.len(), 1);
        assert!(unused[0].starts_with("MembersMustExist"));
    }

    #[test]
    fn test_from_files_merges() {
        let mut first = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(first, "A : one").expect("write");
        let mut second = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(second, "B : two").expect("write");
        writeln!(second, "A : one").expect("write");

        let filter = BaselineFilter::from_files(&[first.path(), second.path()]).expect("load");
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_missing_file_is_baseline_error() {
        let err = BaselineFilter::from_file(Path::new("/nonexistent/baseline.txt")).unwrap_err();
        assert!(matches!(err, CompatError::Baseline(_)));
    }
}
