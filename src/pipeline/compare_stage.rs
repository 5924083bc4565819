//! Comparison stage.
//!
//! Builds the comparer, rule set and engine from configuration, runs the
//! comparison, then applies baselines and compatible-difference hiding.

use super::exit_codes;
use crate::config::{AppConfig, FiltersConfig};
use crate::diff::{CompatEngine, CompatReport, RuleRegistry};
use crate::filter::{apply_filter, AttributeFilter, BaselineFilter, IncompatibleOnlyFilter};
use crate::model::{ApiSurface, NamespaceRemappingComparer, OrdinalTypeComparer, TypeComparer};
use crate::rules::standard_rules;
use anyhow::{Context, Result};

/// Type-name comparer for the configured namespace remapping.
pub fn build_comparer(filters: &FiltersConfig) -> Result<Box<dyn TypeComparer>> {
    if filters.namespace_remap.is_empty() {
        return Ok(Box::new(OrdinalTypeComparer));
    }
    let comparer = NamespaceRemappingComparer::new(&filters.namespace_remap)
        .context("Invalid namespace remapping")?;
    tracing::debug!("Namespace remapping with {} entries", comparer.len());
    Ok(Box::new(comparer))
}

/// Attribute exclusions: built-in list, configured patterns, then the exclusion file.
pub fn build_attribute_filter(filters: &FiltersConfig) -> Result<AttributeFilter> {
    let base = if filters.default_attribute_exclusions {
        AttributeFilter::with_defaults()
    } else {
        AttributeFilter::new()
    };
    let mut filter = base
        .with_patterns(&filters.exclude_attributes)
        .context("Invalid attribute exclusion pattern")?;
    if let Some(path) = &filters.exclude_attributes_file {
        filter.add_ignore_file(path).with_context(|| {
            format!("Failed to load attribute exclusions from {}", path.display())
        })?;
    }
    Ok(filter)
}

/// The rule set selected by configuration.
pub fn build_registry(config: &AppConfig) -> Result<RuleRegistry> {
    let attribute_filter = build_attribute_filter(&config.filters)?;
    Ok(standard_rules(config.rules.settings(), attribute_filter)
        .enforcing_optional(config.rules.enforce_optional_rules)
        .without(&config.rules.disabled_rules))
}

/// Compare `implementation` against `contract` and post-process the report.
pub fn compute_compat(
    config: &AppConfig,
    implementation: &ApiSurface,
    contract: &ApiSurface,
) -> Result<CompatReport> {
    let quiet = config.behavior.quiet;

    let registry = build_registry(config)?;
    if !quiet {
        tracing::info!("Running {} compatibility rules...", registry.len());
    }

    let engine = CompatEngine::new(registry)
        .with_comparer(build_comparer(&config.filters)?)
        .with_operands(config.operands.clone())
        .parallel(config.behavior.parallel);

    let mut report = engine
        .compare(implementation, contract)
        .context("Failed to compare API surfaces")?;

    if !config.filters.baseline_files.is_empty() {
        let mut baseline = BaselineFilter::from_files(&config.filters.baseline_files)
            .context("Failed to load baseline")?;
        let suppressed = apply_filter(&mut report, &mut baseline);
        if !quiet {
            tracing::info!("Baseline suppressed {} differences", suppressed);
        }
        if config.filters.validate_baseline {
            report.unused_baseline_entries = baseline.unused_entries();
            for entry in &report.unused_baseline_entries {
                tracing::warn!("Baseline entry matched nothing: {}", entry);
            }
        }
    }

    if !config.behavior.include_compatible {
        apply_filter(&mut report, &mut IncompatibleOnlyFilter);
    }

    if !quiet {
        tracing::info!(
            "{} incompatible, {} compatible differences ({} types, {} members compared)",
            report.summary.incompatible,
            report.summary.compatible,
            report.summary.types_compared,
            report.summary.members_compared
        );
    }

    Ok(report)
}

/// Process exit code for a finished report.
///
/// Remaining incompatible differences win over unused baseline entries.
#[must_use]
pub fn exit_code_for(report: &CompatReport, config: &AppConfig) -> i32 {
    if config.behavior.fail_on_incompatible && report.has_incompatible() {
        exit_codes::INCOMPATIBLE
    } else if config.filters.validate_baseline && !report.unused_baseline_entries.is_empty() {
        exit_codes::BASELINE_VALIDATION_FAILED
    } else {
        exit_codes::SUCCESS
    }
}
