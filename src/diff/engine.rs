//! Rule evaluation over single mappings and whole surfaces.

use super::{
    CompatReport, DifferenceType, Differences, ElementLevel, MappingOutcome, Operands,
    RuleContext, RuleRegistry,
};
use crate::error::Result;
use crate::mapping::{pair_surfaces, MemberMapping, TypeMapping, TypePairing};
use crate::model::{ApiSurface, OrdinalTypeComparer, SurfaceIndex, TypeComparer};

/// Below this many type pairings the pass stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

/// Runs every registered rule over one mapping.
#[derive(Debug, Default)]
pub struct RuleEngine {
    registry: RuleRegistry,
}

impl RuleEngine {
    #[must_use]
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluate a type mapping.
    ///
    /// Rules run in registration order into one fresh accumulator, so the
    /// result depends on nothing but the mapping and the context.
    pub fn evaluate_type(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &TypeMapping<'_>,
    ) -> Result<MappingOutcome> {
        let mut differences = Differences::new();
        let mut merged = DifferenceType::Unknown;

        for rule in self.registry.iter() {
            let result = rule.diff_types(ctx, mapping, &mut differences)?;
            merged = merged.merge(result);
        }

        Ok(finish(
            mapping.representative().full_name.clone(),
            ElementLevel::Type,
            mapping.is_paired(),
            merged,
            differences,
        ))
    }

    /// Evaluate a member mapping.
    pub fn evaluate_member(
        &self,
        ctx: &RuleContext<'_>,
        mapping: &MemberMapping<'_>,
    ) -> Result<MappingOutcome> {
        let mut differences = Differences::new();
        let mut merged = DifferenceType::Unknown;

        for rule in self.registry.iter() {
            let result = rule.diff_members(ctx, mapping, &mut differences)?;
            merged = merged.merge(result);
        }

        Ok(finish(
            mapping.display_name(),
            ElementLevel::Member,
            mapping.both().is_some(),
            merged,
            differences,
        ))
    }

    /// Evaluate a type pairing: the type first, then its members in order.
    pub fn evaluate_pairing(
        &self,
        ctx: &RuleContext<'_>,
        pairing: &TypePairing<'_>,
    ) -> Result<Vec<MappingOutcome>> {
        let mut outcomes = Vec::with_capacity(1 + pairing.members.len());
        outcomes.push(self.evaluate_type(ctx, &pairing.mapping)?);
        for member in &pairing.members {
            outcomes.push(self.evaluate_member(ctx, member)?);
        }
        Ok(outcomes)
    }
}

fn finish(
    element: String,
    level: ElementLevel,
    paired: bool,
    merged: DifferenceType,
    differences: Differences,
) -> MappingOutcome {
    // A paired element no rule objected to is unchanged.
    let difference_type = if merged == DifferenceType::Unknown && paired {
        DifferenceType::Unchanged
    } else {
        merged
    };

    if !differences.is_empty() {
        tracing::debug!(
            "{} -> {} ({} differences)",
            element,
            difference_type,
            differences.len()
        );
    }

    MappingOutcome {
        element,
        level,
        difference_type,
        differences: differences.into_vec(),
    }
}

/// Compares a whole implementation surface against a contract surface.
pub struct CompatEngine {
    rule_engine: RuleEngine,
    comparer: Box<dyn TypeComparer>,
    operands: Operands,
    parallel: bool,
}

impl CompatEngine {
    /// Create an engine over the given rules with the ordinal comparer.
    #[must_use]
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            rule_engine: RuleEngine::new(registry),
            comparer: Box::new(OrdinalTypeComparer),
            operands: Operands::default(),
            parallel: true,
        }
    }

    /// Set the type comparer used for pairing and by every rule
    #[must_use]
    pub fn with_comparer(mut self, comparer: Box<dyn TypeComparer>) -> Self {
        self.comparer = comparer;
        self
    }

    /// Set the side labels used in messages
    #[must_use]
    pub fn with_operands(mut self, operands: Operands) -> Self {
        self.operands = operands;
        self
    }

    /// Allow fanning out type pairings across threads
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rule_engine
    }

    #[must_use]
    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    /// Pair both surfaces and run every rule over every mapping.
    ///
    /// Outcome order follows pairing order regardless of parallelism.
    pub fn compare(
        &self,
        implementation: &ApiSurface,
        contract: &ApiSurface,
    ) -> Result<CompatReport> {
        let implementation_index = SurfaceIndex::build(implementation);
        let contract_index = SurfaceIndex::build(contract);
        let ctx = RuleContext::new(
            self.comparer.as_ref(),
            &self.operands,
            &implementation_index,
            &contract_index,
        );

        let pairings = pair_surfaces(implementation, contract, self.comparer.as_ref())?;
        tracing::debug!(
            "Running {} rules over {} type pairings (comparer: {})",
            self.rule_engine.registry().len(),
            pairings.len(),
            self.comparer.name()
        );

        let parallel = self.parallel && pairings.len() > PARALLEL_THRESHOLD;
        let per_type: Vec<Vec<MappingOutcome>> = if parallel {
            use rayon::prelude::*;
            pairings
                .par_iter()
                .map(|p| self.rule_engine.evaluate_pairing(&ctx, p))
                .collect::<Result<_>>()?
        } else {
            pairings
                .iter()
                .map(|p| self.rule_engine.evaluate_pairing(&ctx, p))
                .collect::<Result<_>>()?
        };

        let mut report =
            CompatReport::new(&implementation.name, &contract.name, self.operands.clone());
        report.outcomes = per_type.into_iter().flatten().collect();
        report.calculate_summary();

        tracing::info!(
            "Compared {} types and {} members: {} incompatible, {} compatible differences",
            report.summary.types_compared,
            report.summary.members_compared,
            report.summary.incompatible,
            report.summary.compatible
        );

        Ok(report)
    }
}

impl std::fmt::Debug for CompatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatEngine")
            .field("rules", self.rule_engine.registry())
            .field("comparer", &self.comparer.name())
            .field("operands", &self.operands)
            .field("parallel", &self.parallel)
            .finish()
    }
}
