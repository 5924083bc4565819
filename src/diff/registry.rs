//! Statically assembled, ordered rule set.

use super::DifferenceRule;

/// Name and optionality of a registered rule, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub name: &'static str,
    pub optional: bool,
}

impl std::fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.optional {
            write!(f, "{} (optional)", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

/// Ordered list of rules. Evaluation follows registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn DifferenceRule>>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl DifferenceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn register(&mut self, rule: Box<dyn DifferenceRule>) {
        self.rules.push(rule);
    }

    /// Drop optional rules unless `enforce_optional` is set.
    #[must_use]
    pub fn enforcing_optional(mut self, enforce_optional: bool) -> Self {
        if !enforce_optional {
            self.rules.retain(|r| !r.is_optional());
        }
        self
    }

    /// Drop rules by name (case-insensitive).
    #[must_use]
    pub fn without<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        if names.is_empty() {
            return self;
        }
        self.rules.retain(|rule| {
            let disabled = names.iter().any(|n| n.as_ref().eq_ignore_ascii_case(rule.name()));
            if disabled {
                tracing::debug!("Rule {} disabled by configuration", rule.name());
            }
            !disabled
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DifferenceRule> {
        self.rules.iter().map(|rule| &**rule)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// Rules sorted by name, case-insensitively.
    #[must_use]
    pub fn descriptors(&self) -> Vec<RuleDescriptor> {
        let mut descriptors: Vec<RuleDescriptor> = self
            .rules
            .iter()
            .map(|rule| RuleDescriptor {
                name: rule.name(),
                optional: rule.is_optional(),
            })
            .collect();
        descriptors.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(b.name))
        });
        descriptors
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rules.iter().map(|r| r.name())).finish()
    }
}
