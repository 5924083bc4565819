//! Type equality used when pairing and comparing references.

use super::TypeRef;
use regex::Regex;
use std::borrow::Cow;

/// Decides whether two type references denote the same type.
///
/// One comparer is shared read-only by every rule for a whole pass.
pub trait TypeComparer: Send + Sync {
    /// Canonical key; references with equal keys are the same type.
    fn key<'a>(&self, reference: &'a TypeRef) -> Cow<'a, str>;

    fn equals(&self, left: &TypeRef, right: &TypeRef) -> bool {
        self.key(left) == self.key(right)
    }

    fn name(&self) -> &'static str;
}

/// Exact, case-sensitive comparison of display names.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalTypeComparer;

impl TypeComparer for OrdinalTypeComparer {
    fn key<'a>(&self, reference: &'a TypeRef) -> Cow<'a, str> {
        Cow::Borrowed(reference.name())
    }

    fn name(&self) -> &'static str {
        "ordinal"
    }
}

/// Treats types in a moved namespace as the same type, e.g. with
/// `System.Runtime.Old -> System.Runtime` both `System.Runtime.Old.Thing`
/// and `System.Runtime.Thing` key to `System.Runtime.Thing`.
///
/// Prefixes are rewritten wherever a namespace starts inside the name,
/// including generic arguments.
#[derive(Debug, Clone)]
pub struct NamespaceRemappingComparer {
    rewrites: Vec<(Regex, String)>,
}

impl NamespaceRemappingComparer {
    /// Build from `(from, to)` namespace pairs.
    pub fn new<I, S>(remap: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let rewrites = remap
            .into_iter()
            .map(|(from, to)| {
                let pattern = format!(
                    r"(?P<pre>^|[<,\[\s(])(?:{})(?P<post>\.|$|[>,\]\s)])",
                    regex::escape(from.as_ref())
                );
                Regex::new(&pattern).map(|re| (re, format!("${{pre}}{}${{post}}", to.as_ref())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rewrites })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rewrites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }
}

impl TypeComparer for NamespaceRemappingComparer {
    fn key<'a>(&self, reference: &'a TypeRef) -> Cow<'a, str> {
        let mut key = Cow::Borrowed(reference.name());
        for (pattern, replacement) in &self.rewrites {
            if pattern.is_match(&key) {
                key = Cow::Owned(pattern.replace_all(&key, replacement.as_str()).into_owned());
            }
        }
        key
    }

    fn name(&self) -> &'static str {
        "namespace-remapping"
    }
}
