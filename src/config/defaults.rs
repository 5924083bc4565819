//! Named configuration presets.

use super::types::{AppConfig, BehaviorConfig, RulesConfig};

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Required rules only, compatible differences hidden
    Default,
    /// Optional rules enforced as well
    Strict,
    /// Default interface members tolerated, compatible differences shown
    Lenient,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "strict" => Some(Self::Strict),
            "lenient" | "permissive" => Some(Self::Lenient),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Required compatibility rules; compatible differences hidden",
            Self::Strict => "All rules including visibility and parameter-name checks",
            Self::Lenient => "Tolerates default interface members and shows compatible differences",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Lenient]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Lenient => Self::lenient_preset(),
        }
    }

    /// Every rule runs, optional ones included.
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            rules: RulesConfig {
                enforce_optional_rules: true,
                ..RulesConfig::default()
            },
            ..Self::default()
        }
    }

    /// Default interface members tolerated; informational differences kept.
    #[must_use]
    pub fn lenient_preset() -> Self {
        Self {
            rules: RulesConfig {
                allow_default_interface_methods: true,
                ..RulesConfig::default()
            },
            behavior: BehaviorConfig {
                include_compatible: true,
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }
}
