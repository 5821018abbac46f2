//! Synthesizer configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use synth_types::env_utils::{env_bool_or, env_string_or};

pub const EMIT_ENV: &str = "ABSTRACT_SYNTH_EMIT";
pub const SUFFIX_ENV: &str = "ABSTRACT_SYNTH_SUFFIX";
pub const MODULE_PREFIX_ENV: &str = "ABSTRACT_SYNTH_MODULE_PREFIX";

pub const DEFAULT_TYPE_NAME_SUFFIX: &str = "Impl";
pub const DEFAULT_MODULE_PREFIX: &str = "ConcreteObject";

/// Configuration for the runtime type emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// When false the emitter reports itself unavailable and every cache
    /// miss fails with `SynthesisUnavailable`.
    pub emission_enabled: bool,

    /// Appended to the contract's full name to name the generated type.
    pub type_name_suffix: String,

    /// Each generated type lives in its own module `<prefix>_<uuid>`.
    pub module_prefix: String,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            emission_enabled: true,
            type_name_suffix: DEFAULT_TYPE_NAME_SUFFIX.to_string(),
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
        }
    }
}

impl SynthesizerConfig {
    /// Defaults overridden by `ABSTRACT_SYNTH_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            emission_enabled: env_bool_or(EMIT_ENV, true),
            type_name_suffix: env_string_or(SUFFIX_ENV, DEFAULT_TYPE_NAME_SUFFIX),
            module_prefix: env_string_or(MODULE_PREFIX_ENV, DEFAULT_MODULE_PREFIX),
        }
    }

    #[must_use]
    pub fn with_emission(mut self, enabled: bool) -> Self {
        self.emission_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_type_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.type_name_suffix = suffix.into();
        self
    }

    /// Name of the generated type for a contract named `contract_name`.
    pub fn type_name_for(&self, contract_name: &str) -> String {
        format!("{}{}", contract_name, self.type_name_suffix)
    }

    /// A fresh, unique module name.
    pub fn new_module_name(&self) -> String {
        format!("{}_{}", self.module_prefix, Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SynthesizerConfig::default();
        assert!(config.emission_enabled);
        assert_eq!(config.type_name_for("Zoo.Animal"), "Zoo.AnimalImpl");
    }

    #[test]
    fn test_module_names_are_unique() {
        let config = SynthesizerConfig::default();
        let a = config.new_module_name();
        let b = config.new_module_name();
        assert_ne!(a, b);
        assert!(a.starts_with("ConcreteObject_"));
        // uuid simple form: 32 hex digits, no hyphens
        assert_eq!(a.len(), "ConcreteObject_".len() + 32);
        assert!(!a.contains('-'));
    }

    #[test]
    fn test_builders() {
        let config = SynthesizerConfig::default()
            .with_emission(false)
            .with_type_name_suffix("Stub");
        assert!(!config.emission_enabled);
        assert_eq!(config.type_name_for("IShape"), "IShapeStub");
    }
}
