//! Subcommands of the abstract-synth CLI.

pub mod analyze;
pub mod instantiate;
pub mod invoke;
pub mod output;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use abstract_synth::types::{TypeId, TypeManifest, TypeRegistry};
use abstract_synth::{SynthesizerConfig, TypeSynthesizer};

/// A registry loaded from one manifest file.
pub struct Session {
    pub registry: Arc<TypeRegistry>,
    module: String,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let manifest = TypeManifest::from_path(path)?;
        let registry = TypeRegistry::new_shared();
        manifest
            .load_into(&registry)
            .with_context(|| format!("failed to load types from {}", path.display()))?;
        Ok(Self {
            registry,
            module: manifest.module().to_string(),
        })
    }

    /// Look a type up by full name, preferring the manifest's own module.
    pub fn resolve_type(&self, name: &str) -> Result<TypeId> {
        self.registry
            .find_in_module(&self.module, name)
            .or_else(|| self.registry.find(name))
            .ok_or_else(|| anyhow!("type `{}` is not defined in the manifest", name))
    }

    /// Synthesizer configured from `ABSTRACT_SYNTH_*` variables.
    pub fn synthesizer(&self) -> TypeSynthesizer {
        TypeSynthesizer::with_config(Arc::clone(&self.registry), SynthesizerConfig::from_env())
    }
}
