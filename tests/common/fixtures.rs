//! Fixture loading utilities for tests.

use std::path::PathBuf;
use std::sync::Arc;

use abstract_synth::{TypeId, TypeManifest, TypeRegistry};

/// Fixture directory relative to the project root.
pub const FIXTURE_DIR: &str = "tests/fixture";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(FIXTURE_DIR)
        .join(name)
}

/// A registry loaded from one fixture manifest.
pub struct Fixture {
    pub registry: Arc<TypeRegistry>,
    pub ids: Vec<TypeId>,
}

impl Fixture {
    /// Id of the type named `full_name`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture has no such type.
    pub fn id(&self, full_name: &str) -> TypeId {
        self.registry
            .find(full_name)
            .unwrap_or_else(|| panic!("fixture has no type `{}`", full_name))
    }
}

/// Load `tests/fixture/<name>` into a fresh registry.
///
/// # Panics
///
/// Panics if the manifest is missing or invalid.
pub fn load_fixture(name: &str) -> Fixture {
    let manifest = TypeManifest::from_path(fixture_path(name)).expect("fixture manifest should parse");
    let registry = TypeRegistry::new_shared();
    let ids = manifest
        .load_into(&registry)
        .expect("fixture manifest should load");
    Fixture { registry, ids }
}

/// Ids of every synthesized type in the registry.
pub fn synthesized_types(registry: &TypeRegistry) -> Vec<TypeId> {
    registry
        .types()
        .iter()
        .filter(|t| t.is_synthesized)
        .map(|t| t.id)
        .collect()
}
