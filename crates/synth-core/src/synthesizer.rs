//! Concrete-type synthesis with a process-scoped cache.
//!
//! [`TypeSynthesizer`] answers "give me an instance of this type, even if it
//! is abstract". Concrete types are constructed directly. For abstract
//! classes and interfaces a stub type is generated once per contract and
//! reused for the rest of the process.
//!
//! # Example
//!
//! ```
//! use synth_core::TypeSynthesizer;
//! use synth_types::{MethodDef, TypeDecl, TypeRef, TypeRegistry};
//!
//! let registry = TypeRegistry::new_shared();
//! let shape = registry
//!     .register(
//!         TypeDecl::interface("", "Shape")
//!             .method(MethodDef::abstract_method("Area", vec![], TypeRef::FLOAT)),
//!     )
//!     .unwrap();
//!
//! let synthesizer = TypeSynthesizer::new(registry);
//! let instance = synthesizer.instantiate_concrete(Some(shape)).unwrap();
//! let err = instance.invoke("Area", &[], &[]).unwrap_err();
//! assert!(err.is_not_implemented());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, trace};

use synth_types::{Instance, SynthesisError, TypeDef, TypeId, TypeRegistry};

use crate::config::SynthesizerConfig;
use crate::emit::{initialize_from_contract, RuntimeEmitter, TypeEmitter};
use crate::metrics::SynthesisMetrics;

/// Resolves contracts to concrete types and instantiates them.
///
/// Thread-safe; share it behind an `Arc`. Entries are never removed.
pub struct TypeSynthesizer {
    registry: Arc<TypeRegistry>,
    emitter: Box<dyn TypeEmitter>,
    /// contract -> synthesized type
    constructed: Mutex<HashMap<TypeId, TypeId>>,
    metrics: SynthesisMetrics,
}

impl TypeSynthesizer {
    /// Synthesizer with the default configuration.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, SynthesizerConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: SynthesizerConfig) -> Self {
        let emitter = RuntimeEmitter::new(Arc::clone(&registry), config);
        Self::with_emitter(registry, emitter)
    }

    pub fn with_emitter(registry: Arc<TypeRegistry>, emitter: impl TypeEmitter + 'static) -> Self {
        Self {
            registry,
            emitter: Box::new(emitter),
            constructed: Mutex::new(HashMap::new()),
            metrics: SynthesisMetrics::default(),
        }
    }

    /// Create a new Arc-wrapped synthesizer for sharing across threads.
    pub fn new_shared(registry: Arc<TypeRegistry>) -> Arc<Self> {
        Arc::new(Self::new(registry))
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &SynthesisMetrics {
        &self.metrics
    }

    /// Whether the emitter can generate types in this process.
    pub fn is_available(&self) -> bool {
        self.emitter.is_available()
    }

    /// Instantiate `contract`, synthesizing a concrete type when it is abstract.
    ///
    /// # Errors
    ///
    /// - `InvalidContract` when `contract` is `None` or not a defined type
    /// - `SynthesisUnavailable` when a type must be generated but emission is off
    /// - `NotConstructible` when the resolved type has no usable constructor
    pub fn instantiate_concrete(&self, contract: Option<TypeId>) -> Result<Instance, SynthesisError> {
        let contract =
            contract.ok_or_else(|| SynthesisError::invalid_contract("contract type is unset"))?;
        self.instantiate(contract)
    }

    pub fn instantiate(&self, contract: TypeId) -> Result<Instance, SynthesisError> {
        let concrete = self.concrete_type_for(contract)?;
        // Construction happens outside the cache lock.
        self.registry.create_instance(concrete)
    }

    /// The concrete type instances of `contract` are built from.
    ///
    /// Returns `contract` itself when it is already concrete; no cache entry
    /// is created in that case.
    pub fn concrete_type_for(&self, contract: TypeId) -> Result<TypeId, SynthesisError> {
        let def = self.registry.get(contract).ok_or_else(|| {
            SynthesisError::invalid_contract(format!("unknown type #{}", contract.index()))
        })?;
        if !def.is_defined {
            return Err(SynthesisError::invalid_contract(format!(
                "`{}` is declared but not defined",
                def.full_name()
            )));
        }
        if def.is_concrete() {
            self.metrics.record_direct();
            return Ok(contract);
        }

        // One lock over lookup, generation and insertion.
        let mut constructed = self.constructed.lock();
        if let Some(&cached) = constructed.get(&contract) {
            trace!(contract = %def.full_name(), "synthesis cache hit");
            self.metrics.record_cache_hit();
            return Ok(cached);
        }

        match self.synthesize(&def) {
            Ok(id) => {
                constructed.insert(contract, id);
                self.metrics.record_synthesized();
                Ok(id)
            }
            Err(e) => {
                self.metrics.record_failure();
                Err(e)
            }
        }
    }

    fn synthesize(&self, contract: &TypeDef) -> Result<TypeId, SynthesisError> {
        let mut builder = self.emitter.define_type(&contract.full_name())?;
        let obligations = initialize_from_contract(&mut builder, &self.registry, Some(contract.id))?;
        let id = self.emitter.create_type(builder)?;
        debug!(
            contract = %contract.full_name(),
            synthesized = %self.registry.full_name(id).unwrap_or_default(),
            stubs = obligations.len(),
            "synthesized concrete type"
        );
        Ok(id)
    }

    /// Resolve concrete types for a batch of contracts up front.
    ///
    /// Results come back in input order. Generation is still serialized by
    /// the cache lock.
    pub fn prewarm(&self, contracts: &[TypeId]) -> Vec<Result<TypeId, SynthesisError>> {
        contracts
            .par_iter()
            .map(|contract| self.concrete_type_for(*contract))
            .collect()
    }

    /// The synthesized type cached for `contract`, if any.
    pub fn cached_type(&self, contract: TypeId) -> Option<TypeId> {
        self.constructed.lock().get(&contract).copied()
    }

    /// Number of synthesized types.
    pub fn len(&self) -> usize {
        self.constructed.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for TypeSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSynthesizer")
            .field("cached", &self.len())
            .field("available", &self.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synth_types::{InvocationError, MethodDef, TypeDecl, TypeRef, Value};

    fn zoo() -> (Arc<TypeRegistry>, TypeId, TypeId) {
        let registry = TypeRegistry::new_shared();
        let animal = registry
            .register(
                TypeDecl::abstract_class("Zoo", "Animal")
                    .method(MethodDef::abstract_method("Speak", vec![], TypeRef::VOID))
                    .method(
                        MethodDef::new("Eat", vec![], TypeRef::STRING)
                            .with_body(|_, _| Ok(Value::Str("crunch".to_string()))),
                    ),
            )
            .unwrap();
        let rock = registry
            .register(TypeDecl::class("Zoo", "Rock"))
            .unwrap();
        (registry, animal, rock)
    }

    #[test]
    fn test_concrete_type_is_instantiated_directly() {
        let (registry, _, rock) = zoo();
        let synthesizer = TypeSynthesizer::new(Arc::clone(&registry));
        let before = registry.len();

        let instance = synthesizer.instantiate_concrete(Some(rock)).unwrap();
        assert_eq!(instance.type_id(), rock);
        assert!(synthesizer.is_empty());
        assert_eq!(synthesizer.cached_type(rock), None);
        assert_eq!(registry.len(), before);
        assert_eq!(synthesizer.metrics().snapshot().direct, 1);
    }

    #[test]
    fn test_abstract_class_gets_stubbed_subclass() {
        let (registry, animal, _) = zoo();
        let synthesizer = TypeSynthesizer::new(Arc::clone(&registry));

        let instance = synthesizer.instantiate_concrete(Some(animal)).unwrap();
        assert_ne!(instance.type_id(), animal);
        assert!(instance.is_instance_of(animal));
        assert_eq!(instance.type_name(), "Zoo.AnimalImpl");

        let err = instance.invoke("Speak", &[], &[]).unwrap_err();
        assert_eq!(
            err,
            InvocationError::NotImplemented {
                type_name: "Zoo.AnimalImpl".to_string(),
                method: "Speak".to_string(),
            }
        );
        // Inherited concrete members still work.
        assert_eq!(
            instance.invoke("Eat", &[], &[]),
            Ok(Value::Str("crunch".to_string()))
        );
    }

    #[test]
    fn test_cache_reuses_synthesized_type() {
        let (registry, animal, _) = zoo();
        let synthesizer = TypeSynthesizer::new(Arc::clone(&registry));

        let a = synthesizer.instantiate(animal).unwrap();
        let types_after_first = registry.len();
        let b = synthesizer.instantiate(animal).unwrap();

        assert_eq!(a.type_id(), b.type_id());
        assert_ne!(a, b);
        assert_eq!(registry.len(), types_after_first);
        assert_eq!(synthesizer.len(), 1);
        assert_eq!(synthesizer.cached_type(animal), Some(a.type_id()));

        let snap = synthesizer.metrics().snapshot();
        assert_eq!(snap.synthesized, 1);
        assert_eq!(snap.cache_hits, 1);
    }

    #[test]
    fn test_invalid_contracts() {
        let (registry, _, _) = zoo();
        let synthesizer = TypeSynthesizer::new(Arc::clone(&registry));

        let err = synthesizer.instantiate_concrete(None).unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidContract { .. }));

        let err = synthesizer
            .instantiate_concrete(Some(TypeId::from_index(999)))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidContract { .. }));
        assert_eq!(synthesizer.metrics().snapshot().total_requests(), 0);
    }

    #[test]
    fn test_unavailable_emission_is_reported_not_degraded() {
        let (registry, animal, rock) = zoo();
        let synthesizer = TypeSynthesizer::with_config(
            Arc::clone(&registry),
            SynthesizerConfig::default().with_emission(false),
        );
        assert!(!synthesizer.is_available());

        let err = synthesizer.instantiate(animal).unwrap_err();
        assert!(err.is_fatal());
        assert!(synthesizer.is_empty());
        assert_eq!(synthesizer.metrics().snapshot().failures, 1);

        // Concrete types never need the emitter.
        assert!(synthesizer.instantiate(rock).is_ok());
    }

    #[test]
    fn test_prewarm_populates_cache() {
        let (registry, animal, rock) = zoo();
        let shape = registry
            .register(
                TypeDecl::interface("Geometry", "IShape")
                    .method(MethodDef::abstract_method("Area", vec![], TypeRef::FLOAT)),
            )
            .unwrap();
        let synthesizer = TypeSynthesizer::new(Arc::clone(&registry));

        let results = synthesizer.prewarm(&[animal, shape, rock, animal]);
        assert_eq!(results.len(), 4);
        let ids: Vec<TypeId> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(ids[0], ids[3]);
        assert_eq!(ids[2], rock);
        assert_eq!(synthesizer.len(), 2);
        assert_eq!(synthesizer.cached_type(shape), Some(ids[1]));
    }
}
