//! abstract-synth
//!
//! Produces concrete types for abstract classes and interfaces at runtime:
//!
//! - **Contract analysis**: the members a concrete type still owes ([`analyzer`])
//! - **Type synthesis**: generated stub types, cached per contract ([`synthesis`])
//! - **Reflection model**: registry, methods, instances, manifests ([`types`])
//!
//! Most callers only need [`TypeSynthesizer::instantiate_concrete`].

pub use synth_analyzer as analyzer;
pub use synth_core as synthesis;
pub use synth_types as types;

pub use synth_analyzer::{analyze_contract, ContractAnalyzer, Obligation, ObligationSet};
pub use synth_core::{SynthesizerConfig, TypeSynthesizer};
pub use synth_types::{
    Instance, InvocationError, MethodDef, SynthesisError, TypeDecl, TypeId, TypeManifest, TypeRef,
    TypeRegistry, Value,
};
