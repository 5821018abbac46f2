//! Reflection model shared across the abstract-synth workspace.
//!
//! This crate provides the type facility the contract analyzer and the type
//! synthesizer are built on:
//! - [`registry`]: the process-scoped [`TypeRegistry`] of classes and interfaces
//! - [`method`]: method definitions, attribute flags, runtime [`Value`]s
//! - [`instance`]: constructed objects and virtual dispatch
//! - [`type_ref`]: parameter/return type references, parsing and display
//! - [`manifest`]: JSON type manifests
//! - [`members`]: members a hierarchy still owes, shared by registry and analyzer
//! - [`error`]: the shared error taxonomy

pub mod env_utils;
pub mod error;
pub mod instance;
pub mod manifest;
pub mod members;
pub mod method;
pub mod registry;
pub mod type_ref;

pub use error::{InvocationError, SynthesisError};
pub use instance::Instance;
pub use manifest::{ManifestError, TypeManifest};
pub use method::{CallingConvention, MethodAttributes, MethodDef, MethodImpl, Value};
pub use registry::{TypeDecl, TypeDef, TypeId, TypeKind, TypeRegistry, DEFAULT_MODULE};
pub use type_ref::{parse_type_ref, Primitive, TypeRef};
