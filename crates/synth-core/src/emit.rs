//! Runtime type emission.
//!
//! An emitter hands out [`TypeBuilder`]s, each destined for its own fresh
//! module, and turns finished builders into registered types. A builder
//! that would still owe members is refused by the registry before anything
//! is inserted.

use std::sync::Arc;

use tracing::debug;

use synth_analyzer::{analyze_contract, ObligationSet};
use synth_types::{
    CallingConvention, MethodAttributes, MethodDef, MethodImpl, SynthesisError, TypeDecl, TypeId,
    TypeRef, TypeRegistry,
};

use crate::config::SynthesizerConfig;

/// Capability to create new nominal types at runtime.
pub trait TypeEmitter: Send + Sync {
    /// Whether this emitter can create types at all.
    fn is_available(&self) -> bool;

    /// Start a builder for the concrete type of the contract named `contract_name`.
    fn define_type(&self, contract_name: &str) -> Result<TypeBuilder, SynthesisError>;

    /// Register the type described by `builder` and return its id.
    fn create_type(&self, builder: TypeBuilder) -> Result<TypeId, SynthesisError>;
}

/// A concrete class under construction.
///
/// Every built type gets a public parameterless constructor; it can be used
/// only when the parent, if any, has one too.
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    module: String,
    namespace: String,
    name: String,
    parent: Option<TypeId>,
    interfaces: Vec<TypeId>,
    methods: Vec<MethodDef>,
}

impl TypeBuilder {
    /// `full_name` is split at its last `.` into namespace and simple name.
    pub fn new(module: impl Into<String>, full_name: &str) -> Self {
        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((ns, name)) => (ns.to_string(), name.to_string()),
            None => (String::new(), full_name.to_string()),
        };
        Self {
            module: module.into(),
            namespace,
            name,
            parent: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    pub fn set_parent(&mut self, parent: TypeId) {
        self.parent = Some(parent);
    }

    pub fn add_interface_implementation(&mut self, interface: TypeId) {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
    }

    pub fn define_method(
        &mut self,
        name: impl Into<String>,
        attributes: MethodAttributes,
        calling_convention: CallingConvention,
        return_type: TypeRef,
        params: Vec<TypeRef>,
        implementation: MethodImpl,
    ) {
        let mut method = MethodDef::new(name, params, return_type)
            .with_attributes(attributes)
            .with_impl(implementation);
        method.calling_convention = calling_convention;
        self.methods.push(method);
    }

    fn into_decl(self, has_default_constructor: bool) -> TypeDecl {
        let mut decl = TypeDecl::class(&self.namespace, &self.name)
            .in_module(self.module)
            .synthesized();
        if let Some(parent) = self.parent {
            decl = decl.extends(parent);
        }
        for iface in self.interfaces {
            decl = decl.implements(iface);
        }
        for method in self.methods {
            decl = decl.method(method);
        }
        if !has_default_constructor {
            decl = decl.without_default_constructor();
        }
        decl
    }
}

/// Attributes of the stub generated for an obligation declared with `declared`.
pub fn stub_attributes(declared: MethodAttributes) -> MethodAttributes {
    declared
        .without(MethodAttributes::ABSTRACT)
        .without(MethodAttributes::NEW_SLOT)
        .with(MethodAttributes::HIDE_BY_SIG)
}

/// Make `builder` derive from `contract` and stub out every obligation.
///
/// Class contracts become the parent; interface contracts are implemented.
/// Each stub fails with not-implemented when invoked. Returns the
/// obligations that were stubbed.
pub fn initialize_from_contract(
    builder: &mut TypeBuilder,
    registry: &TypeRegistry,
    contract: Option<TypeId>,
) -> Result<ObligationSet, SynthesisError> {
    let obligations = analyze_contract(registry, contract)?;
    let contract = obligations.contract();
    let def = registry.get(contract).ok_or_else(|| {
        SynthesisError::invalid_contract(format!("unknown type #{}", contract.index()))
    })?;

    if def.is_interface() {
        builder.add_interface_implementation(contract);
    } else {
        builder.set_parent(contract);
    }

    for obligation in &obligations {
        let signature = &obligation.signature;
        builder.define_method(
            signature.name.clone(),
            stub_attributes(signature.attributes),
            signature.calling_convention,
            signature.return_type.clone(),
            signature.params.clone(),
            MethodImpl::ThrowNotImplemented,
        );
    }
    Ok(obligations)
}

/// Emitter that registers generated types in a shared [`TypeRegistry`].
pub struct RuntimeEmitter {
    registry: Arc<TypeRegistry>,
    config: SynthesizerConfig,
}

impl RuntimeEmitter {
    pub fn new(registry: Arc<TypeRegistry>, config: SynthesizerConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }
}

impl TypeEmitter for RuntimeEmitter {
    fn is_available(&self) -> bool {
        self.config.emission_enabled
    }

    fn define_type(&self, contract_name: &str) -> Result<TypeBuilder, SynthesisError> {
        if !self.is_available() {
            return Err(SynthesisError::unavailable(
                "runtime type emission is disabled",
            ));
        }
        Ok(TypeBuilder::new(
            self.config.new_module_name(),
            &self.config.type_name_for(contract_name),
        ))
    }

    fn create_type(&self, builder: TypeBuilder) -> Result<TypeId, SynthesisError> {
        if !self.is_available() {
            return Err(SynthesisError::unavailable(
                "runtime type emission is disabled",
            ));
        }
        let full_name = builder.full_name();
        let module = builder.module().to_string();
        let has_default_constructor = match builder.parent() {
            Some(parent) => self
                .registry
                .get(parent)
                .map(|p| p.has_default_constructor)
                .unwrap_or(false),
            None => true,
        };

        // Registration refuses a class that still owes members, leaving
        // nothing behind in the registry.
        let id = self.registry.register(builder.into_decl(has_default_constructor))?;

        debug!(
            type_name = %full_name,
            module = %module,
            "emitted concrete type"
        );
        Ok(id)
    }
}
