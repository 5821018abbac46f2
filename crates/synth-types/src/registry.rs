//! Process-scoped type registry.
//!
//! The registry is the reflection facility the analyzer and the synthesizer
//! work against: it answers base-chain, interface-set and declared-member
//! queries, accepts new type definitions at runtime, and constructs
//! default instances. A non-abstract class is refused unless every abstract
//! and interface member in its hierarchy has an implementation.
//!
//! Types can be registered in one step ([`TypeRegistry::register`]) or in two
//! ([`TypeRegistry::declare`] then [`TypeRegistry::define`]) when definitions
//! reference each other before all of them exist.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::SynthesisError;
use crate::instance::Instance;
use crate::members::{pending_members, PendingMember};
use crate::method::MethodDef;
use crate::type_ref::{format_params, TypeRef};

/// Module assigned to types registered without an explicit one.
pub const DEFAULT_MODULE: &str = "Host";

/// Identity of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn from_index(index: usize) -> Self {
        TypeId(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
}

/// A registered type.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub id: TypeId,
    pub module: String,
    pub namespace: Option<String>,
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    /// Methods declared directly on this type.
    pub methods: Vec<MethodDef>,
    pub has_default_constructor: bool,
    pub is_synthesized: bool,
    /// False between `declare` and `define`.
    pub is_defined: bool,
}

impl TypeDef {
    pub fn full_name(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// A defined, non-abstract class. The registry only accepts one whose
    /// hierarchy leaves nothing unimplemented.
    pub fn is_concrete(&self) -> bool {
        self.is_defined && self.kind == TypeKind::Class && !self.is_abstract
    }
}

fn full_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}.{}", ns, name),
        _ => name.to_string(),
    }
}

/// Input for registering a type.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub module: String,
    pub namespace: Option<String>,
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub methods: Vec<MethodDef>,
    pub has_default_constructor: bool,
    pub is_synthesized: bool,
}

impl TypeDecl {
    pub fn class(namespace: &str, name: &str) -> Self {
        Self {
            module: DEFAULT_MODULE.to_string(),
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            name: name.to_string(),
            kind: TypeKind::Class,
            is_abstract: false,
            base: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            has_default_constructor: true,
            is_synthesized: false,
        }
    }

    pub fn abstract_class(namespace: &str, name: &str) -> Self {
        Self {
            is_abstract: true,
            ..Self::class(namespace, name)
        }
    }

    /// Interfaces are abstract and have no constructor.
    pub fn interface(namespace: &str, name: &str) -> Self {
        Self {
            kind: TypeKind::Interface,
            is_abstract: true,
            has_default_constructor: false,
            ..Self::class(namespace, name)
        }
    }

    #[must_use]
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    #[must_use]
    pub fn extends(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn without_default_constructor(mut self) -> Self {
        self.has_default_constructor = false;
        self
    }

    #[must_use]
    pub fn synthesized(mut self) -> Self {
        self.is_synthesized = true;
        self
    }

    pub fn full_name(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    types: Vec<Arc<TypeDef>>,
    by_name: HashMap<(String, String), TypeId>,
}

impl RegistryInner {
    fn get(&self, id: TypeId) -> Option<&Arc<TypeDef>> {
        self.types.get(id.index())
    }

    fn header(&self, decl: &TypeDecl) -> Result<TypeId, SynthesisError> {
        if decl.name.trim().is_empty() {
            return Err(SynthesisError::registration(
                decl.full_name(),
                "type name is empty",
            ));
        }
        let key = (decl.module.clone(), decl.full_name());
        if self.by_name.contains_key(&key) {
            return Err(SynthesisError::registration(
                decl.full_name(),
                format!("already registered in module `{}`", decl.module),
            ));
        }
        Ok(TypeId::from_index(self.types.len()))
    }

    fn insert_header(&mut self, decl: &TypeDecl) -> Result<TypeId, SynthesisError> {
        let id = self.header(decl)?;
        self.by_name
            .insert((decl.module.clone(), decl.full_name()), id);
        self.types.push(Arc::new(TypeDef {
            id,
            module: decl.module.clone(),
            namespace: decl.namespace.clone(),
            name: decl.name.clone(),
            kind: decl.kind,
            is_abstract: decl.is_abstract,
            base: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            has_default_constructor: decl.has_default_constructor,
            is_synthesized: decl.is_synthesized,
            is_defined: false,
        }));
        Ok(id)
    }

    /// Check a body against the registry as it stands, `id` being the type it defines.
    fn validate(&self, id: TypeId, decl: &TypeDecl) -> Result<(), SynthesisError> {
        let type_name = decl.full_name();
        let fail = |reason: String| -> Result<(), SynthesisError> {
            Err(SynthesisError::registration(type_name.clone(), reason))
        };

        if decl.kind == TypeKind::Interface {
            if decl.base.is_some() {
                return fail("interfaces cannot have a base class".to_string());
            }
            if decl.has_default_constructor {
                return fail("interfaces cannot have a constructor".to_string());
            }
        }

        if let Some(base_id) = decl.base {
            let Some(base) = self.get(base_id) else {
                return fail(format!("unknown base type #{}", base_id.index()));
            };
            if base.kind != TypeKind::Class {
                return fail(format!("base type `{}` is not a class", base.full_name()));
            }
            // Walk up from the base; reaching `id` again means a cycle.
            let mut current = Some(base_id);
            let mut steps = 0;
            while let Some(cur) = current {
                if cur == id || steps > self.types.len() {
                    return fail("inheritance cycle".to_string());
                }
                current = self.get(cur).and_then(|t| t.base);
                steps += 1;
            }
        }

        for iface_id in &decl.interfaces {
            let Some(iface) = self.get(*iface_id) else {
                return fail(format!("unknown interface #{}", iface_id.index()));
            };
            if iface.kind != TypeKind::Interface {
                return fail(format!("`{}` is not an interface", iface.full_name()));
            }
            if *iface_id == id || self.collect_interfaces(*iface_id).contains(&id) {
                return fail("interface inheritance cycle".to_string());
            }
        }

        let mut seen: HashSet<(&str, &[TypeRef])> = HashSet::new();
        for method in &decl.methods {
            if method.name.trim().is_empty() {
                return fail("method with empty name".to_string());
            }
            if !seen.insert((method.name.as_str(), method.params.as_slice())) {
                return fail(format!(
                    "duplicate method `{}({})`",
                    method.name,
                    format_params(&method.params, &|t| self.full_name(t))
                ));
            }
            if method.is_abstract() {
                if method.is_static() {
                    return fail(format!("abstract method `{}` cannot be static", method.name));
                }
                if !method.is_virtual() {
                    return fail(format!("abstract method `{}` must be virtual", method.name));
                }
                if method.implementation.is_some() {
                    return fail(format!("abstract method `{}` has a body", method.name));
                }
                if decl.kind == TypeKind::Class && !decl.is_abstract {
                    return fail(format!(
                        "non-abstract class declares abstract method `{}`",
                        method.name
                    ));
                }
            } else {
                if decl.kind == TypeKind::Interface {
                    return fail(format!(
                        "interface member `{}` must be abstract",
                        method.name
                    ));
                }
                if method.implementation.is_none() {
                    return fail(format!("method `{}` has no body", method.name));
                }
            }
        }

        if decl.kind == TypeKind::Class && !decl.is_abstract {
            let missing = match self.unimplemented(id, decl) {
                Ok(missing) => missing,
                Err(reason) => return fail(reason),
            };
            if !missing.is_empty() {
                let signatures: Vec<String> = missing
                    .iter()
                    .map(|p| {
                        format!(
                            "{}({})",
                            p.method.name,
                            format_params(&p.method.params, &|t| self.full_name(t))
                        )
                    })
                    .collect();
                return fail(format!(
                    "members left unimplemented: {}",
                    signatures.join(", ")
                ));
            }
        }

        Ok(())
    }

    /// Members a class defined by `decl` would still owe.
    ///
    /// Every ancestor and interface has to be defined for the answer to be
    /// meaningful; an undefined one is reported as the error.
    fn unimplemented(&self, id: TypeId, decl: &TypeDecl) -> Result<Vec<PendingMember>, String> {
        let mut chain: Vec<Arc<TypeDef>> = match decl.base {
            Some(base) => self.defs(self.chain(base)),
            None => Vec::new(),
        };
        if let Some(pending) = chain.iter().find(|t| !t.is_defined) {
            return Err(format!("base type `{}` is not defined yet", pending.full_name()));
        }
        chain.push(Arc::new(TypeDef {
            id,
            module: decl.module.clone(),
            namespace: decl.namespace.clone(),
            name: decl.name.clone(),
            kind: decl.kind,
            is_abstract: decl.is_abstract,
            base: decl.base,
            interfaces: decl.interfaces.clone(),
            methods: decl.methods.clone(),
            has_default_constructor: decl.has_default_constructor,
            is_synthesized: decl.is_synthesized,
            is_defined: true,
        }));

        let interfaces = self.defs(self.interfaces_along(&chain, id));
        if let Some(pending) = interfaces.iter().find(|t| !t.is_defined) {
            return Err(format!("interface `{}` is not defined yet", pending.full_name()));
        }
        Ok(pending_members(&chain, &interfaces))
    }

    fn defs(&self, ids: Vec<TypeId>) -> Vec<Arc<TypeDef>> {
        ids.into_iter().filter_map(|t| self.get(t).cloned()).collect()
    }

    fn full_name(&self, id: TypeId) -> Option<String> {
        self.get(id).map(|t| t.full_name())
    }

    /// Transitive interfaces of `id`, deduplicated, first occurrence wins.
    ///
    /// Classes contribute their chain root-to-leaf; each listed interface is
    /// followed by the interfaces it inherits. The type itself is excluded.
    fn collect_interfaces(&self, id: TypeId) -> Vec<TypeId> {
        // An interface has no base, so its chain is just itself.
        let chain = self.defs(self.chain(id));
        self.interfaces_along(&chain, id)
    }

    fn interfaces_along(&self, chain: &[Arc<TypeDef>], origin: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for def in chain {
            for iface in &def.interfaces {
                self.visit_interface(*iface, origin, &mut seen, &mut out);
            }
        }
        out
    }

    fn visit_interface(
        &self,
        iface: TypeId,
        origin: TypeId,
        seen: &mut HashSet<TypeId>,
        out: &mut Vec<TypeId>,
    ) {
        if iface == origin || !seen.insert(iface) {
            return;
        }
        out.push(iface);
        if let Some(def) = self.get(iface) {
            for parent in &def.interfaces {
                self.visit_interface(*parent, origin, seen, out);
            }
        }
    }

    /// Base chain, root first, ending with `id`.
    fn chain(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            if chain.contains(&cur) {
                break;
            }
            chain.push(cur);
            current = self.get(cur).and_then(|t| t.base);
        }
        chain.reverse();
        chain
    }
}

/// Thread-safe registry of every type known to the process.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    inner: RwLock<RegistryInner>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Arc-wrapped registry for sharing across components.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a fully described type in one step.
    pub fn register(&self, decl: TypeDecl) -> Result<TypeId, SynthesisError> {
        let mut inner = self.inner.write();
        let id = inner.header(&decl)?;
        inner.validate(id, &decl)?;
        inner.insert_header(&decl)?;
        Self::install(&mut inner, id, decl);
        Ok(id)
    }

    /// Reserve an id for a type whose members are supplied later by [`define`](Self::define).
    ///
    /// Only the header (module, name, kind, abstractness, constructor) is read.
    pub fn declare(&self, decl: &TypeDecl) -> Result<TypeId, SynthesisError> {
        self.inner.write().insert_header(decl)
    }

    /// Supply base, interfaces and members for a declared type.
    pub fn define(&self, id: TypeId, decl: TypeDecl) -> Result<(), SynthesisError> {
        let mut inner = self.inner.write();
        let Some(existing) = inner.get(id) else {
            return Err(SynthesisError::registration(
                decl.full_name(),
                format!("type #{} was never declared", id.index()),
            ));
        };
        if existing.is_defined {
            return Err(SynthesisError::registration(
                existing.full_name(),
                "already defined",
            ));
        }
        if existing.full_name() != decl.full_name()
            || existing.kind != decl.kind
            || existing.module != decl.module
        {
            return Err(SynthesisError::registration(
                decl.full_name(),
                format!("does not match declaration `{}`", existing.full_name()),
            ));
        }
        inner.validate(id, &decl)?;
        Self::install(&mut inner, id, decl);
        Ok(())
    }

    fn install(inner: &mut RegistryInner, id: TypeId, decl: TypeDecl) {
        let def = TypeDef {
            id,
            module: decl.module,
            namespace: decl.namespace,
            name: decl.name,
            kind: decl.kind,
            is_abstract: decl.is_abstract,
            base: decl.base,
            interfaces: decl.interfaces,
            methods: decl.methods,
            has_default_constructor: decl.has_default_constructor,
            is_synthesized: decl.is_synthesized,
            is_defined: true,
        };
        inner.types[id.index()] = Arc::new(def);
    }

    pub fn get(&self, id: TypeId) -> Option<Arc<TypeDef>> {
        self.inner.read().get(id).cloned()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.inner.read().get(id).is_some()
    }

    pub fn full_name(&self, id: TypeId) -> Option<String> {
        self.inner.read().full_name(id)
    }

    /// Look a type up by full name. The earliest registration wins across modules.
    pub fn find(&self, full_name: &str) -> Option<TypeId> {
        let inner = self.inner.read();
        inner
            .types
            .iter()
            .find(|t| t.full_name() == full_name)
            .map(|t| t.id)
    }

    pub fn find_in_module(&self, module: &str, full_name: &str) -> Option<TypeId> {
        self.inner
            .read()
            .by_name
            .get(&(module.to_string(), full_name.to_string()))
            .copied()
    }

    /// Base chain from the ultimate ancestor down to `id` itself.
    pub fn base_chain(&self, id: TypeId) -> Option<Vec<Arc<TypeDef>>> {
        let inner = self.inner.read();
        inner.get(id)?;
        inner
            .chain(id)
            .into_iter()
            .map(|t| inner.get(t).cloned())
            .collect()
    }

    /// Transitive interface set of `id`, excluding `id` itself.
    pub fn interfaces(&self, id: TypeId) -> Option<Vec<Arc<TypeDef>>> {
        let inner = self.inner.read();
        inner.get(id)?;
        inner
            .collect_interfaces(id)
            .into_iter()
            .map(|t| inner.get(t).cloned())
            .collect()
    }

    /// Methods declared directly on `id`, static ones included.
    pub fn declared_methods(&self, id: TypeId) -> Option<Vec<MethodDef>> {
        self.inner.read().get(id).map(|t| t.methods.clone())
    }

    /// Whether `id` is, or transitively inherits from or implements, `ancestor`.
    pub fn is_assignable_to(&self, id: TypeId, ancestor: TypeId) -> bool {
        let inner = self.inner.read();
        inner.chain(id).contains(&ancestor) || inner.collect_interfaces(id).contains(&ancestor)
    }

    pub fn is_concrete(&self, id: TypeId) -> bool {
        self.get(id).map(|t| t.is_concrete()).unwrap_or(false)
    }

    /// All registered types, in registration order.
    pub fn types(&self) -> Vec<Arc<TypeDef>> {
        self.inner.read().types.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render a type reference with simple names.
    pub fn display_type(&self, ty: &TypeRef) -> String {
        let inner = self.inner.read();
        ty.simple_name(&|id| inner.full_name(id))
    }

    /// Render a signature as `Name(int, string)`.
    pub fn display_signature(&self, name: &str, params: &[TypeRef]) -> String {
        let inner = self.inner.read();
        format!("{}({})", name, format_params(params, &|id| inner.full_name(id)))
    }

    /// Construct a default instance of a concrete type.
    pub fn create_instance(self: &Arc<Self>, id: TypeId) -> Result<Instance, SynthesisError> {
        let Some(def) = self.get(id) else {
            return Err(SynthesisError::not_constructible(
                format!("#{}", id.index()),
                "unknown type",
            ));
        };
        if !def.is_defined {
            return Err(SynthesisError::not_constructible(
                def.full_name(),
                "type is declared but not defined",
            ));
        }
        if def.is_interface() {
            return Err(SynthesisError::not_constructible(
                def.full_name(),
                "type is an interface",
            ));
        }
        if def.is_abstract {
            return Err(SynthesisError::not_constructible(
                def.full_name(),
                "type is abstract",
            ));
        }
        if !def.has_default_constructor {
            return Err(SynthesisError::not_constructible(
                def.full_name(),
                "no parameterless constructor",
            ));
        }
        Ok(Instance::new(id, Arc::clone(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal_registry() -> (TypeRegistry, TypeId, TypeId, TypeId) {
        let registry = TypeRegistry::new();
        let named = registry
            .register(
                TypeDecl::interface("Zoo", "INamed").method(MethodDef::abstract_method(
                    "Name",
                    vec![],
                    TypeRef::STRING,
                )),
            )
            .unwrap();
        let animal = registry
            .register(
                TypeDecl::abstract_class("Zoo", "Animal")
                    .implements(named)
                    .method(MethodDef::abstract_method("Speak", vec![], TypeRef::VOID))
                    .method(MethodDef::new("Eat", vec![], TypeRef::VOID)),
            )
            .unwrap();
        let dog = registry
            .register(
                TypeDecl::class("Zoo", "Dog")
                    .extends(animal)
                    .method(MethodDef::override_method("Speak", vec![], TypeRef::VOID))
                    .method(MethodDef::new("Name", vec![], TypeRef::STRING)),
            )
            .unwrap();
        (registry, named, animal, dog)
    }

    #[test]
    fn test_register_and_lookup() {
        let (registry, named, animal, dog) = animal_registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.find("Zoo.Animal"), Some(animal));
        assert_eq!(registry.find_in_module(DEFAULT_MODULE, "Zoo.Dog"), Some(dog));
        assert_eq!(registry.find("Zoo.Cat"), None);
        assert!(registry.get(named).unwrap().is_interface());
        assert!(registry.is_concrete(dog));
        assert!(!registry.is_concrete(animal));
        assert!(!registry.is_concrete(named));
    }

    #[test]
    fn test_base_chain_is_root_first() {
        let (registry, _, animal, dog) = animal_registry();
        let chain: Vec<TypeId> = registry
            .base_chain(dog)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(chain, vec![animal, dog]);
        assert!(registry.base_chain(TypeId::from_index(42)).is_none());

        let declared = registry.declared_methods(animal).unwrap();
        assert_eq!(declared.len(), 2);
        assert!(declared[0].is_abstract());
        assert!(registry.declared_methods(TypeId::from_index(42)).is_none());
    }

    #[test]
    fn test_interfaces_are_transitive() {
        let (registry, named, animal, dog) = animal_registry();
        let ids: Vec<TypeId> = registry
            .interfaces(dog)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![named]);
        assert!(registry.is_assignable_to(dog, named));
        assert!(registry.is_assignable_to(dog, animal));
        assert!(!registry.is_assignable_to(animal, dog));
        assert!(registry.interfaces(named).unwrap().is_empty());
    }

    #[test]
    fn test_interface_diamond_is_deduplicated() {
        let registry = TypeRegistry::new();
        let root = registry.register(TypeDecl::interface("", "IRoot")).unwrap();
        let left = registry
            .register(TypeDecl::interface("", "ILeft").implements(root))
            .unwrap();
        let right = registry
            .register(TypeDecl::interface("", "IRight").implements(root))
            .unwrap();
        let both = registry
            .register(TypeDecl::interface("", "IBoth").implements(left).implements(right))
            .unwrap();
        let ids: Vec<TypeId> = registry
            .interfaces(both)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![left, root, right]);
    }

    #[test]
    fn test_rejects_invalid_definitions() {
        let (registry, named, _, dog) = animal_registry();

        let err = registry
            .register(TypeDecl::class("Zoo", "Dog"))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Registration { .. }));

        let err = registry
            .register(TypeDecl::class("Zoo", "Bad").extends(named))
            .unwrap_err();
        assert!(err.to_string().contains("is not a class"));

        let err = registry
            .register(TypeDecl::class("Zoo", "Bad").implements(dog))
            .unwrap_err();
        assert!(err.to_string().contains("is not an interface"));

        let err = registry
            .register(
                TypeDecl::class("Zoo", "Bad")
                    .method(MethodDef::abstract_method("M", vec![], TypeRef::VOID)),
            )
            .unwrap_err();
        assert!(err.to_string().contains("non-abstract class"));

        let err = registry
            .register(
                TypeDecl::interface("Zoo", "IBad")
                    .method(MethodDef::new("M", vec![], TypeRef::VOID)),
            )
            .unwrap_err();
        assert!(err.to_string().contains("must be abstract"));

        let err = registry
            .register(
                TypeDecl::class("Zoo", "Bad")
                    .method(MethodDef::new("M", vec![TypeRef::INT], TypeRef::VOID))
                    .method(MethodDef::new("M", vec![TypeRef::INT], TypeRef::BOOL)),
            )
            .unwrap_err();
        assert!(err.to_string().contains("duplicate method `M(int)`"));

        // Failed registrations leave nothing behind.
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.find("Zoo.Bad"), None);
    }

    #[test]
    fn test_rejects_concrete_class_with_missing_members() {
        let (registry, named, animal, _) = animal_registry();

        let err = registry
            .register(TypeDecl::class("Zoo", "Cat").extends(animal))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Registration { .. }));
        assert!(err.to_string().contains("members left unimplemented: Speak(), Name()"));

        let err = registry
            .register(TypeDecl::class("Zoo", "Label").implements(named))
            .unwrap_err();
        assert!(err.to_string().contains("Name()"));

        // An explicit implementation counts; an abstract subclass may still owe.
        registry
            .register(
                TypeDecl::class("Zoo", "Label")
                    .implements(named)
                    .method(MethodDef::new("Zoo.INamed.Name", vec![], TypeRef::STRING).private()),
            )
            .unwrap();
        registry
            .register(TypeDecl::abstract_class("Zoo", "Cat").extends(animal))
            .unwrap();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_concrete_class_needs_defined_ancestors() {
        let registry = TypeRegistry::new();
        let base = registry.declare(&TypeDecl::abstract_class("", "Base")).unwrap();
        let leaf = registry.declare(&TypeDecl::class("", "Leaf")).unwrap();

        let err = registry
            .define(leaf, TypeDecl::class("", "Leaf").extends(base))
            .unwrap_err();
        assert!(err.to_string().contains("base type `Base` is not defined yet"));

        registry
            .define(
                base,
                TypeDecl::abstract_class("", "Base")
                    .method(MethodDef::abstract_method("Run", vec![], TypeRef::VOID)),
            )
            .unwrap();
        let err = registry
            .define(leaf, TypeDecl::class("", "Leaf").extends(base))
            .unwrap_err();
        assert!(err.to_string().contains("Run()"));
        registry
            .define(
                leaf,
                TypeDecl::class("", "Leaf")
                    .extends(base)
                    .method(MethodDef::override_method("Run", vec![], TypeRef::VOID)),
            )
            .unwrap();
        assert!(registry.is_concrete(leaf));
    }

    #[test]
    fn test_two_phase_definition_detects_cycles() {
        let registry = TypeRegistry::new();
        let a = registry.declare(&TypeDecl::abstract_class("", "A")).unwrap();
        let b = registry.declare(&TypeDecl::abstract_class("", "B")).unwrap();
        assert!(!registry.get(a).unwrap().is_defined);

        registry
            .define(a, TypeDecl::abstract_class("", "A").extends(b))
            .unwrap();
        let err = registry
            .define(b, TypeDecl::abstract_class("", "B").extends(a))
            .unwrap_err();
        assert!(err.to_string().contains("inheritance cycle"));

        let err = registry
            .define(a, TypeDecl::abstract_class("", "A"))
            .unwrap_err();
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn test_create_instance() {
        let (registry, named, animal, dog) = animal_registry();
        let registry = Arc::new(registry);

        let instance = registry.create_instance(dog).unwrap();
        assert_eq!(instance.type_id(), dog);

        let err = registry.create_instance(animal).unwrap_err();
        assert!(matches!(err, SynthesisError::NotConstructible { .. }));
        assert!(registry.create_instance(named).is_err());

        let no_ctor = registry
            .register(TypeDecl::class("Zoo", "Cage").without_default_constructor())
            .unwrap();
        let err = registry.create_instance(no_ctor).unwrap_err();
        assert!(err.to_string().contains("no parameterless constructor"));
    }

    #[test]
    fn test_display_helpers() {
        let (registry, named, _, _) = animal_registry();
        assert_eq!(
            registry.display_type(&TypeRef::array(TypeRef::Named(named))),
            "INamed[]"
        );
        assert_eq!(
            registry.display_signature("Feed", &[TypeRef::INT, TypeRef::STRING]),
            "Feed(int, string)"
        );
    }
}
