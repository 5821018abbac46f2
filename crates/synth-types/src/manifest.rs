//! JSON type manifests.
//!
//! A manifest describes a set of classes and interfaces for the registry:
//!
//! ```json
//! {
//!   "module": "Zoo",
//!   "types": [
//!     { "namespace": "Zoo", "name": "Animal", "kind": "class", "abstract": true,
//!       "methods": [
//!         { "name": "Speak", "modifiers": ["abstract"] },
//!         { "name": "Eat" }
//!       ] }
//!   ]
//! }
//! ```
//!
//! Every type is declared before any is defined, so bases, interfaces and
//! parameter types may refer to types later in the file. Definitions run
//! bases and interfaces first, since a concrete class is only accepted once
//! everything it inherits is known.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SynthesisError;
use crate::method::{CallingConvention, MethodAttributes, MethodDef, MethodImpl};
use crate::registry::{TypeDecl, TypeId, TypeKind, TypeRegistry};
use crate::type_ref::{parse_type_ref, TypeRef};

/// Module used when the manifest does not name one.
pub const DEFAULT_MANIFEST_MODULE: &str = "Manifest";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse manifest: {0}")]
    Parse(String),

    #[error("unknown type `{name}` referenced by `{referenced_by}`")]
    UnknownType { name: String, referenced_by: String },

    #[error("unknown modifier `{modifier}` on `{method}`")]
    UnknownModifier { method: String, modifier: String },

    #[error(transparent)]
    Registration(#[from] SynthesisError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    pub kind: TypeKind,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Ignored for interfaces.
    #[serde(default = "default_true")]
    pub default_constructor: bool,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntry {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "default_return")]
    pub returns: String,
    /// Any of `abstract`, `virtual`, `override`, `new`, `static`, `private`.
    #[serde(default)]
    pub modifiers: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_return() -> String {
    "void".to_string()
}

impl TypeEntry {
    fn full_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    fn header(&self, module: &str) -> TypeDecl {
        let ns = self.namespace.as_deref().unwrap_or("");
        let decl = match self.kind {
            TypeKind::Interface => TypeDecl::interface(ns, &self.name),
            TypeKind::Class if self.is_abstract => TypeDecl::abstract_class(ns, &self.name),
            TypeKind::Class => TypeDecl::class(ns, &self.name),
        };
        let decl = decl.in_module(module);
        if self.kind == TypeKind::Class && !self.default_constructor {
            decl.without_default_constructor()
        } else {
            decl
        }
    }
}

impl TypeManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    pub fn module(&self) -> &str {
        self.module.as_deref().unwrap_or(DEFAULT_MANIFEST_MODULE)
    }

    /// Register every type of the manifest, returning ids in file order.
    ///
    /// Names resolve against the manifest first, then against types already
    /// in the registry.
    pub fn load_into(&self, registry: &TypeRegistry) -> Result<Vec<TypeId>, ManifestError> {
        let module = self.module();

        let mut local: HashMap<String, TypeId> = HashMap::new();
        let mut ids = Vec::with_capacity(self.types.len());
        for entry in &self.types {
            let id = registry.declare(&entry.header(module))?;
            local.insert(entry.full_name(), id);
            ids.push(id);
        }

        let resolve = |name: &str| local.get(name).copied().or_else(|| registry.find(name));

        for index in self.definition_order() {
            let (entry, id) = (&self.types[index], &ids[index]);
            let owner = entry.full_name();
            let lookup = |name: &str| {
                resolve(name).ok_or_else(|| ManifestError::UnknownType {
                    name: name.to_string(),
                    referenced_by: owner.clone(),
                })
            };

            let mut decl = entry.header(module);
            if let Some(base) = &entry.base {
                decl = decl.extends(lookup(base.as_str())?);
            }
            for iface in &entry.interfaces {
                decl = decl.implements(lookup(iface.as_str())?);
            }
            for method in &entry.methods {
                decl = decl.method(method_def(entry.kind, &owner, method, &resolve)?);
            }
            registry.define(*id, decl)?;
        }

        tracing::debug!(
            module = module,
            types = ids.len(),
            "loaded type manifest"
        );
        Ok(ids)
    }

    /// Entry indices with every local base and interface ahead of the
    /// types that use it, file order otherwise. Cycles are left for the
    /// registry to report.
    fn definition_order(&self) -> Vec<usize> {
        let index: HashMap<String, usize> = self
            .types
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.full_name(), i))
            .collect();
        let mut visited = vec![false; self.types.len()];
        let mut order = Vec::with_capacity(self.types.len());
        for i in 0..self.types.len() {
            self.visit(i, &index, &mut visited, &mut order);
        }
        order
    }

    fn visit(
        &self,
        i: usize,
        index: &HashMap<String, usize>,
        visited: &mut [bool],
        order: &mut Vec<usize>,
    ) {
        if visited[i] {
            return;
        }
        visited[i] = true;
        let entry = &self.types[i];
        for dep in entry.base.iter().chain(&entry.interfaces) {
            if let Some(&j) = index.get(dep.as_str()) {
                self.visit(j, index, visited, order);
            }
        }
        order.push(i);
    }
}

fn method_def<F>(
    kind: TypeKind,
    owner: &str,
    entry: &MethodEntry,
    resolve: &F,
) -> Result<MethodDef, ManifestError>
where
    F: Fn(&str) -> Option<TypeId>,
{
    let referenced_by = format!("{}.{}", owner, entry.name);
    let parse = |s: &str| -> Result<TypeRef, ManifestError> {
        parse_type_ref(s, resolve).ok_or_else(|| ManifestError::UnknownType {
            name: s.to_string(),
            referenced_by: referenced_by.clone(),
        })
    };
    let params = entry
        .params
        .iter()
        .map(|p| parse(p.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = parse(entry.returns.as_str())?;

    if kind == TypeKind::Interface {
        return Ok(MethodDef::abstract_method(&entry.name, params, return_type));
    }

    let mut attributes = MethodAttributes::PUBLIC | MethodAttributes::HIDE_BY_SIG;
    let mut is_override = false;
    for modifier in &entry.modifiers {
        match modifier.as_str() {
            "abstract" => attributes |= MethodAttributes::ABSTRACT | MethodAttributes::VIRTUAL,
            "virtual" => attributes |= MethodAttributes::VIRTUAL,
            "override" => {
                attributes |= MethodAttributes::VIRTUAL;
                is_override = true;
            }
            "new" => attributes |= MethodAttributes::NEW_SLOT,
            "static" => attributes |= MethodAttributes::STATIC,
            "private" => attributes.remove(MethodAttributes::PUBLIC),
            other => {
                return Err(ManifestError::UnknownModifier {
                    method: referenced_by.clone(),
                    modifier: other.to_string(),
                })
            }
        }
    }
    // `virtual` and plain `abstract` open a slot; `override` reuses one.
    if attributes.contains(MethodAttributes::VIRTUAL) && !is_override {
        attributes |= MethodAttributes::NEW_SLOT;
    }

    let mut method = MethodDef::new(&entry.name, params, return_type).with_attributes(attributes);
    if attributes.contains(MethodAttributes::STATIC) {
        method.calling_convention = CallingConvention::Standard;
    }
    method.implementation = if attributes.contains(MethodAttributes::ABSTRACT) {
        None
    } else {
        Some(MethodImpl::ReturnDefault)
    };
    Ok(method)
}
