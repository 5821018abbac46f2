//! Constructed objects and virtual dispatch.

use std::fmt;
use std::sync::Arc;

use crate::error::InvocationError;
use crate::method::{MethodDef, MethodImpl, Value};
use crate::registry::{TypeDef, TypeId, TypeRegistry};
use crate::type_ref::TypeRef;

struct InstanceInner {
    type_id: TypeId,
    registry: Arc<TypeRegistry>,
}

/// A default-constructed object of a concrete type.
///
/// Cloning shares the same object; equality is reference identity.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    pub(crate) fn new(type_id: TypeId, registry: Arc<TypeRegistry>) -> Self {
        Self {
            inner: Arc::new(InstanceInner { type_id, registry }),
        }
    }

    /// The runtime type of this object.
    pub fn type_id(&self) -> TypeId {
        self.inner.type_id
    }

    pub fn type_def(&self) -> Option<Arc<TypeDef>> {
        self.inner.registry.get(self.inner.type_id)
    }

    pub fn type_name(&self) -> String {
        self.inner
            .registry
            .full_name(self.inner.type_id)
            .unwrap_or_else(|| format!("#{}", self.inner.type_id.index()))
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.inner.registry
    }

    /// Whether the runtime type is, extends, or implements `ty`.
    pub fn is_instance_of(&self, ty: TypeId) -> bool {
        self.inner.registry.is_assignable_to(self.inner.type_id, ty)
    }

    /// Find the implementation `name(params)` dispatches to.
    ///
    /// Walks from the runtime type towards the root. At each level a method
    /// named exactly `name` wins over an explicit `<Interface>.<name>`
    /// implementation; abstract and static methods are skipped.
    pub fn resolve(&self, name: &str, params: &[TypeRef]) -> Option<(Arc<TypeDef>, MethodDef)> {
        let registry = &self.inner.registry;
        let chain = registry.base_chain(self.inner.type_id)?;
        let qualified: Vec<String> = registry
            .interfaces(self.inner.type_id)
            .unwrap_or_default()
            .iter()
            .map(|iface| format!("{}.{}", iface.full_name(), name))
            .collect();

        for def in chain.iter().rev() {
            let callable = |m: &&MethodDef| {
                !m.is_static() && m.implementation.is_some() && m.params.as_slice() == params
            };
            if let Some(m) = def.methods.iter().filter(callable).find(|m| m.name == name) {
                return Some((Arc::clone(def), m.clone()));
            }
            if let Some(m) = def
                .methods
                .iter()
                .filter(callable)
                .find(|m| qualified.iter().any(|q| *q == m.name))
            {
                return Some((Arc::clone(def), m.clone()));
            }
        }
        None
    }

    /// Invoke `name(params)` with `args`.
    pub fn invoke(
        &self,
        name: &str,
        params: &[TypeRef],
        args: &[Value],
    ) -> Result<Value, InvocationError> {
        let Some((owner, method)) = self.resolve(name, params) else {
            return Err(InvocationError::MethodNotFound {
                type_name: self.type_name(),
                method: name.to_string(),
                params: self
                    .inner
                    .registry
                    .display_signature("", params)
                    .trim_start_matches('(')
                    .trim_end_matches(')')
                    .to_string(),
            });
        };
        if args.len() != method.params.len() {
            return Err(InvocationError::ArgumentCount {
                method: method.name.clone(),
                expected: method.params.len(),
                got: args.len(),
            });
        }
        match method.implementation {
            Some(MethodImpl::Native(f)) => f(self, args),
            Some(MethodImpl::ReturnDefault) => Ok(Value::default_for(&method.return_type)),
            Some(MethodImpl::ThrowNotImplemented) => Err(InvocationError::NotImplemented {
                type_name: owner.full_name(),
                method: method.name,
            }),
            None => Err(InvocationError::MethodNotFound {
                type_name: owner.full_name(),
                method: method.name,
                params: String::new(),
            }),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .finish()
    }
}
