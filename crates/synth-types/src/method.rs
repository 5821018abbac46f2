//! Method definitions, attribute flags, and runtime values.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use crate::error::InvocationError;
use crate::instance::Instance;
use crate::type_ref::{Primitive, TypeRef};

/// Method attribute flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodAttributes(u16);

impl MethodAttributes {
    pub const NONE: Self = Self(0);
    pub const PUBLIC: Self = Self(1 << 0);
    pub const STATIC: Self = Self(1 << 1);
    pub const VIRTUAL: Self = Self(1 << 2);
    pub const ABSTRACT: Self = Self(1 << 3);
    /// The method introduces a new dispatch slot instead of overriding one.
    pub const NEW_SLOT: Self = Self(1 << 4);
    pub const HIDE_BY_SIG: Self = Self(1 << 5);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::PUBLIC, "public"),
        (Self::STATIC, "static"),
        (Self::VIRTUAL, "virtual"),
        (Self::ABSTRACT, "abstract"),
        (Self::NEW_SLOT, "newslot"),
        (Self::HIDE_BY_SIG, "hidebysig"),
    ];

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    #[must_use]
    pub fn with(mut self, other: Self) -> Self {
        self.insert(other);
        self
    }

    #[must_use]
    pub fn without(mut self, other: Self) -> Self {
        self.remove(other);
        self
    }

    /// Lowercase flag names, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for MethodAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MethodAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MethodAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodAttributes({})", self.names().join(" | "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallingConvention {
    /// Static methods.
    Standard,
    /// Instance methods receive the instance as an implicit first argument.
    #[default]
    HasThis,
}

/// Native method body.
pub type NativeFn =
    Arc<dyn Fn(&Instance, &[Value]) -> Result<Value, InvocationError> + Send + Sync>;

/// What runs when a method is invoked.
#[derive(Clone)]
pub enum MethodImpl {
    Native(NativeFn),
    /// Returns the default value of the declared return type.
    ReturnDefault,
    /// Always fails with [`InvocationError::NotImplemented`].
    ThrowNotImplemented,
}

impl MethodImpl {
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        MethodImpl::Native(Arc::new(f))
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, MethodImpl::ThrowNotImplemented)
    }
}

impl fmt::Debug for MethodImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodImpl::Native(_) => f.write_str("Native(..)"),
            MethodImpl::ReturnDefault => f.write_str("ReturnDefault"),
            MethodImpl::ThrowNotImplemented => f.write_str("ThrowNotImplemented"),
        }
    }
}

/// A method declared directly on a type.
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Plain name, or `<InterfaceFullName>.<Name>` for an explicit interface implementation.
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub attributes: MethodAttributes,
    pub calling_convention: CallingConvention,
    /// `None` for abstract methods.
    pub implementation: Option<MethodImpl>,
}

impl MethodDef {
    /// A public, non-virtual instance method returning the default value.
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            attributes: MethodAttributes::PUBLIC | MethodAttributes::HIDE_BY_SIG,
            calling_convention: CallingConvention::HasThis,
            implementation: Some(MethodImpl::ReturnDefault),
        }
    }

    /// An abstract slot. Interface members are declared this way too.
    pub fn abstract_method(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            attributes: MethodAttributes::PUBLIC
                | MethodAttributes::VIRTUAL
                | MethodAttributes::ABSTRACT
                | MethodAttributes::NEW_SLOT
                | MethodAttributes::HIDE_BY_SIG,
            implementation: None,
            ..Self::new(name, params, return_type)
        }
    }

    /// A virtual method opening a new slot.
    pub fn virtual_method(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            attributes: MethodAttributes::PUBLIC
                | MethodAttributes::VIRTUAL
                | MethodAttributes::NEW_SLOT
                | MethodAttributes::HIDE_BY_SIG,
            ..Self::new(name, params, return_type)
        }
    }

    /// A concrete override of an inherited slot.
    pub fn override_method(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            attributes: MethodAttributes::PUBLIC
                | MethodAttributes::VIRTUAL
                | MethodAttributes::HIDE_BY_SIG,
            ..Self::new(name, params, return_type)
        }
    }

    pub fn static_method(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            attributes: MethodAttributes::PUBLIC
                | MethodAttributes::STATIC
                | MethodAttributes::HIDE_BY_SIG,
            calling_convention: CallingConvention::Standard,
            ..Self::new(name, params, return_type)
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.attributes.remove(MethodAttributes::PUBLIC);
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: MethodAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_impl(mut self, implementation: MethodImpl) -> Self {
        self.implementation = Some(implementation);
        self
    }

    #[must_use]
    pub fn with_body<F>(self, f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.with_impl(MethodImpl::native(f))
    }

    pub fn is_public(&self) -> bool {
        self.attributes.contains(MethodAttributes::PUBLIC)
    }

    pub fn is_static(&self) -> bool {
        self.attributes.contains(MethodAttributes::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.attributes.contains(MethodAttributes::ABSTRACT)
    }

    pub fn is_virtual(&self) -> bool {
        self.attributes.contains(MethodAttributes::VIRTUAL)
    }

    pub fn is_new_slot(&self) -> bool {
        self.attributes.contains(MethodAttributes::NEW_SLOT)
    }

    /// Virtual, not abstract, and reusing an inherited slot.
    pub fn is_concrete_override(&self) -> bool {
        self.is_virtual() && !self.is_abstract() && !self.is_new_slot()
    }

    pub fn is_stub(&self) -> bool {
        self.implementation
            .as_ref()
            .map(MethodImpl::is_stub)
            .unwrap_or(false)
    }
}

/// Dynamically typed argument or return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Void,
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Object(Instance),
    Tuple(Vec<Value>),
}

impl Value {
    /// The zero value of a type: `0`, `false`, `null`, or a tuple of defaults.
    pub fn default_for(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Primitive(p) => match p {
                Primitive::Void => Value::Void,
                Primitive::Bool => Value::Bool(false),
                Primitive::Int => Value::Int(0),
                Primitive::Long => Value::Long(0),
                Primitive::Float => Value::Float(0.0),
                Primitive::Double => Value::Double(0.0),
                Primitive::String | Primitive::Object => Value::Null,
            },
            TypeRef::Tuple(items) => Value::Tuple(items.iter().map(Value::default_for).collect()),
            TypeRef::Named(_) | TypeRef::Array { .. } | TypeRef::Nullable(_) => Value::Null,
        }
    }
}
