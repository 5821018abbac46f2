//! Obligations: members a concrete type still has to provide.

use synth_types::{CallingConvention, MethodAttributes, MethodDef, TypeId, TypeRef};

/// Identity and shape of a method obligation.
///
/// Two signatures are the same obligation when name and parameter types
/// match exactly; return type, attributes and calling convention are
/// carried along for emission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberSignature {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub attributes: MethodAttributes,
    pub calling_convention: CallingConvention,
}

impl MemberSignature {
    pub fn from_method(method: &MethodDef) -> Self {
        Self {
            name: method.name.clone(),
            params: method.params.clone(),
            return_type: method.return_type.clone(),
            attributes: method.attributes,
            calling_convention: method.calling_convention,
        }
    }

    pub fn same_obligation(&self, other: &MemberSignature) -> bool {
        self.name == other.name && self.params == other.params
    }
}

/// Where an obligation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObligationOrigin {
    /// An abstract member somewhere in the base chain (or the contract interface itself).
    Abstract,
    /// A member of an interface the contract transitively implements.
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obligation {
    pub signature: MemberSignature,
    pub declaring_type: TypeId,
    pub declaring_type_name: String,
    pub origin: ObligationOrigin,
}

impl Obligation {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.signature.params
    }
}

/// Ordered, duplicate-free set of obligations for one contract.
///
/// Abstract obligations come first, then interface obligations, each in
/// the order they were encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObligationSet {
    contract: TypeId,
    entries: Vec<Obligation>,
}

impl ObligationSet {
    pub(crate) fn new(contract: TypeId, entries: Vec<Obligation>) -> Self {
        Self { contract, entries }
    }

    pub fn contract(&self) -> TypeId {
        self.contract
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obligation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str, params: &[TypeRef]) -> bool {
        self.entries
            .iter()
            .any(|o| o.signature.name == name && o.signature.params == params)
    }

    pub fn count_by_origin(&self, origin: ObligationOrigin) -> usize {
        self.entries.iter().filter(|o| o.origin == origin).count()
    }
}

impl<'a> IntoIterator for &'a ObligationSet {
    type Item = &'a Obligation;
    type IntoIter = std::slice::Iter<'a, Obligation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
